use crate::Database;
use crate::models::{NewTestimonial, TestimonialRow, UserRow, WallRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

const WALL_COLUMNS: &str = "id, owner_id, name, slug, settings, created_at";
const TESTIMONIAL_COLUMNS: &str =
    "id, wall_id, author_name, author_role, content, rating, is_approved, created_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, password, created_at FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()
        })
    }

    // -- Walls --

    pub fn create_wall(
        &self,
        id: &str,
        owner_id: &str,
        name: &str,
        slug: &str,
        settings: &str,
    ) -> Result<WallRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO walls (id, owner_id, name, slug, settings) VALUES (?1, ?2, ?3, ?4, ?5)",
                (id, owner_id, name, slug, settings),
            )?;
            query_wall(conn, "id", id)?.ok_or_else(|| anyhow::anyhow!("Wall vanished after insert: {}", id))
        })
    }

    pub fn slug_exists(&self, slug: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool =
                conn.query_row("SELECT EXISTS(SELECT 1 FROM walls WHERE slug = ?1)", [slug], |r| {
                    r.get(0)
                })?;
            Ok(exists)
        })
    }

    pub fn get_wall(&self, id: &str) -> Result<Option<WallRow>> {
        self.with_conn(|conn| query_wall(conn, "id", id))
    }

    pub fn get_wall_by_slug(&self, slug: &str) -> Result<Option<WallRow>> {
        self.with_conn(|conn| query_wall(conn, "slug", slug))
    }

    /// Walls owned by `owner_id`, newest first.
    pub fn list_walls(&self, owner_id: &str) -> Result<Vec<WallRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {WALL_COLUMNS} FROM walls WHERE owner_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([owner_id], wall_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_wall_settings(&self, id: &str, settings: &str) -> Result<Option<WallRow>> {
        self.with_conn(|conn| {
            let changed =
                conn.execute("UPDATE walls SET settings = ?2 WHERE id = ?1", (id, settings))?;
            if changed == 0 {
                return Ok(None);
            }
            query_wall(conn, "id", id)
        })
    }

    /// Deletes the wall and, through the foreign key cascade, its testimonials.
    /// Returns false if no such wall existed.
    pub fn delete_wall(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM walls WHERE id = ?1", [id])? > 0))
    }

    // -- Testimonials --

    pub fn insert_testimonial(&self, new: &NewTestimonial<'_>) -> Result<TestimonialRow> {
        self.with_conn(|conn| {
            insert_testimonial(conn, new)?;
            query_testimonial(conn, new.id)?
                .ok_or_else(|| anyhow::anyhow!("Testimonial vanished after insert: {}", new.id))
        })
    }

    pub fn get_testimonial(&self, id: &str) -> Result<Option<TestimonialRow>> {
        self.with_conn(|conn| query_testimonial(conn, id))
    }

    /// Testimonials of a wall, newest first. With `approved_only` the result
    /// is exactly what the public may see.
    pub fn list_testimonials(&self, wall_id: &str, approved_only: bool) -> Result<Vec<TestimonialRow>> {
        self.with_conn(|conn| {
            let filter = if approved_only { "AND is_approved = 1" } else { "" };
            let mut stmt = conn.prepare(&format!(
                "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials
                 WHERE wall_id = ?1 {filter}
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([wall_id], testimonial_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Flip the approval flag. Returns the updated row, or `None` if the
    /// testimonial does not exist.
    pub fn toggle_approval(&self, id: &str) -> Result<Option<TestimonialRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE testimonials SET is_approved = NOT is_approved WHERE id = ?1",
                [id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_testimonial(conn, id)
        })
    }

    pub fn delete_testimonial(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM testimonials WHERE id = ?1", [id])? > 0))
    }

    /// Insert imported testimonials, skipping ones already present on the wall
    /// with the same author and content (their rating is refreshed instead).
    /// Runs in one transaction. Returns how many rows were newly inserted.
    pub fn upsert_imported(&self, items: &[NewTestimonial<'_>]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;

            for item in items {
                let existing: Option<String> = tx
                    .query_row(
                        "SELECT id FROM testimonials
                         WHERE wall_id = ?1 AND author_name = ?2 AND content = ?3",
                        (item.wall_id, item.author_name, item.content),
                        |row| row.get(0),
                    )
                    .optional()?;

                match existing {
                    Some(id) => {
                        tx.execute(
                            "UPDATE testimonials SET rating = ?2 WHERE id = ?1",
                            (&id, item.rating),
                        )?;
                    }
                    None => {
                        insert_testimonial(&tx, item)?;
                        inserted += 1;
                    }
                }
            }

            tx.commit()?;
            Ok(inserted)
        })
    }
}

fn insert_testimonial(conn: &Connection, new: &NewTestimonial<'_>) -> Result<()> {
    conn.execute(
        "INSERT INTO testimonials
            (id, wall_id, author_name, author_role, content, rating, is_approved, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, datetime('now')))",
        rusqlite::params![
            new.id,
            new.wall_id,
            new.author_name,
            new.author_role,
            new.content,
            new.rating,
            new.is_approved,
            new.created_at,
        ],
    )?;
    Ok(())
}

fn query_wall(conn: &Connection, column: &str, value: &str) -> Result<Option<WallRow>> {
    // `column` is always a literal from this module, never user input.
    conn.query_row(
        &format!("SELECT {WALL_COLUMNS} FROM walls WHERE {column} = ?1"),
        [value],
        wall_from_row,
    )
    .optional()
}

fn query_testimonial(conn: &Connection, id: &str) -> Result<Option<TestimonialRow>> {
    conn.query_row(
        &format!("SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = ?1"),
        [id],
        testimonial_from_row,
    )
    .optional()
}

fn wall_from_row(row: &Row<'_>) -> rusqlite::Result<WallRow> {
    Ok(WallRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        settings: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn testimonial_from_row(row: &Row<'_>) -> rusqlite::Result<TestimonialRow> {
    Ok(TestimonialRow {
        id: row.get(0)?,
        wall_id: row.get(1)?,
        author_name: row.get(2)?,
        author_role: row.get(3)?,
        content: row.get(4)?,
        rating: row.get(5)?,
        is_approved: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn id() -> String {
        Uuid::new_v4().to_string()
    }

    fn setup() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let owner = id();
        db.create_user(&owner, "owner", "hash").unwrap();
        let wall = id();
        db.create_wall(&wall, &owner, "Acme", "acme", "{}").unwrap();
        (db, wall)
    }

    fn submit(db: &Database, wall: &str, content: &str, rating: i64, approved: bool) -> String {
        let tid = id();
        db.insert_testimonial(&NewTestimonial {
            id: &tid,
            wall_id: wall,
            author_name: "Ann",
            author_role: None,
            content,
            rating,
            is_approved: approved,
            created_at: None,
        })
        .unwrap();
        tid
    }

    #[test]
    fn approved_filter_and_order() {
        let (db, wall) = setup();
        submit(&db, &wall, "first", 5, true);
        submit(&db, &wall, "hidden", 1, false);
        submit(&db, &wall, "second", 4, true);

        let public = db.list_testimonials(&wall, true).unwrap();
        let contents: Vec<_> = public.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "first"]);

        assert_eq!(db.list_testimonials(&wall, false).unwrap().len(), 3);
    }

    #[test]
    fn toggle_twice_restores() {
        let (db, wall) = setup();
        let tid = submit(&db, &wall, "x", 3, false);

        assert!(db.toggle_approval(&tid).unwrap().unwrap().is_approved);
        assert!(!db.toggle_approval(&tid).unwrap().unwrap().is_approved);
        assert!(db.toggle_approval("missing").unwrap().is_none());
    }

    #[test]
    fn delete_wall_cascades() {
        let (db, wall) = setup();
        let tid = submit(&db, &wall, "x", 3, true);

        assert!(db.delete_wall(&wall).unwrap());
        assert!(db.get_testimonial(&tid).unwrap().is_none());
        assert!(db.get_wall_by_slug("acme").unwrap().is_none());
        assert!(!db.delete_wall(&wall).unwrap());
    }

    #[test]
    fn rating_out_of_range_rejected_by_schema() {
        let (db, wall) = setup();
        let tid = id();
        let result = db.insert_testimonial(&NewTestimonial {
            id: &tid,
            wall_id: &wall,
            author_name: "Ann",
            author_role: None,
            content: "x",
            rating: 6,
            is_approved: false,
            created_at: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn upsert_imported_skips_duplicates() {
        let (db, wall) = setup();
        let ids: Vec<String> = (0..2).map(|_| id()).collect();
        let items = [
            NewTestimonial {
                id: &ids[0],
                wall_id: &wall,
                author_name: "Bo",
                author_role: None,
                content: "Lovely",
                rating: 4,
                is_approved: true,
                created_at: Some("2024-01-02 03:04:05"),
            },
            NewTestimonial {
                id: &ids[1],
                wall_id: &wall,
                author_name: "Cy",
                author_role: None,
                content: "Fine",
                rating: 3,
                is_approved: true,
                created_at: Some("2024-01-03 03:04:05"),
            },
        ];

        assert_eq!(db.upsert_imported(&items).unwrap(), 2);
        assert_eq!(db.upsert_imported(&items).unwrap(), 0);
        assert_eq!(db.list_testimonials(&wall, true).unwrap().len(), 2);
    }

    #[test]
    fn file_backed_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walls.db");
        let owner = id();
        {
            let db = Database::open(&path).unwrap();
            db.create_user(&owner, "owner", "hash").unwrap();
            db.create_wall(&id(), &owner, "Acme", "acme", "{}").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert!(db.slug_exists("acme").unwrap());
        assert_eq!(db.list_walls(&owner).unwrap().len(), 1);
    }
}
