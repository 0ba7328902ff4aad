/// Database row types, mapped directly from SQLite rows.
/// Distinct from wall-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct WallRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub slug: String,
    /// Raw JSON; parsed into a typed configuration by the API layer.
    pub settings: String,
    pub created_at: String,
}

pub struct TestimonialRow {
    pub id: String,
    pub wall_id: String,
    pub author_name: String,
    pub author_role: Option<String>,
    pub content: String,
    pub rating: i64,
    pub is_approved: bool,
    pub created_at: String,
}

/// Fields of a testimonial about to be written.
pub struct NewTestimonial<'a> {
    pub id: &'a str,
    pub wall_id: &'a str,
    pub author_name: &'a str,
    pub author_role: Option<&'a str>,
    pub content: &'a str,
    pub rating: i64,
    pub is_approved: bool,
    /// `None` lets SQLite stamp the current time.
    pub created_at: Option<&'a str>,
}
