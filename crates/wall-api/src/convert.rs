//! Row -> API model conversion. Corrupt values are logged and replaced with
//! defaults rather than failing the whole request.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use wall_db::models::{TestimonialRow, WallRow};
use wall_types::models::{Testimonial, Wall, WallSettings};

pub fn parse_uuid(raw: &str, what: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", what, raw, e);
        Uuid::default()
    })
}

pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

/// Format used for timestamps written by the application.
pub fn sqlite_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn wall_from_row(row: WallRow) -> Wall {
    Wall {
        id: parse_uuid(&row.id, "wall id"),
        owner_id: parse_uuid(&row.owner_id, "wall owner_id"),
        settings: WallSettings::from_stored(&row.settings),
        created_at: parse_timestamp(&row.created_at),
        name: row.name,
        slug: row.slug,
    }
}

pub fn testimonial_from_row(row: TestimonialRow) -> Testimonial {
    let rating = u8::try_from(row.rating).unwrap_or_else(|_| {
        warn!("Corrupt rating {} on testimonial '{}'", row.rating, row.id);
        0
    });
    Testimonial {
        id: parse_uuid(&row.id, "testimonial id"),
        wall_id: parse_uuid(&row.wall_id, "testimonial wall_id"),
        created_at: parse_timestamp(&row.created_at),
        author_name: row.author_name,
        author_role: row.author_role,
        content: row.content,
        rating,
        is_approved: row.is_approved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_sqlite_and_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(parse_timestamp("2024-05-06 07:08:09"), expected);
        assert_eq!(parse_timestamp("2024-05-06T07:08:09Z"), expected);
        assert_eq!(sqlite_timestamp(expected), "2024-05-06 07:08:09");
    }

    #[test]
    fn corrupt_values_fall_back() {
        assert_eq!(parse_timestamp("yesterday"), DateTime::<Utc>::default());
        assert_eq!(parse_uuid("nope", "id"), Uuid::default());
    }
}
