use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

pub const DEFAULT_ACCENT_COLOR: &str = "#2563eb";
pub const DEFAULT_BORDER_RADIUS: f64 = 1.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub settings: WallSettings,
    pub created_at: DateTime<Utc>,
}

/// A single review left on a wall. `content` is stored and served verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub wall_id: Uuid,
    pub author_name: String,
    pub author_role: Option<String>,
    pub content: String,
    pub rating: u8,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Display configuration of a wall. Every field has a default so a partially
/// populated stored record still yields a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    /// Corner radius in rem.
    #[serde(default = "default_border_radius")]
    pub border_radius: f64,
    #[serde(default = "default_show_stars")]
    pub show_stars: bool,
}

fn default_accent_color() -> String {
    DEFAULT_ACCENT_COLOR.to_string()
}

fn default_border_radius() -> f64 {
    DEFAULT_BORDER_RADIUS
}

fn default_show_stars() -> bool {
    true
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accent_color: default_accent_color(),
            border_radius: default_border_radius(),
            show_stars: default_show_stars(),
        }
    }
}

impl WallSettings {
    /// Parse the JSON stored alongside a wall.
    ///
    /// Each field is read on its own: a missing or malformed field falls back
    /// to its default without discarding the others. Older records stored the
    /// radius as a CSS string such as `"1.5rem"`; those are accepted too.
    pub fn from_stored(raw: &str) -> Self {
        let mut settings = Self::default();

        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Unreadable wall settings, using defaults: {}", e);
                return settings;
            }
        };
        let Some(map) = value.as_object() else {
            return settings;
        };

        if let Some(theme) = map.get("theme").and_then(|v| Theme::deserialize(v).ok()) {
            settings.theme = theme;
        }
        if let Some(color) = map.get("accent_color").and_then(Value::as_str) {
            if is_hex_color(color) {
                settings.accent_color = color.to_string();
            }
        }
        if let Some(radius) = map.get("border_radius").and_then(parse_radius) {
            settings.border_radius = radius;
        }
        if let Some(show) = map.get("show_stars").and_then(Value::as_bool) {
            settings.show_stars = show;
        }

        settings
    }

    pub fn to_stored(&self) -> String {
        // A struct of plain fields always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Checks applied before a settings update is persisted.
    pub fn validate(&self) -> Result<(), String> {
        if !is_hex_color(&self.accent_color) {
            return Err(format!("accent_color '{}' is not a hex color", self.accent_color));
        }
        if !self.border_radius.is_finite() || self.border_radius < 0.0 {
            return Err("border_radius must be a non-negative number".to_string());
        }
        Ok(())
    }
}

fn parse_radius(value: &Value) -> Option<f64> {
    let radius = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches("rem").trim().parse().ok()?,
        _ => return None,
    };
    (radius.is_finite() && radius >= 0.0).then_some(radius)
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Turn a display name or user-typed slug into a URL-safe slug.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '-' {
            pending_dash = !slug.is_empty();
        } else if c.is_ascii_alphanumeric() {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(c);
        }
    }

    slug
}

/// Human title shown on the public wall page, e.g. `acme-corp` -> `acme corp`.
pub fn slug_title(slug: &str) -> String {
    slug.replace('-', " ")
}
