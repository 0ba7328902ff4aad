use std::fmt;

use url::Url;

/// The origin the widget is served from, in the exact form browsers report in
/// `MessageEvent.origin` (`scheme://host[:port]`, no trailing slash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOrigin(String);

impl WidgetOrigin {
    /// Parse a base URL such as `https://walls.example.com/` into its origin.
    pub fn parse(base_url: &str) -> Result<Self, String> {
        let url = Url::parse(base_url).map_err(|e| format!("invalid widget base URL '{}': {}", base_url, e))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(format!("unsupported widget URL scheme '{}'", other)),
        }
        Ok(Self(url.origin().ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact string comparison. No prefix, suffix or case-insensitive match.
    pub fn matches(&self, origin: &str) -> bool {
        self.0 == origin
    }

    pub fn widget_url(&self, slug: &str) -> String {
        format!("{}/widget/{}", self.0, slug)
    }

    pub fn wall_url(&self, slug: &str) -> String {
        format!("{}/wall/{}", self.0, slug)
    }

    pub fn submit_url(&self, slug: &str) -> String {
        format!("{}/submit/{}", self.0, slug)
    }

    pub fn embed_script_url(&self, slug: &str) -> String {
        format!("{}/embed.js?wall={}", self.0, slug)
    }
}

impl fmt::Display for WidgetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_base_url() {
        let o = WidgetOrigin::parse("https://walls.example.com/some/path/").unwrap();
        assert_eq!(o.as_str(), "https://walls.example.com");
        assert_eq!(o.widget_url("acme"), "https://walls.example.com/widget/acme");

        let local = WidgetOrigin::parse("http://localhost:3000").unwrap();
        assert_eq!(local.as_str(), "http://localhost:3000");
    }

    #[test]
    fn matching_is_exact() {
        let o = WidgetOrigin::parse("https://walls.example.com").unwrap();
        assert!(o.matches("https://walls.example.com"));
        assert!(!o.matches("https://walls.example.com.evil.net"));
        assert!(!o.matches("http://walls.example.com"));
        assert!(!o.matches("https://walls.example.com/"));
        assert!(!o.matches("null"));
    }

    #[test]
    fn rejects_non_http() {
        assert!(WidgetOrigin::parse("file:///tmp/x").is_err());
        assert!(WidgetOrigin::parse("not a url").is_err());
    }
}
