//! Server-rendered HTML for the public widget, wall and submission pages.
//! Plain markup plus a few CSS variables derived from the wall's
//! settings. Every user-supplied string goes through [`escape_html`].

use wall_embed::ROOT_ELEMENT_ID;
use wall_embed::script::widget_resize_script;
use wall_types::api::{PublicTestimonial, PublicWall};
use wall_types::models::{MAX_RATING, Theme, WallSettings, slug_title};

/// A wall and the testimonials the public may see.
pub struct WallView<'a> {
    pub wall: &'a PublicWall,
    pub testimonials: &'a [PublicTestimonial],
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn style_vars(settings: &WallSettings) -> String {
    let (bg, card, fg, muted, border) = match settings.theme {
        Theme::Light => ("#f8fafc", "#ffffff", "#111827", "#6b7280", "#f3f4f6"),
        Theme::Dark => ("#0a0a0a", "#171717", "#f5f5f5", "#a3a3a3", "#262626"),
    };
    format!(
        ":root{{--bg:{bg};--card:{card};--fg:{fg};--muted:{muted};--border:{border};\
         --accent:{accent};--radius:{radius}rem;}}",
        accent = escape_html(&settings.accent_color),
        radius = settings.border_radius,
    )
}

const BASE_CSS: &str = "\
body{margin:0;font-family:system-ui,-apple-system,sans-serif;color:var(--fg);}\
.grid{columns:1;column-gap:1rem;padding:1rem;}\
@media(min-width:700px){.grid{columns:2;}}\
@media(min-width:1050px){.grid{columns:3;}}\
.card{break-inside:avoid;margin:0 0 1rem;padding:1.5rem;background:var(--card);\
border:1px solid var(--border);border-radius:var(--radius);}\
.stars{color:var(--accent);letter-spacing:2px;margin-bottom:.75rem;}\
.content{white-space:pre-wrap;line-height:1.6;margin:0;}\
.author{margin-top:1rem;font-weight:700;}\
.role{font-size:.75rem;color:var(--muted);text-transform:uppercase;}";

fn stars(rating: u8) -> String {
    let filled = usize::from(rating).min(MAX_RATING as usize);
    let mut s = "\u{2605}".repeat(filled);
    s.push_str(&"\u{2606}".repeat(MAX_RATING as usize - filled));
    s
}

fn cards(out: &mut String, view: &WallView<'_>) {
    out.push_str("<div class=\"grid\">");
    for t in view.testimonials {
        out.push_str("<figure class=\"card\">");
        if view.wall.settings.show_stars {
            out.push_str(&format!(
                "<div class=\"stars\" aria-label=\"{} out of {}\">{}</div>",
                t.rating,
                MAX_RATING,
                stars(t.rating)
            ));
        }
        out.push_str(&format!(
            "<blockquote class=\"content\">{}</blockquote><figcaption><div class=\"author\">{}</div>",
            escape_html(&t.content),
            escape_html(&t.author_name)
        ));
        if let Some(role) = &t.author_role {
            out.push_str(&format!("<div class=\"role\">{}</div>", escape_html(role)));
        }
        out.push_str("</figcaption></figure>");
    }
    out.push_str("</div>");
}

fn page(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
         <title>{}</title>{}</head><body>{}</body></html>",
        escape_html(title),
        head_extra,
        body
    )
}

/// Widget frame. Without a wall, or with no approved testimonials, the root
/// is left empty so the embedding page collapses the frame.
pub fn widget_page(view: Option<&WallView<'_>>) -> String {
    let mut head = String::from("<style>html,body{background:transparent;overflow:hidden;margin:0;}");
    let mut body = format!("<main id=\"{}\">", ROOT_ELEMENT_ID);

    if let Some(view) = view {
        head.push_str(&style_vars(&view.wall.settings));
        if !view.testimonials.is_empty() {
            cards(&mut body, view);
        }
    }
    head.push_str(BASE_CSS);
    head.push_str("</style>");

    body.push_str(&format!("</main><script>{}</script>", widget_resize_script()));
    page("Testimonials", &head, &body)
}

/// Standalone public wall page.
pub fn wall_page(slug: &str, view: Option<&WallView<'_>>) -> String {
    let Some(view) = view else {
        return not_found_page();
    };

    let title = slug_title(slug);
    let head = format!(
        "<style>{}{}body{{background:var(--bg);}}header{{text-align:center;padding:3rem 1rem 1rem;}}\
         .empty{{text-align:center;padding:4rem 1rem;color:var(--muted);}}</style>",
        style_vars(&view.wall.settings),
        BASE_CSS
    );

    let mut body = format!(
        "<header><h1>{}</h1><p>Real stories from our amazing community.</p></header>",
        escape_html(&title)
    );
    if view.testimonials.is_empty() {
        body.push_str(
            "<div class=\"empty\"><h2>This wall is empty... for now.</h2>\
             <p>When approved reviews are published, they will appear here.</p></div>",
        );
    } else {
        cards(&mut body, view);
    }

    page(&view.wall.name, &head, &body)
}

/// Public submission form. `notice` is shown above the form (validation or
/// storage errors); the form can simply be resubmitted.
pub fn submit_page(wall_name: &str, slug: &str, notice: Option<&str>) -> String {
    let mut body = format!("<main class=\"form\"><h1>Share your experience with {}</h1>", escape_html(wall_name));
    if let Some(notice) = notice {
        body.push_str(&format!("<p class=\"notice\" role=\"alert\">{}</p>", escape_html(notice)));
    }
    body.push_str(&format!(
        "<form method=\"post\" action=\"/submit/{slug}\">\
         <label>Your name<input name=\"author_name\" required maxlength=\"100\"></label>\
         <label>Role or company (optional)<input name=\"author_role\" maxlength=\"100\"></label>\
         <label>Rating<select name=\"rating\">{options}</select></label>\
         <label>Your testimonial<textarea name=\"content\" required rows=\"6\"></textarea></label>\
         <button type=\"submit\">Submit</button></form></main>",
        slug = escape_html(slug),
        options = (1..=MAX_RATING)
            .rev()
            .map(|r| format!("<option value=\"{r}\">{r}</option>"))
            .collect::<String>(),
    ));
    let head = "<style>body{font-family:system-ui,sans-serif;background:#f9fafb;}\
                .form{max-width:32rem;margin:3rem auto;padding:2rem;background:#fff;border-radius:1.5rem;}\
                label{display:block;margin:1rem 0;}input,select,textarea{display:block;width:100%;}\
                .notice{color:#b91c1c;}</style>";
    page(wall_name, head, &body)
}

pub fn submitted_page(wall_name: &str) -> String {
    page(
        wall_name,
        "",
        &format!(
            "<main><h1>Thank you!</h1><p>Your testimonial for {} was received and will appear once approved.</p></main>",
            escape_html(wall_name)
        ),
    )
}

pub fn not_found_page() -> String {
    page(
        "Wall not found",
        "",
        "<main><h1>Wall not found</h1><p>The link you followed might be broken.</p></main>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn wall(show_stars: bool) -> PublicWall {
        PublicWall {
            name: "Acme".into(),
            slug: "acme".into(),
            settings: WallSettings {
                show_stars,
                ..WallSettings::default()
            },
        }
    }

    fn testimonial(content: &str) -> PublicTestimonial {
        PublicTestimonial {
            id: Uuid::new_v4(),
            author_name: "Ann <admin>".into(),
            author_role: Some("CTO".into()),
            content: content.into(),
            rating: 4,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escapes_user_content() {
        let w = wall(true);
        let ts = [testimonial("<script>alert(1)</script>")];
        let html = widget_page(Some(&WallView { wall: &w, testimonials: &ts }));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Ann &lt;admin&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn widget_has_root_and_resize_script() {
        let html = widget_page(None);
        assert!(html.contains("<main id=\"widget-root\"></main>"));
        assert!(html.contains("postMessage"));
    }

    #[test]
    fn stars_follow_settings() {
        let ts = [testimonial("Great!")];
        let with = wall(true);
        let without = wall(false);
        let a = widget_page(Some(&WallView { wall: &with, testimonials: &ts }));
        let b = widget_page(Some(&WallView { wall: &without, testimonials: &ts }));
        assert!(a.contains("\u{2605}\u{2605}\u{2605}\u{2605}\u{2606}"));
        assert!(!b.contains("class=\"stars\""));
    }

    #[test]
    fn role_line_only_when_present() {
        let w = wall(false);
        let mut anonymous = testimonial("Fine");
        anonymous.author_role = None;
        let ts = [testimonial("Great!"), anonymous];
        let html = widget_page(Some(&WallView { wall: &w, testimonials: &ts }));
        assert_eq!(html.matches("<div class=\"role\">CTO</div>").count(), 1);
        assert_eq!(html.matches("<figure class=\"card\">").count(), 2);
        assert!(html.ends_with("</script></body></html>"));
    }

    #[test]
    fn empty_wall_page_state() {
        let w = wall(true);
        let html = wall_page("acme-corp", Some(&WallView { wall: &w, testimonials: &[] }));
        assert!(html.contains("This wall is empty"));
        assert!(html.contains("acme corp"));
        assert!(wall_page("x", None).contains("Wall not found"));
    }
}
