//! JavaScript emitted for both sides of the handshake.
//!
//! The scripts implement the same rules as [`crate::reporter`] and
//! [`crate::surface`]; keep them in step when changing either.

use wall_types::events::FrameMessage;

use crate::origin::WidgetOrigin;
use crate::{CONTAINER_ID_PREFIX, ROOT_ELEMENT_ID};

/// Encode `s` as a JavaScript string literal that is also safe inside an
/// inline `<script>` element.
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// Script included in the widget frame. Posts the root element's scroll
/// height to the parent on load, on window resize and on DOM mutation.
pub fn widget_resize_script() -> String {
    format!(
        r#"(function () {{
  var ROOT_ID = {root_id};
  function sendHeight() {{
    var root = document.getElementById(ROOT_ID);
    if (!root || !window.parent || window.parent === window) return;
    window.parent.postMessage({{ type: {tag}, height: root.scrollHeight }}, '*');
  }}
  window.addEventListener('load', sendHeight);
  window.addEventListener('resize', sendHeight);
  var root = document.getElementById(ROOT_ID);
  if (root) {{
    new MutationObserver(sendHeight).observe(root, {{
      childList: true, subtree: true, characterData: true, attributes: true
    }});
  }}
  sendHeight();
}})();"#,
        root_id = js_string(ROOT_ELEMENT_ID),
        tag = js_string(FrameMessage::RESIZE_TAG),
    )
}

/// Script run on the host page for one wall. Creates the container and the
/// iframe next to the executing script element, and attaches the page-wide
/// message listener unless an earlier snippet already did.
pub fn host_embed_script(origin: &WidgetOrigin, slug: &str) -> String {
    format!(
        r#"(function () {{
  var ORIGIN = {origin};
  var SLUG = {slug};
  var TAG = {tag};
  var container = document.createElement('div');
  container.id = {prefix} + '-' + SLUG;
  var frame = document.createElement('iframe');
  frame.src = ORIGIN + '/widget/' + encodeURIComponent(SLUG);
  frame.title = 'Testimonials';
  frame.setAttribute('scrolling', 'no');
  frame.setAttribute('loading', 'lazy');
  frame.style.cssText = 'display:block;width:100%;border:0;overflow:hidden;';
  container.appendChild(frame);
  var anchor = document.currentScript;
  if (anchor && anchor.parentNode) {{
    anchor.parentNode.insertBefore(container, anchor);
  }} else {{
    document.body.appendChild(container);
  }}
  var frames = window.__wallFrames = window.__wallFrames || [];
  frames.push(frame);
  if (window.__wallResizeListener) return;
  window.__wallResizeListener = true;
  window.addEventListener('message', function (event) {{
    if (event.origin !== ORIGIN) return;
    var data = event.data;
    if (!data || data.type !== TAG) return;
    var height = data.height;
    if (typeof height !== 'number' || height < 0 || Math.floor(height) !== height) return;
    for (var i = 0; i < frames.length; i++) {{
      if (frames[i].contentWindow === event.source) {{
        frames[i].style.height = height + 'px';
      }}
    }}
  }});
}})();"#,
        origin = js_string(origin.as_str()),
        slug = js_string(slug),
        tag = js_string(FrameMessage::RESIZE_TAG),
        prefix = js_string(CONTAINER_ID_PREFIX),
    )
}

/// Self-contained HTML fragment a site owner pastes into their page.
pub fn embed_snippet(origin: &WidgetOrigin, slug: &str) -> String {
    format!(
        "<!-- Testimonial wall: {slug} -->\n<script>\n{}\n</script>\n",
        host_embed_script(origin, slug),
        slug = slug.replace("--", "-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> WidgetOrigin {
        WidgetOrigin::parse("https://walls.example.com").unwrap()
    }

    #[test]
    fn js_string_cannot_close_script() {
        assert_eq!(js_string("a</script>b"), r#""a<\/script>b""#);
        assert_eq!(js_string("q\"uote"), r#""q\"uote""#);
    }

    #[test]
    fn widget_script_posts_resize_from_root() {
        let js = widget_resize_script();
        assert!(js.contains(r#"var ROOT_ID = "widget-root";"#));
        assert!(js.contains(r#"type: "resize""#));
        assert!(js.contains("MutationObserver"));
        assert!(js.contains("'load'"));
        assert!(js.contains("'resize'"));
    }

    #[test]
    fn host_script_checks_exact_origin_and_guards_listener() {
        let js = host_embed_script(&origin(), "acme");
        assert!(js.contains(r#"var ORIGIN = "https://walls.example.com";"#));
        assert!(js.contains("event.origin !== ORIGIN"));
        assert!(js.contains("if (window.__wallResizeListener) return;"));
        assert_eq!(js.matches("addEventListener('message'").count(), 1);
    }

    #[test]
    fn snippet_is_self_contained() {
        let html = embed_snippet(&origin(), "acme");
        assert!(html.contains("<script>"));
        assert!(!html.contains("<script src"));
        assert!(html.contains(r#"var SLUG = "acme";"#));
    }
}
