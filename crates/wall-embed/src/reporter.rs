use wall_types::events::FrameMessage;

/// Events after which the widget re-reports its height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTrigger {
    Load,
    WindowResize,
    /// The root element's subtree changed (e.g. testimonials arrived).
    Mutation,
}

/// Read access to the rendered widget document.
pub trait ContentRoot {
    /// Scroll height of the root element in pixels, or `None` when the root
    /// element is not in the document.
    fn root_scroll_height(&self) -> Option<u32>;
}

/// Child side of the handshake.
///
/// Stateless apart from a send counter: every trigger produces at most one
/// message that restates the full current height, so reordering or losing a
/// message is harmless.
#[derive(Debug, Default)]
pub struct WidgetReporter {
    sent: u64,
}

impl WidgetReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message to post to the parent window for this trigger, if any.
    pub fn on_trigger<R: ContentRoot>(&mut self, _trigger: ResizeTrigger, doc: &R) -> Option<FrameMessage> {
        let height = doc.root_scroll_height()?;
        self.sent += 1;
        Some(FrameMessage::Resize { height })
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc(Option<u32>);

    impl ContentRoot for Doc {
        fn root_scroll_height(&self) -> Option<u32> {
            self.0
        }
    }

    #[test]
    fn reports_full_height_on_every_trigger() {
        let mut r = WidgetReporter::new();
        let doc = Doc(Some(640));
        for trigger in [ResizeTrigger::Load, ResizeTrigger::WindowResize, ResizeTrigger::Mutation] {
            assert_eq!(r.on_trigger(trigger, &doc), Some(FrameMessage::Resize { height: 640 }));
        }
        assert_eq!(r.sent(), 3);
    }

    #[test]
    fn missing_root_sends_nothing() {
        let mut r = WidgetReporter::new();
        assert_eq!(r.on_trigger(ResizeTrigger::Load, &Doc(None)), None);
        assert_eq!(r.sent(), 0);
    }

    #[test]
    fn empty_render_is_a_valid_report() {
        let mut r = WidgetReporter::new();
        assert_eq!(
            r.on_trigger(ResizeTrigger::Load, &Doc(Some(0))),
            Some(FrameMessage::Resize { height: 0 })
        );
    }
}
