use serde_json::Value;
use tracing::trace;
use wall_types::events::FrameMessage;

use crate::origin::WidgetOrigin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Iframe created; it keeps its default height until the first report.
    AwaitingFirstReport,
    Sized(u32),
}

/// Parent side of the handshake: one embedded iframe and its height.
#[derive(Debug, Clone)]
pub struct EmbedSurface {
    slug: String,
    expected_origin: WidgetOrigin,
    state: SurfaceState,
}

impl EmbedSurface {
    pub fn new(slug: impl Into<String>, expected_origin: WidgetOrigin) -> Self {
        Self {
            slug: slug.into(),
            expected_origin,
            state: SurfaceState::AwaitingFirstReport,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn height(&self) -> Option<u32> {
        match self.state {
            SurfaceState::AwaitingFirstReport => None,
            SurfaceState::Sized(h) => Some(h),
        }
    }

    /// Apply a received message. Returns true if the height was set.
    ///
    /// The origin must equal the widget origin exactly and the payload must be
    /// a well-formed resize notification; anything else is dropped silently.
    /// The reported height is applied as is, without clamping.
    pub fn handle_message(&mut self, origin: &str, payload: &Value) -> bool {
        if !self.expected_origin.matches(origin) {
            trace!(origin, "dropping frame message from unexpected origin");
            return false;
        }
        match FrameMessage::from_payload(payload) {
            Some(FrameMessage::Resize { height }) => {
                self.state = SurfaceState::Sized(height);
                true
            }
            None => false,
        }
    }
}
