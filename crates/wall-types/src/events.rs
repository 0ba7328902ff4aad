use serde::{Deserialize, Serialize};

/// Messages posted from the widget frame to the page embedding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FrameMessage {
    /// Full scroll height of the widget content, in CSS pixels.
    Resize { height: u32 },
}

impl FrameMessage {
    /// Discriminator value of the resize notification.
    pub const RESIZE_TAG: &'static str = "resize";

    /// Parse an untrusted payload. Anything that is not a well-formed resize
    /// notification (unknown tag, negative or fractional height) yields `None`.
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        Self::deserialize(payload).ok()
    }
}
