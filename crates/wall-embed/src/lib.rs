//! Widget embed and resize handshake.
//!
//! The widget frame measures its content and posts a [`FrameMessage`] to the
//! page embedding it; the page checks the sender's origin and resizes the
//! iframe. Both halves are modelled here in Rust ([`reporter`], [`surface`],
//! [`listener`]) and emitted as JavaScript by [`script`] from the same
//! constants, so the browser code and the tested model cannot drift apart.
//!
//! [`FrameMessage`]: wall_types::events::FrameMessage

pub mod listener;
pub mod origin;
pub mod reporter;
pub mod script;
pub mod surface;

pub use origin::WidgetOrigin;

/// Id of the element whose scroll height the widget reports.
pub const ROOT_ELEMENT_ID: &str = "widget-root";

/// Id prefix of the container element the embed snippet creates.
pub const CONTAINER_ID_PREFIX: &str = "testimonial-wall";
