//! Typed HTTP client for the wall service, plus the dashboard-side
//! moderation state that only changes once the server has confirmed a
//! mutation.

pub mod client;
pub mod error;
pub mod moderation;

pub use client::WallClient;
pub use error::ClientError;
pub use moderation::ModerationView;
