use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::origin::WidgetOrigin;
use crate::surface::EmbedSurface;

/// Guarantees a handler is registered at most once for its lifetime, however
/// many times registration is attempted (repeated snippet execution,
/// re-renders).
#[derive(Debug, Default)]
pub struct ListenerGuard {
    registered: AtomicBool,
}

impl ListenerGuard {
    pub const fn new() -> Self {
        Self {
            registered: AtomicBool::new(false),
        }
    }

    /// Returns true only for the call that performs the registration.
    pub fn try_register(&self) -> bool {
        self.registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }
}

/// Index of a mounted iframe on a host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

/// A host page with any number of embedded walls sharing one message listener.
///
/// A message is only delivered to the surface whose frame sent it, so two
/// walls on the same page never resize each other.
#[derive(Debug)]
pub struct HostPage {
    origin: WidgetOrigin,
    guard: ListenerGuard,
    registrations: usize,
    surfaces: Vec<EmbedSurface>,
}

impl HostPage {
    pub fn new(origin: WidgetOrigin) -> Self {
        Self {
            origin,
            guard: ListenerGuard::new(),
            registrations: 0,
            surfaces: Vec::new(),
        }
    }

    /// Run the embed snippet for `slug`: create the surface and make sure the
    /// page-wide listener exists.
    pub fn mount(&mut self, slug: &str) -> FrameId {
        if self.guard.try_register() {
            self.registrations += 1;
        }
        self.surfaces.push(EmbedSurface::new(slug, self.origin.clone()));
        FrameId(self.surfaces.len() - 1)
    }

    /// Number of message listeners attached to the page.
    pub fn listener_count(&self) -> usize {
        self.registrations
    }

    pub fn surface(&self, id: FrameId) -> Option<&EmbedSurface> {
        self.surfaces.get(id.0)
    }

    /// Deliver a `message` event. `source` identifies the sending frame;
    /// `None` means the sender is not one of our iframes.
    pub fn dispatch(&mut self, source: Option<FrameId>, origin: &str, payload: &Value) -> bool {
        if !self.guard.is_registered() {
            return false;
        }
        match source.and_then(|id| self.surfaces.get_mut(id.0)) {
            Some(surface) => surface.handle_message(origin, payload),
            None => false,
        }
    }
}
