use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::input::{EventKind, EventResponse, InputEvent};

/// Callback registered for one kind of input event
pub type Listener = Box<dyn FnMut(&InputEvent) -> EventResponse>;

/// Input surface shared between the host that feeds it and the subscriptions on it
pub type SharedSurface = Rc<RefCell<dyn InputSurface>>;

/// Handle returned by [`InputSurface::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Something that delivers pointer, wheel and keyboard events
pub trait InputSurface {
    fn subscribe(&mut self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: ListenerId);
}

/// A registered listener, removed from its surface when dropped
pub struct Subscription {
    surface: Weak<RefCell<dyn InputSurface>>,
    id: ListenerId,
}

impl Subscription {
    pub fn new(surface: &SharedSurface, kind: EventKind, listener: Listener) -> Self {
        let id = surface.borrow_mut().subscribe(kind, listener);
        Self {
            surface: Rc::downgrade(surface),
            id,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };
        // A surface that is mid-dispatch cannot be modified; its listener stays as a no-op
        match surface.try_borrow_mut() {
            Ok(mut surface) => surface.unsubscribe(self.id),
            Err(_) => log::warn!("listener {:?} outlives its subscription", self.id),
        };
    }
}
