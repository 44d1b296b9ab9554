use crate::traits::{InputSurface, Listener, ListenerId};

use super::input::{EventKind, EventResponse, InputEvent};

/// In-process input surface: hosts feed events in, subscribed listeners get them
#[derive(Default)]
pub struct EventRouter {
    listeners: Vec<(ListenerId, EventKind, Listener)>,
    next_id: u64,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every listener of its kind, in subscription order
    pub fn dispatch(&mut self, event: &InputEvent) -> EventResponse {
        let kind = event.kind();
        self.listeners
            .iter_mut()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .fold(EventResponse::Ignored, |response, (_, _, listener)| {
                response.merge(listener(event))
            })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }
}

impl InputSurface for EventRouter {
    fn subscribe(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
    }
}
