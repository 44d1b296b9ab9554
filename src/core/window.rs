use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use winit::window::Window;

use crate::traits::{FrameCallback, FrameScheduler, Viewport};

use super::frame_queue::FrameQueue;

/// Backing-store size shared between the viewport and whoever draws into it
pub type BackingSize = Rc<Cell<(u32, u32)>>;

/// Viewport over a winit window
pub struct WindowViewport {
    window: Arc<Window>,
    backing: BackingSize,
}

impl WindowViewport {
    /// Start with `backing` as the current backing-store size
    pub fn new(window: Arc<Window>, backing: BackingSize) -> Self {
        Self { window, backing }
    }
}

impl Viewport for WindowViewport {
    fn backing_size(&self) -> (u32, u32) {
        self.backing.get()
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing.set((width, height));
    }

    fn viewport_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Frame scheduler that queues callbacks and asks the window for a redraw.
///
/// The host runs the queue on `WindowEvent::RedrawRequested`; winit merges
/// repeated redraw requests into one event.
pub struct WindowScheduler {
    queue: FrameQueue,
    window: Arc<Window>,
}

impl WindowScheduler {
    pub fn new(queue: FrameQueue, window: Arc<Window>) -> Self {
        Self { queue, window }
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self, callback: FrameCallback) {
        self.queue.request_frame(callback);
        self.window.request_redraw();
    }
}
