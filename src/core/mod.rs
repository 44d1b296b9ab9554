pub mod controller;
pub mod frame_queue;
pub mod input;
pub mod input_adapter;
pub mod router;
pub mod window;

pub use controller::{CameraController, ControllerBuilder, SharedController};
pub use frame_queue::FrameQueue;
pub use input::{EventKind, EventResponse, InputEvent, PointerButton};
pub use input_adapter::WinitInput;
pub use router::EventRouter;
pub use window::{BackingSize, WindowScheduler, WindowViewport};
