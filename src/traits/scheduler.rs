use anyhow::Result;

/// Work to run at the next frame boundary
pub type FrameCallback = Box<dyn FnOnce() -> Result<()>>;

/// "Run on next frame" primitive of the host
pub trait FrameScheduler {
    /// Queue `callback` for the next frame. Never runs it synchronously.
    fn request_frame(&mut self, callback: FrameCallback);
}
