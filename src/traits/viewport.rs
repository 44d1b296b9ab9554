/// Drawing surface whose backing store may lag behind the window size
pub trait Viewport {
    /// Current backing-store size in pixels
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing store
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Size the host window currently offers
    fn viewport_size(&self) -> (u32, u32);
}
