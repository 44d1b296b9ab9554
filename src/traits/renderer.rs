use anyhow::Result;
use glam::Mat4;

/// Draws the structure with a given view transform.
///
/// Errors are not handled by the controller; they surface from the frame
/// callback to whoever runs the frame.
pub trait StructureRenderer {
    fn draw(&mut self, view: &Mat4) -> Result<()>;
}

impl<F> StructureRenderer for F
where
    F: FnMut(&Mat4) -> Result<()>,
{
    fn draw(&mut self, view: &Mat4) -> Result<()> {
        self(view)
    }
}
