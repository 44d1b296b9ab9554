pub mod renderer;
pub mod scheduler;
pub mod surface;
pub mod viewport;

pub use renderer::*;
pub use scheduler::*;
pub use surface::*;
pub use viewport::*;
