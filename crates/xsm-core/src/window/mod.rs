mod backends;
mod errors;
mod traits;
mod types;

pub use backends::WmctrlBackend;
pub use errors::WindowError;
pub use traits::WindowManager;
pub use types::{InvalidWindowId, RunningWindow, WindowId};
