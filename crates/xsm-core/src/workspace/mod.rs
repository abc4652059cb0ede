mod backends;
mod capacity;
mod errors;
mod traits;

pub use backends::GnomeWorkspaces;
pub use capacity::{CapacityGuard, ensure_capacity};
pub use errors::WorkspaceError;
pub use traits::WorkspaceControl;
