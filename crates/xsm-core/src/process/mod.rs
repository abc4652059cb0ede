mod backends;
mod errors;
mod traits;
mod types;

pub use backends::SystemProcessTable;
pub use errors::ProcessError;
pub use traits::ProcessTable;
pub use types::ProcessInfo;
