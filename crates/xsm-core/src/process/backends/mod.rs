//! Process table backend implementations.

mod system;

pub use system::SystemProcessTable;
