//! Window manager backend implementations.

mod wmctrl;

pub use wmctrl::WmctrlBackend;
