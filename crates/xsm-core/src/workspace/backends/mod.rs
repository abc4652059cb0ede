//! Workspace control backend implementations.

mod gnome;

pub use gnome::GnomeWorkspaces;
