//! Multi-step operations shared by handlers.

pub mod invites;
