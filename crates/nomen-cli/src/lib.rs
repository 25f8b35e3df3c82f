//! Library interface for the nomen command-line host

pub mod config;
pub mod session;

pub use session::{ResolvedName, Session};
