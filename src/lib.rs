//! TAP Help menu for notebook hosts.
//!
//! Builds a static help menu, fills its install submenu with the newest
//! weekly and production releases listed by the package index, renders the
//! tree by cloning the host's own menu elements and binds snippet insertion
//! to the entries that carry one.
//!
//! The host is reached only through the traits in [`host`]; [`host::memory`]
//! provides an in-memory implementation.

pub mod config;
pub mod host;
pub mod menu;
pub mod releases;
pub mod session;
pub mod util;

pub use config::Config;
pub use session::{MenuSession, SessionReport, SessionState};
