//! Icebreakr - proximity engagement engine
//!
//! Icebreakr periodically scans a profile directory for discoverable nearby
//! users who share interest tags with the local user, and dispatches at most
//! one engagement notification per peer per cooldown window.

pub mod domain;
pub mod engage;
pub mod error;
pub mod services;

pub use error::{IcebreakrError, Result};
