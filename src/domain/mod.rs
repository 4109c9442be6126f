//! Domain types - profiles, filter criteria, and loop state.

pub mod profile;
pub mod state;

pub use profile::*;
pub use state::*;
