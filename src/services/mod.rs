//! External collaborators - profile directory, settings store, and
//! notification dispatch.
//!
//! The engagement loop only sees these as traits; the in-memory
//! implementations here back the CLI and the test suite.

pub mod directory;
pub mod notify;
pub mod settings;

pub use directory::*;
pub use notify::*;
pub use settings::*;
