//! Engagement engine - matching, cooldown bookkeeping, the per-cycle
//! algorithm, and the loop lifecycle manager.

pub mod cooldown;
pub mod cycle;
pub mod manager;
pub mod matching;

pub use cooldown::*;
pub use cycle::*;
pub use manager::*;
pub use matching::*;
