//! Assemble module: folds physical lines into logical entries.

pub mod cancel;
pub mod group;

pub use cancel::{CancellationSignal, Never};
pub use group::EntryAssembler;
