//! Job output classification.
//!
//! Decides whether a finished job succeeded, failed, or ran out of memory
//! from its exit code and output streams, and annotates the streams with
//! the diagnostics that led to that decision.

pub mod annotate;
pub mod classifier;
pub mod job;

pub use annotate::{MessageBuilder, SEPARATOR_PREFIX};
pub use classifier::{Classification, check_output, classify};
pub use job::{Job, MemoryJob};
