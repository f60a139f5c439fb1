//! Batch coordination over a selection of files.
//!
//! - **state**: Counters and ordered outcomes for one selection
//! - **coordinator**: Launches pipelines and applies their completions
//! - **channel**: Bounded mailbox for completions

pub mod channel;
pub mod coordinator;
pub mod state;

pub use coordinator::{BatchCoordinator, BatchEvent};
pub use state::{BatchPhase, BatchState, Completion, FailedImage};
