//! Explicit per-batch bookkeeping.

use serde::Serialize;

use crate::error::PipelineResult;
use crate::types::CompressionOutcome;

/// Where the current batch stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPhase {
    /// No selection yet
    Idle,
    /// Waiting on at least one pipeline of the current generation
    Collecting,
    /// Every pipeline finished and at least one produced an outcome
    Ready,
    /// Every pipeline finished but all of them failed
    Complete,
}

/// A pipeline result posted to the coordinator's mailbox.
#[derive(Debug)]
pub struct Completion {
    /// Generation the pipeline was launched for
    pub generation: u64,
    /// Submission index within that generation
    pub index: usize,
    pub result: PipelineResult<CompressionOutcome>,
}

/// One image that did not make it through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct FailedImage {
    pub index: usize,
    pub name: String,
    pub message: String,
}

/// Counters and results for one selection.
///
/// Outcomes are stored by submission index, so [`BatchState::outcomes`]
/// follows the order the files were selected in no matter which pipeline
/// finished first.
#[derive(Debug, Default)]
pub struct BatchState {
    generation: u64,
    total_expected: usize,
    completed_count: usize,
    slots: Vec<Slot>,
    failures: Vec<FailedImage>,
}

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Pending,
    Done(Box<CompressionOutcome>),
    Failed,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation expecting `total_expected` completions.
    ///
    /// Everything recorded for the previous generation is dropped.
    pub fn begin(&mut self, total_expected: usize) -> u64 {
        self.generation += 1;
        self.total_expected = total_expected;
        self.completed_count = 0;
        self.slots = (0..total_expected).map(|_| Slot::Pending).collect();
        self.failures.clear();
        self.generation
    }

    /// Record a completion. Returns `false` if it was discarded.
    ///
    /// Completions from an older generation, with an index outside the
    /// batch, or for an index that already completed are ignored, so
    /// `completed_count` can never exceed `total_expected`.
    pub fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation {
            tracing::debug!(
                "Discarding stale completion (generation {} != {})",
                completion.generation,
                self.generation
            );
            return false;
        }

        let Some(slot) = self.slots.get_mut(completion.index) else {
            tracing::debug!("Discarding completion with index {}", completion.index);
            return false;
        };
        if !matches!(slot, Slot::Pending) {
            tracing::debug!("Duplicate completion for index {}", completion.index);
            return false;
        }

        match completion.result {
            Ok(outcome) => {
                *slot = Slot::Done(Box::new(outcome));
            }
            Err(e) => {
                tracing::warn!("{}", e);
                *slot = Slot::Failed;
                self.failures.push(FailedImage {
                    index: completion.index,
                    name: e.file_name().to_string(),
                    message: e.to_string(),
                });
            }
        }
        self.completed_count += 1;
        true
    }

    pub fn phase(&self) -> BatchPhase {
        if self.generation == 0 {
            BatchPhase::Idle
        } else if self.completed_count < self.total_expected {
            BatchPhase::Collecting
        } else if self.outcome_count() > 0 {
            BatchPhase::Ready
        } else {
            BatchPhase::Complete
        }
    }

    /// Whether the bulk archive can be offered.
    pub fn is_export_ready(&self) -> bool {
        self.phase() == BatchPhase::Ready
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn total_expected(&self) -> usize {
        self.total_expected
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    /// Successful outcomes in submission order.
    pub fn outcomes(&self) -> Vec<&CompressionOutcome> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Done(outcome) => Some(outcome.as_ref()),
                _ => None,
            })
            .collect()
    }

    pub fn outcome_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Done(_)))
            .count()
    }

    /// Failures in the order they completed.
    pub fn failures(&self) -> &[FailedImage] {
        &self.failures
    }
}
