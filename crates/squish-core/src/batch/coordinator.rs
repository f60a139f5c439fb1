//! Batch coordination: fan out one pipeline per image, collect results.
//!
//! The coordinator is the only owner of [`BatchState`]. Pipelines run on the
//! blocking pool inside a [`JoinSet`] and post a [`Completion`] to a bounded
//! mailbox; the coordinator applies completions as it drains the mailbox.
//! A new selection aborts the previous task set and bumps the generation, so
//! anything still in flight from the old selection is discarded on arrival.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::error::PipelineError;
use crate::pipeline::ImageCompressor;
use crate::types::SelectedFile;

use super::channel::bounded_channel;
use super::state::{BatchPhase, BatchState, Completion};

/// Progress notification for one applied completion.
#[derive(Debug, Clone)]
pub struct BatchEvent {
    /// Submission index of the image
    pub index: usize,
    /// File name of the image
    pub name: String,
    /// `None` on success, the error message on failure
    pub error: Option<String>,
    /// Completions applied so far, including this one
    pub completed: usize,
    pub total: usize,
    /// Phase after applying this completion
    pub phase: BatchPhase,
}

impl BatchEvent {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Drives one selection at a time through the compression pipeline.
pub struct BatchCoordinator {
    compressor: Arc<ImageCompressor>,
    state: BatchState,
    tasks: JoinSet<()>,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
}

impl BatchCoordinator {
    pub fn new(config: &Config) -> Self {
        Self::with_compressor(Arc::new(ImageCompressor::new(config)), config)
    }

    pub fn with_compressor(compressor: Arc<ImageCompressor>, config: &Config) -> Self {
        let (tx, rx) = bounded_channel(&config.batch);
        Self {
            compressor,
            state: BatchState::new(),
            tasks: JoinSet::new(),
            tx,
            rx,
        }
    }

    /// Start a new batch for `files`.
    ///
    /// Only files whose MIME type starts with `image/` are submitted. If
    /// there are none, nothing changes and `None` is returned; otherwise the
    /// previous batch is cancelled and the new generation id is returned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select(&mut self, files: Vec<SelectedFile>) -> Option<u64> {
        let selected = files.len();
        let images: Vec<SelectedFile> = files.into_iter().filter(|f| f.is_image()).collect();
        if images.len() < selected {
            tracing::debug!(
                "Skipping {} non-image file(s) in selection",
                selected - images.len()
            );
        }
        if images.is_empty() {
            tracing::debug!("Selection has no images, keeping current batch");
            return None;
        }

        if !self.tasks.is_empty() {
            tracing::debug!(
                "Cancelling {} pipeline(s) from generation {}",
                self.tasks.len(),
                self.state.generation()
            );
        }
        self.tasks.abort_all();
        self.tasks = JoinSet::new();

        let generation = self.state.begin(images.len());
        tracing::info!(
            "Starting batch {} with {} image(s)",
            generation,
            images.len()
        );

        for (index, file) in images.into_iter().enumerate() {
            let compressor = Arc::clone(&self.compressor);
            let tx = self.tx.clone();
            self.tasks.spawn(async move {
                let name = file.name.clone();
                let result =
                    match tokio::task::spawn_blocking(move || compressor.compress(&file)).await {
                        Ok(result) => result,
                        Err(e) => Err(PipelineError::Blocking {
                            name,
                            message: e.to_string(),
                        }),
                    };
                // The receiver lives as long as the coordinator.
                let _ = tx
                    .send(Completion {
                        generation,
                        index,
                        result,
                    })
                    .await;
            });
        }

        Some(generation)
    }

    /// Wait for the next completion of the current batch and apply it.
    ///
    /// Returns `None` once the batch is no longer collecting (or nothing was
    /// ever selected).
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        while self.state.phase() == BatchPhase::Collecting {
            let completion = self.rx.recv().await?;
            let index = completion.index;
            let (name, error) = match &completion.result {
                Ok(outcome) => (outcome.original_name.clone(), None),
                Err(e) => (e.file_name().to_string(), Some(e.to_string())),
            };

            if self.state.apply(completion) {
                tracing::debug!(
                    "Completed {}/{}: {}",
                    self.state.completed_count(),
                    self.state.total_expected(),
                    name
                );
                return Some(BatchEvent {
                    index,
                    name,
                    error,
                    completed: self.state.completed_count(),
                    total: self.state.total_expected(),
                    phase: self.state.phase(),
                });
            }
        }
        None
    }

    /// Drain the mailbox until the current batch finishes.
    pub async fn run_to_completion(&mut self) -> &BatchState {
        while self.next_event().await.is_some() {}
        &self.state
    }

    pub fn state(&self) -> &BatchState {
        &self.state
    }

    pub fn phase(&self) -> BatchPhase {
        self.state.phase()
    }

    /// Whether the bulk archive can be offered for the current batch.
    pub fn is_export_ready(&self) -> bool {
        self.state.is_export_ready()
    }
}

impl Drop for BatchCoordinator {
    fn drop(&mut self) {
        self.tasks.abort_all();
    }
}
