use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::models::crop::CroppedFile;
use crate::domain::models::drawing::DrawingFile;
use crate::domain::models::selected_file::SelectedFile;

/// Observable state of a crop queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum CropQueueState {
    Idle,
    AwaitingCrop(usize),
    Completed,
    Cancelled,
}

/// Result of handing a selection to the queue
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// Cropping disabled: the selection is the final output, unchanged
    Bypassed(Vec<DrawingFile>),
    /// The queue is waiting for the first crop of `total` files
    Started { total: usize },
    /// Nothing to crop; the queue completed with an empty output
    Empty,
}

/// Result of appending one cropped file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropProgress {
    Advanced { index: usize, total: usize },
    Completed { total: usize },
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    // The current index is always `cropped.len()`
    Awaiting {
        files: Vec<SelectedFile>,
        cropped: Vec<CroppedFile>,
    },
    Completed(Vec<CroppedFile>),
    Cancelled,
}

/// Ordered sequence of files awaiting interactive crop.
///
/// Files are never reordered: the i-th cropped output always comes from the
/// i-th selected file. Every `select` starts a new run; the run counter lets
/// callers recognise results that belong to an abandoned run.
#[derive(Debug, Default)]
pub struct CropQueue {
    phase: Phase,
    run: u64,
}

impl CropQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CropQueueState {
        match &self.phase {
            Phase::Idle => CropQueueState::Idle,
            Phase::Awaiting { cropped, .. } => CropQueueState::AwaitingCrop(cropped.len()),
            Phase::Completed(_) => CropQueueState::Completed,
            Phase::Cancelled => CropQueueState::Cancelled,
        }
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Awaiting { .. })
    }

    /// Number of files in the current run
    pub fn total(&self) -> usize {
        match &self.phase {
            Phase::Awaiting { files, .. } => files.len(),
            Phase::Completed(cropped) => cropped.len(),
            Phase::Idle | Phase::Cancelled => 0,
        }
    }

    /// Start a new run over `files`, discarding whatever the previous run held
    pub fn select(&mut self, files: Vec<SelectedFile>, enable_crop: bool) -> SelectionOutcome {
        self.run += 1;

        if !enable_crop {
            self.phase = Phase::Idle;
            return SelectionOutcome::Bypassed(files.into_iter().map(DrawingFile::from).collect());
        }

        if files.is_empty() {
            self.phase = Phase::Completed(Vec::new());
            return SelectionOutcome::Empty;
        }

        let total = files.len();
        self.phase = Phase::Awaiting {
            files,
            cropped: Vec::with_capacity(total),
        };
        SelectionOutcome::Started { total }
    }

    /// File awaiting crop, with its index in the selection
    pub fn current(&self) -> Option<(usize, &SelectedFile)> {
        match &self.phase {
            Phase::Awaiting { files, cropped } => {
                let index = cropped.len();
                files.get(index).map(|file| (index, file))
            }
            _ => None,
        }
    }

    /// Cropped files accumulated by the current run
    pub fn output(&self) -> &[CroppedFile] {
        match &self.phase {
            Phase::Awaiting { cropped, .. } | Phase::Completed(cropped) => cropped,
            Phase::Idle | Phase::Cancelled => &[],
        }
    }

    /// Append the crop of the current file and advance
    pub fn accept(&mut self, cropped_file: CroppedFile) -> Result<CropProgress, DomainError> {
        let state = self.state();
        let Phase::Awaiting { files, cropped } = &mut self.phase else {
            return Err(DomainError::InvalidState(format!(
                "no crop in progress (state: {:?})",
                state
            )));
        };

        let index = cropped.len();
        if cropped_file.source_index != index {
            return Err(DomainError::InvalidState(format!(
                "cropped file belongs to index {}, queue is at index {}",
                cropped_file.source_index, index
            )));
        }

        cropped.push(cropped_file);
        let total = files.len();

        if cropped.len() < total {
            return Ok(CropProgress::Advanced {
                index: cropped.len(),
                total,
            });
        }

        let finished = std::mem::take(cropped);
        self.phase = Phase::Completed(finished);
        Ok(CropProgress::Completed { total })
    }

    /// Abandon the run, discarding every crop confirmed so far.
    /// Returns how many cropped files were discarded.
    pub fn cancel(&mut self) -> Result<usize, DomainError> {
        match std::mem::take(&mut self.phase) {
            Phase::Awaiting { cropped, .. } => {
                self.phase = Phase::Cancelled;
                Ok(cropped.len())
            }
            other => {
                self.phase = other;
                Err(DomainError::InvalidState(format!(
                    "nothing to cancel (state: {:?})",
                    self.state()
                )))
            }
        }
    }

    /// Hand over the completed output, returning the queue to idle
    pub fn take_output(&mut self) -> Option<Vec<CroppedFile>> {
        match std::mem::take(&mut self.phase) {
            Phase::Completed(cropped) => Some(cropped),
            other => {
                self.phase = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::crop::CropRegion;

    fn files(count: usize) -> Vec<SelectedFile> {
        (0..count)
            .map(|index| SelectedFile::new(format!("drawing-{index}.png"), None, vec![index as u8]))
            .collect()
    }

    fn crop_of(queue: &CropQueue) -> CroppedFile {
        let (index, file) = queue.current().expect("queue should be awaiting a crop");
        CroppedFile::new(file.name.clone(), file.bytes.clone(), CropRegion::new(0, 0, 1, 1), index)
    }

    #[test]
    fn confirming_every_file_keeps_selection_order() {
        for count in 0..5 {
            let mut queue = CropQueue::new();
            queue.select(files(count), true);

            for expected in 0..count {
                assert_eq!(queue.state(), CropQueueState::AwaitingCrop(expected));
                assert_eq!(queue.output().len(), expected);
                let cropped = crop_of(&queue);
                queue.accept(cropped).unwrap();
            }

            assert_eq!(queue.state(), CropQueueState::Completed);
            let output = queue.take_output().unwrap();
            assert_eq!(output.len(), count);
            for (index, cropped) in output.iter().enumerate() {
                assert_eq!(cropped.name, format!("drawing-{index}.png"));
                assert_eq!(cropped.source_index, index);
            }
            assert_eq!(queue.state(), CropQueueState::Idle);
        }
    }

    #[test]
    fn cancelling_discards_confirmed_crops() {
        for cancel_at in 0..3 {
            let mut queue = CropQueue::new();
            queue.select(files(3), true);
            for _ in 0..cancel_at {
                let cropped = crop_of(&queue);
                queue.accept(cropped).unwrap();
            }

            assert_eq!(queue.cancel().unwrap(), cancel_at);
            assert_eq!(queue.state(), CropQueueState::Cancelled);
            assert!(queue.output().is_empty());
            assert!(queue.take_output().is_none());
        }
    }

    #[test]
    fn disabled_crop_passes_selection_through() {
        let mut queue = CropQueue::new();
        let selection = files(3);

        let outcome = queue.select(selection.clone(), false);
        let SelectionOutcome::Bypassed(output) = outcome else {
            panic!("expected bypass, got {:?}", outcome);
        };

        let expected: Vec<DrawingFile> = selection.into_iter().map(DrawingFile::from).collect();
        assert_eq!(output, expected);
        assert_eq!(queue.state(), CropQueueState::Idle);
        assert!(queue.current().is_none());
    }

    #[test]
    fn rejects_crop_for_a_different_index() {
        let mut queue = CropQueue::new();
        queue.select(files(2), true);

        let mut cropped = crop_of(&queue);
        cropped.source_index = 1;
        assert!(matches!(queue.accept(cropped), Err(DomainError::InvalidState(_))));
        assert_eq!(queue.state(), CropQueueState::AwaitingCrop(0));
    }

    #[test]
    fn cancel_outside_a_run_is_rejected() {
        let mut queue = CropQueue::new();
        assert!(queue.cancel().is_err());
        assert_eq!(queue.state(), CropQueueState::Idle);

        queue.select(Vec::new(), true);
        assert!(queue.cancel().is_err());
        assert_eq!(queue.state(), CropQueueState::Completed);
    }

    #[test]
    fn reselecting_starts_a_new_run() {
        let mut queue = CropQueue::new();
        queue.select(files(3), true);
        let first_run = queue.run();
        let cropped = crop_of(&queue);
        queue.accept(cropped).unwrap();

        queue.select(files(2), true);
        assert!(queue.run() > first_run);
        assert_eq!(queue.state(), CropQueueState::AwaitingCrop(0));
        assert_eq!(queue.total(), 2);
        assert!(queue.output().is_empty());
    }
}
