use docqa_retrieval::{AnswerStage, IndexBuildResult, IndexPhase, IndexProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb.set_message(message.to_string());
    pb
}

/// Spinner that draws nothing when output is JSON
pub fn spinner(visible: bool, message: &str) -> ProgressBar {
    if visible {
        create_spinner(message)
    } else {
        ProgressBar::hidden()
    }
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("✗ {}", message));
}

/// Progress tracker for index builds
pub struct BuildProgress {
    _multi: MultiProgress,
    embeddings: ProgressBar,
    finalize: ProgressBar,
}

impl BuildProgress {
    pub fn new(visible: bool, total_chunks: usize) -> Self {
        if !visible {
            return Self {
                _multi: MultiProgress::new(),
                embeddings: ProgressBar::hidden(),
                finalize: ProgressBar::hidden(),
            };
        }

        let multi = MultiProgress::new();
        let embeddings = multi.add(create_progress_bar(total_chunks as u64, "Generating embeddings"));
        let finalize = multi.add(create_spinner("Waiting for embeddings..."));

        Self { _multi: multi, embeddings, finalize }
    }

    /// Apply one progress event from the index manager
    pub fn update(&self, progress: &IndexProgress) {
        match progress.phase {
            IndexPhase::Initializing => {
                self.embeddings.set_message(progress.message.clone());
            }
            IndexPhase::GeneratingEmbeddings => {
                self.embeddings.set_length(progress.total as u64);
                self.embeddings.set_position(progress.current as u64);
            }
            IndexPhase::Finalizing | IndexPhase::StoringData => {
                if !self.embeddings.is_finished() {
                    finish_success(&self.embeddings, &format!("Generated {} embeddings", progress_total(&self.embeddings)));
                }
                self.finalize.set_message(progress.message.clone());
            }
        }
    }

    pub fn finish(&self, result: &IndexBuildResult) {
        if !self.embeddings.is_finished() {
            finish_success(&self.embeddings, &format!("Generated {} embeddings", result.chunk_count));
        }
        let short_hash: String = result.index_hash.chars().take(8).collect();
        finish_success(&self.finalize, &format!("Index written (hash: {})", short_hash));
    }

    pub fn fail(&self, message: &str) {
        if !self.embeddings.is_finished() {
            finish_error(&self.embeddings, message);
        }
        self.finalize.finish_and_clear();
    }
}

fn progress_total(pb: &ProgressBar) -> u64 {
    pb.length().unwrap_or_else(|| pb.position())
}

/// Spinner that follows the stages of one answer
pub struct AnswerProgress {
    spinner: ProgressBar,
}

impl AnswerProgress {
    pub fn new(visible: bool) -> Self {
        Self { spinner: spinner(visible, "Preparing...") }
    }

    pub fn update(&self, stage: AnswerStage) {
        match stage {
            AnswerStage::Idle => {}
            AnswerStage::Retrieving => self.spinner.set_message("Searching the index..."),
            AnswerStage::Generating => self.spinner.set_message("Generating the answer..."),
            AnswerStage::Done => self.spinner.finish_and_clear(),
        }
    }

    pub fn fail(&self) {
        self.spinner.finish_and_clear();
    }
}
