use std::cell::Cell;

use hibp_range_check::{CompletionEvent, ProgressReporter, UnitOutcome};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Terminal progress bar on stderr.
pub struct BarReporter {
    bar: ProgressBar,
    compromised: Cell<usize>,
    failed: Cell<usize>,
}

impl BarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar, compromised: Cell::new(0), failed: Cell::new(0) }
    }

    fn message(&self) -> String {
        match self.failed.get() {
            0 => format!("{} compromised", self.compromised.get()),
            failed => format!("{} compromised, {} failed", self.compromised.get(), failed),
        }
    }
}

impl ProgressReporter for BarReporter {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message(self.message());
    }

    fn on_complete(&self, event: &CompletionEvent) {
        match event.outcome {
            UnitOutcome::Compromised { .. } => self.compromised.set(self.compromised.get() + 1),
            UnitOutcome::Failed => self.failed.set(self.failed.get() + 1),
            UnitOutcome::Safe => {}
        }
        self.bar.set_message(self.message());
        self.bar.inc(1);
    }

    fn on_group_complete(&self, group: usize) {
        debug!(group, "progress group complete");
    }

    fn on_batch_finish(&self) {
        self.bar.finish_and_clear();
    }
}
