//! Completion events emitted by the batch runner.

/// How a single unit ended. Carries no password material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Compromised { count: u64 },
    Safe,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    /// Position of the password in the input.
    pub index: usize,
    /// Progress group the password belongs to (`index / group_size`).
    pub group: usize,
    /// Units finished so far, including this one.
    pub completed: usize,
    pub total: usize,
    pub outcome: UnitOutcome,
}

/// Observer for batch progress. Every method defaults to doing nothing
/// except [`on_complete`](ProgressReporter::on_complete).
pub trait ProgressReporter {
    fn on_batch_start(&self, _total: usize) {}

    fn on_complete(&self, event: &CompletionEvent);

    fn on_group_complete(&self, _group: usize) {}

    fn on_batch_finish(&self) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_complete(&self, _event: &CompletionEvent) {}
}
