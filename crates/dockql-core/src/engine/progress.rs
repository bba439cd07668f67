/// An event emitted by a scoring workflow as it advances.
#[derive(Debug, Clone)]
pub enum Progress {
    /// A single decoy is being scored against the reference.
    ScoringStart,
    /// The run produced its metrics.
    ScoringFinish,

    /// A batch of decoys is about to be scored against one reference.
    BatchStart { decoys: u64 },
    /// One decoy of the batch has been processed, successfully or not.
    DecoyScored,
    /// Every decoy of the batch has been processed.
    BatchFinish,

    /// A free-form note, such as a per-decoy failure.
    Note(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards workflow progress events to an optional callback.
///
/// The default reporter discards everything, so library callers pay nothing
/// unless they ask for feedback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
