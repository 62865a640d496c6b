use thiserror::Error;

/// A broken calling contract on a generator handle.
///
/// These are programming errors rather than producer failures, so the
/// generators panic with this message instead of returning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("value() called with no value available; pull() must return true first")]
    NoValue,
    #[error("generator resumed after its sequence ended")]
    Terminated,
    #[error("generator handle is disengaged; its producer was moved out")]
    Disengaged,
    #[error("producer produced twice within a single step")]
    Overfilled,
    #[error("producer finished without suspending at its produced value")]
    NotSuspended,
    #[error("cursor advanced past the end of the sequence")]
    PastEnd,
}

impl UsageError {
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        panic!("{self}")
    }
}
