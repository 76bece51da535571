//! Cooperative cancellation signals.
//!
//! A computation only ever reads a signal. Raising it, and deciding what to do with the
//! resulting `Interrupted` error, stays with the caller.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Something the computation can poll to learn that it should stop starting new work.
pub trait CancelSignal: Sync {
    fn is_cancelled(&self) -> bool;
}

/// A signal that is never raised.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl CancelSignal for Never {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Receiving side of a quit channel.
///
/// Closing the channel cancels every computation polling it, and so does dropping the last
/// sender: a quit channel nobody can send on any more reads as raised. A single sent `()`
/// also cancels, but it is consumed by the first poll that sees it.
impl CancelSignal for kanal::Receiver<()> {
    fn is_cancelled(&self) -> bool {
        !matches!(self.try_recv(), Ok(None))
    }
}

/// Cloneable one-shot flag; all clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}
