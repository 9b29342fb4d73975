//! Progress reporting and cooperative cancellation.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use crate::error::{GuessError, GuessResult};

pub trait ExecMonitor {
    /// Fails with [`GuessError::Canceled`] once cancellation was requested.
    fn check_canceled(&self) -> GuessResult<()>;

    /// Reports progress as a fraction in `[0, 1]`.
    fn set_progress(&self, _fraction: f64) {}
}

/// Monitor that never cancels and ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl ExecMonitor for NoopMonitor {
    fn check_canceled(&self) -> GuessResult<()> {
        Ok(())
    }
}

/// Shareable cancellation flag that also records the last reported progress.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Arc<AtomicBool>,
    progress_bits: Arc<AtomicU64>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress_bits.load(Ordering::Relaxed))
    }
}

impl ExecMonitor for CancelToken {
    fn check_canceled(&self) -> GuessResult<()> {
        if self.is_canceled() {
            Err(GuessError::Canceled)
        } else {
            Ok(())
        }
    }

    fn set_progress(&self, fraction: f64) {
        let clamped = fraction.clamp(0.0, 1.0);
        self.progress_bits.store(clamped.to_bits(), Ordering::Relaxed);
    }
}

impl<M: ExecMonitor + ?Sized> ExecMonitor for &M {
    fn check_canceled(&self) -> GuessResult<()> {
        (**self).check_canceled()
    }

    fn set_progress(&self, fraction: f64) {
        (**self).set_progress(fraction)
    }
}
