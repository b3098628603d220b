//! Time and cancellation budget for a single analysis

use crate::error::{AnalysisError, AnalysisResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Deadline plus cancellation, checked cooperatively by the parser walk
/// and between pipeline stages
#[derive(Debug, Clone)]
pub struct Budget {
    deadline: Option<Instant>,
    limit: Option<Duration>,
    cancel: CancelFlag,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self {
            deadline: None,
            limit: None,
            cancel: CancelFlag::new(),
        }
    }

    /// Start a budget now. `limit` of `None` means no deadline.
    pub fn start(limit: Option<Duration>, cancel: CancelFlag) -> Self {
        Self {
            deadline: limit.map(|l| Instant::now() + l),
            limit,
            cancel,
        }
    }

    pub fn check(&self) -> AnalysisResult<()> {
        if self.cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(AnalysisError::Timeout {
                    limit_ms: self.limit.map(|l| l.as_millis() as u64).unwrap_or(0),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_expires() {
        assert!(Budget::unlimited().check().is_ok());
    }

    #[test]
    fn test_cancel_is_shared() {
        let flag = CancelFlag::new();
        let budget = Budget::start(None, flag.clone());
        assert!(budget.check().is_ok());
        flag.cancel();
        assert_eq!(budget.check(), Err(AnalysisError::Cancelled));
    }

    #[test]
    fn test_zero_deadline_times_out() {
        let budget = Budget::start(Some(Duration::ZERO), CancelFlag::new());
        assert_eq!(
            budget.check(),
            Err(AnalysisError::Timeout { limit_ms: 0 })
        );
    }
}
