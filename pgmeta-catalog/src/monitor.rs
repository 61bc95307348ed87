use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Monitor is handed to every catalog fetch.
/// The host cancels a long running refresh through any clone of it.
#[derive(Debug, Clone, Default)]
pub struct Monitor {
    cancelled: Arc<AtomicBool>,
}

impl Monitor {
    #[inline]
    pub fn new() -> Self {
        Monitor::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Returns `Error::Cancelled` once cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_cancel_shared() {
        let m1 = Monitor::new();
        let m2 = m1.clone();
        assert!(m1.check().is_ok());
        m2.cancel();
        assert!(m1.is_cancelled());
        assert!(m1.check().unwrap_err().is_cancelled());
    }
}
