use crate::error::ProcessingFailed;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn check_cancelled(&self, stage: &'static str) -> Result<(), ProcessingFailed> {
        if self.is_cancelled() {
            return Err(ProcessingFailed::Cancelled { stage });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CancellationToken;

    #[test]
    fn clones_share_cancellation() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(observer.check_cancelled("parse").is_ok());

        token.cancel();

        assert!(observer.is_cancelled());
        let err = observer.check_cancelled("parse").unwrap_err();
        assert_eq!(err.to_string(), "processing cancelled at stage=parse");
    }
}
