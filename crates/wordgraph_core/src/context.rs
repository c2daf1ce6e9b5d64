//! Per-call execution context.
//!
//! # Responsibility
//! - Carry the trusted caller profile into every engine operation.
//! - Propagate caller cancellation and deadlines down to store work.
//!
//! # Invariants
//! - A context is checked before any store access and on every traversal step.
//! - Once cancelled, a token stays cancelled.

use crate::model::profile::Profile;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Reason an operation stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineExceeded,
}

impl Display for Interrupt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "operation cancelled by caller"),
            Self::DeadlineExceeded => write!(f, "operation deadline exceeded"),
        }
    }
}

impl Error for Interrupt {}

/// Caller identity plus abort conditions for one unit of work.
#[derive(Debug, Clone)]
pub struct CallContext {
    profile: Profile,
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl CallContext {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            deadline: None,
            cancel: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Fails when the caller cancelled or the deadline has passed.
    pub fn checkpoint(&self) -> Result<(), Interrupt> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(Interrupt::Cancelled);
        }
        if self
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
        {
            return Err(Interrupt::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CallContext, CancelToken, Interrupt};
    use crate::model::profile::Profile;
    use std::time::{Duration, Instant};

    #[test]
    fn fresh_context_passes_checkpoint() {
        let ctx = CallContext::new(Profile::member("u1")).with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.checkpoint(), Ok(()));
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancelToken::new();
        let ctx = CallContext::new(Profile::member("u1")).with_cancel_token(token.clone());
        token.cancel();
        assert_eq!(ctx.checkpoint(), Err(Interrupt::Cancelled));
    }

    #[test]
    fn past_deadline_is_reported() {
        let ctx = CallContext::new(Profile::admin("root")).with_deadline(Instant::now());
        assert_eq!(ctx.checkpoint(), Err(Interrupt::DeadlineExceeded));
    }
}
