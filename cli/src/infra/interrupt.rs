//! Infrastructure implementation of the `InterruptPoll` port.
//!
//! A ctrl-c listener sets an atomic flag; the workflow polls it at defined
//! checkpoints. Cancellation is cooperative — nothing is interrupted
//! mid-step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::ports::InterruptPoll;

/// Production `InterruptPoll` backed by a ctrl-c signal listener.
pub struct CtrlCPoll {
    raised: Arc<AtomicBool>,
}

impl CtrlCPoll {
    /// Install the signal listener. Must be called from within a tokio
    /// runtime.
    #[must_use]
    pub fn install() -> Self {
        let raised = Arc::new(AtomicBool::new(false));
        let listener = Arc::clone(&raised);
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                listener.store(true, Ordering::SeqCst);
            }
        });
        Self { raised }
    }

    /// Poll without a signal handler attached (tests).
    #[must_use]
    pub fn detached() -> Self {
        Self {
            raised: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Raise the flag by hand (tests).
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }
}

impl InterruptPoll for CtrlCPoll {
    fn interrupted(&self) -> bool {
        // Polling consumes the signal; a declined abort confirmation must
        // not re-trigger at the next checkpoint.
        self.raised.swap(false, Ordering::SeqCst)
    }
}
