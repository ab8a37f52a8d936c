//! Process-termination seam for the immediate update path.
//!
//! An immediate-priority update that did not complete must not leave the
//! application running on a stale build, so the immediate path shuts the
//! process down on any start-update error. The shutdown itself sits behind
//! the [`Terminator`] trait so the orchestrator can be driven in tests
//! without killing the test runner.

/// Something that can end the process on behalf of the immediate path.
pub trait Terminator: Send + Sync {
    /// Terminates the application. Production implementations do not return.
    fn terminate(&self);
}

/// Default terminator: exits the process with a non-zero status.
#[derive(Debug, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self) {
        std::process::exit(1);
    }
}
