use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use thiserror::Error;

/// Misuse of a component's lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    #[error("component `{0}` is unmounted")]
    Unmounted(String),
    #[error("component `{0}` is already rendering")]
    ReentrantRender(String),
    #[error("component `{0}` cannot commit while rendering")]
    CommitDuringRender(String),
}

pub(crate) fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Runs `f`, logging instead of unwinding if it panics. Returns false on panic.
pub(crate) fn run_guarded(what: &str, f: impl FnOnce()) -> bool {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(err) => {
            log::error!("{what} panicked: {}", panic_message(err.as_ref()));
            false
        }
    }
}
