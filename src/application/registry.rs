//! Per-frontend dispatcher and exception-handler registries

use std::sync::Arc;

use crate::application::runtime::Runtime;
use crate::domain::{CommandResult, Failure, Frontend};

/// Handles the current request; invoked without arguments beyond the runtime.
pub type Dispatcher = Arc<dyn Fn(&mut Runtime<'_>) -> CommandResult + Send + Sync>;

/// Presents a failure for the current frontend and returns the exit status.
pub type ExceptionHandler = Arc<dyn Fn(&mut Runtime<'_>, &Failure) -> i32 + Send + Sync>;

/// Frontend → entry mapping. The CLI entry always exists and is the
/// fallback for a frontend without its own entry.
#[derive(Clone)]
pub struct FrontendRegistry<T> {
    cli: T,
    web: Option<T>,
}

impl<T> FrontendRegistry<T> {
    pub fn new(cli: T) -> Self {
        Self { cli, web: None }
    }

    pub fn set(&mut self, frontend: Frontend, entry: T) {
        match frontend {
            Frontend::Cli => self.cli = entry,
            Frontend::Web => self.web = Some(entry),
        }
    }

    /// Entry registered for exactly `frontend`.
    pub fn get(&self, frontend: Frontend) -> Option<&T> {
        match frontend {
            Frontend::Cli => Some(&self.cli),
            Frontend::Web => self.web.as_ref(),
        }
    }

    /// Entry for `frontend`, falling back to the CLI entry.
    pub fn select(&self, frontend: Frontend) -> &T {
        self.get(frontend).unwrap_or(&self.cli)
    }
}
