//! Execution contexts and the stack that tracks nested application runs

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::domain::http::Request;

/// Invocation mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frontend {
    Cli,
    Web,
}

impl fmt::Display for Frontend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frontend::Cli => write!(f, "cli"),
            Frontend::Web => write!(f, "web"),
        }
    }
}

/// Describes one application invocation: frontend, loaded config and,
/// for the web frontend, the inbound request.
///
/// The setters are meant for bootstrap only; once a context is on the
/// stack it is only read.
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    frontend: Frontend,
    config: Arc<AppConfig>,
    request: Option<Request>,
}

impl ApplicationContext {
    /// Create a CLI context without a request.
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            frontend: Frontend::Cli,
            config,
            request: None,
        }
    }

    pub fn frontend(&self) -> Frontend {
        self.frontend
    }

    pub fn set_frontend(&mut self, frontend: Frontend) {
        self.frontend = frontend;
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    pub fn set_config(&mut self, config: Arc<AppConfig>) {
        self.config = config;
    }

    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    pub fn set_request(&mut self, request: Request) {
        self.request = Some(request);
    }
}

/// LIFO stack of application contexts.
///
/// Owned by whoever drives the application; nested invocations either
/// balance `push`/`pop` themselves or use [`ContextStack::enter`].
#[derive(Debug, Default)]
pub struct ContextStack {
    contexts: Vec<ApplicationContext>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ctx: ApplicationContext) {
        debug!(depth = self.contexts.len() + 1, frontend = %ctx.frontend(), "context push");
        self.contexts.push(ctx);
    }

    /// Remove and return the current context.
    pub fn pop(&mut self) -> Option<ApplicationContext> {
        let ctx = self.contexts.pop();
        debug!(depth = self.contexts.len(), "context pop");
        ctx
    }

    /// Current context, `None` when nothing has been pushed.
    pub fn get(&self) -> Option<&ApplicationContext> {
        self.contexts.last()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Push `ctx` and return a guard that restores the stack to its
    /// previous depth when dropped.
    pub fn enter(&mut self, ctx: ApplicationContext) -> ContextGuard<'_> {
        let depth = self.contexts.len();
        self.push(ctx);
        ContextGuard { stack: self, depth }
    }
}

/// Scoped context acquisition, see [`ContextStack::enter`].
///
/// Derefs to the stack so nested code can keep pushing and reading.
pub struct ContextGuard<'a> {
    stack: &'a mut ContextStack,
    depth: usize,
}

impl Deref for ContextGuard<'_> {
    type Target = ContextStack;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        let leaked = self.stack.len().saturating_sub(self.depth + 1);
        if leaked > 0 {
            warn!(leaked, "unbalanced nested contexts discarded");
        }
        self.stack.contexts.truncate(self.depth);
        debug!(depth = self.depth, "context scope closed");
    }
}
