//! Per-run view handed to dispatchers and exception handlers

use std::io::Write;

use crate::domain::{ApplicationContext, ContextStack, Frontend};
use crate::infrastructure::di::ServiceContainer;

/// Everything a dispatcher or exception handler may touch during one run:
/// the context stack (so nested invocations can push their own context),
/// the initialized services and the output sink.
pub struct Runtime<'a> {
    stack: &'a mut ContextStack,
    services: &'a ServiceContainer,
    out: &'a mut dyn Write,
}

impl<'a> Runtime<'a> {
    pub fn new(stack: &'a mut ContextStack, services: &'a ServiceContainer, out: &'a mut dyn Write) -> Self {
        Self { stack, services, out }
    }

    /// Current (top-of-stack) context.
    pub fn context(&self) -> Option<&ApplicationContext> {
        self.stack.get()
    }

    /// Frontend of the current context; CLI when no context is active.
    pub fn frontend(&self) -> Frontend {
        self.context().map(ApplicationContext::frontend).unwrap_or(Frontend::Cli)
    }

    pub fn stack_mut(&mut self) -> &mut ContextStack {
        self.stack
    }

    pub fn services(&self) -> &'a ServiceContainer {
        self.services
    }

    /// Process argument vector, argv[0] first.
    pub fn args(&self) -> Vec<String> {
        self.services.env.args()
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }
}
