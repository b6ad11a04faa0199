//! Command targets the CLI frontend dispatches to

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use crate::domain::failure::Failure;

/// Exit status of a successfully executed command, or the failure it raised.
pub type CommandResult = Result<i32, Failure>;

/// An object that executes a command for the given argument vector,
/// writing its output to `out`.
pub trait Command: Send + Sync {
    fn execute(&self, args: &[String], out: &mut dyn Write) -> CommandResult;
}

/// A plain function invoked with the argument vector and output sink.
pub type DirectHandler = Arc<dyn Fn(&[String], &mut dyn Write) -> CommandResult + Send + Sync>;

/// What a command identifier resolved to.
#[derive(Clone)]
pub enum CommandTarget {
    Direct(DirectHandler),
    Command(Arc<dyn Command>),
}

impl CommandTarget {
    pub fn direct<F>(handler: F) -> Self
    where
        F: Fn(&[String], &mut dyn Write) -> CommandResult + Send + Sync + 'static,
    {
        CommandTarget::Direct(Arc::new(handler))
    }

    pub fn command<C: Command + 'static>(command: C) -> Self {
        CommandTarget::Command(Arc::new(command))
    }

    pub fn invoke(&self, args: &[String], out: &mut dyn Write) -> CommandResult {
        match self {
            CommandTarget::Direct(handler) => handler(args, out),
            CommandTarget::Command(command) => command.execute(args, out),
        }
    }
}

impl fmt::Debug for CommandTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandTarget::Direct(_) => f.write_str("CommandTarget::Direct"),
            CommandTarget::Command(_) => f.write_str("CommandTarget::Command"),
        }
    }
}
