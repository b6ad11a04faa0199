//! Domain layer: contexts, failures, messages and command targets
//!
//! This layer is independent of external concerns (no process I/O, no config loading).

pub mod command;
pub mod context;
pub mod error;
pub mod failure;
pub mod http;
pub mod identifier;
pub mod message;

pub use command::{Command, CommandResult, CommandTarget, DirectHandler};
pub use context::{ApplicationContext, ContextGuard, ContextStack, Frontend};
pub use error::DomainError;
pub use failure::{Failure, FailureResult, SourceLocation};
pub use self::http::{Request, Response};
pub use message::{Dictionary, DictionaryMessage, Message};
