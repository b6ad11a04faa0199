//! Failure chain raised during dispatch
//!
//! A [`Failure`] with a client message is client-facing: its message is
//! safe to show to the end user and its code doubles as exit code or HTTP
//! status. Every other failure is unexpected and only ever shown to
//! operators.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use thiserror::Error;

use crate::domain::message::Message;

/// Source position a failure was raised from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl From<&Location<'_>> for SourceLocation {
    fn from(loc: &Location<'_>) -> Self {
        Self {
            file: loc.file().to_string(),
            line: loc.line(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.file, self.line)
    }
}

#[derive(Error, Debug)]
#[error("{message}")]
pub struct Failure {
    message: String,
    client_message: Option<Message>,
    code: i32,
    location: SourceLocation,
    trace: Option<String>,
    #[source]
    cause: Option<Box<Failure>>,
}

pub type FailureResult<T> = Result<T, Failure>;

impl Failure {
    /// Client-facing failure: `message` is for logs, `client_message` for
    /// the user, `code` is the exit code or HTTP status.
    #[track_caller]
    pub fn client(message: impl Into<String>, client_message: impl Into<Message>, code: i32) -> Self {
        Self::raise(message.into(), Some(client_message.into()), code, Location::caller())
    }

    #[track_caller]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::raise(message.into(), None, 0, Location::caller())
    }

    /// Convert any error; its `source()` chain becomes the cause chain.
    #[track_caller]
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let location = Location::caller();
        let mut messages = vec![err.to_string()];
        let mut source = err.source();
        while let Some(e) = source {
            messages.push(e.to_string());
            source = e.source();
        }

        messages
            .into_iter()
            .rev()
            .fold(None, |cause: Option<Failure>, message| {
                let failure = Self::raise(message, None, 0, location);
                Some(match cause {
                    Some(c) => failure.caused_by(c),
                    None => failure,
                })
            })
            .unwrap_or_else(|| Self::raise(String::new(), None, 0, location))
    }

    fn raise(message: String, client_message: Option<Message>, code: i32, location: &Location<'_>) -> Self {
        Self {
            message,
            client_message,
            code,
            location: location.into(),
            trace: capture_trace(),
            cause: None,
        }
    }

    pub fn caused_by(mut self, cause: Failure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn client_message(&self) -> Option<&Message> {
        self.client_message.as_ref()
    }

    pub fn set_client_message(&mut self, client_message: impl Into<Message>) {
        self.client_message = Some(client_message.into());
    }

    pub fn is_client_facing(&self) -> bool {
        self.client_message.is_some()
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Backtrace text, present when capture is enabled via `RUST_BACKTRACE`.
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    pub fn cause(&self) -> Option<&Failure> {
        self.cause.as_deref()
    }

    /// Self followed by each nested cause, oldest cause last.
    pub fn chain(&self) -> impl Iterator<Item = &Failure> {
        std::iter::successors(Some(self), |f| Failure::cause(f))
    }
}

fn capture_trace() -> Option<String> {
    let bt = Backtrace::capture();
    match bt.status() {
        BacktraceStatus::Captured => Some(bt.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::DictionaryMessage;

    #[test]
    fn given_client_failure_then_carries_message_and_code() {
        let f = Failure::client(
            "Command not found: x",
            DictionaryMessage::new("error.cli.command-not-found").with_param("command", "x"),
            127,
        );
        assert!(f.is_client_facing());
        assert_eq!(f.code(), 127);
        assert_eq!(f.message(), "Command not found: x");
        assert!(f.location().file.ends_with("failure.rs"));
    }

    #[test]
    fn given_chained_failures_when_chain_then_outermost_first() {
        let f = Failure::unexpected("outer")
            .caused_by(Failure::unexpected("middle").caused_by(Failure::unexpected("root")));
        let messages: Vec<_> = f.chain().map(Failure::message).collect();
        assert_eq!(messages, vec!["outer", "middle", "root"]);
        assert_eq!(f.source().map(|s| s.to_string()), Some("middle".to_string()));
    }

    #[test]
    fn given_io_error_with_source_when_from_error_then_chain_preserved() {
        #[derive(Error, Debug)]
        #[error("query failed")]
        struct QueryError(#[source] std::io::Error);

        let err = QueryError(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "DB connection refused",
        ));
        let f = Failure::from_error(&err);
        let messages: Vec<_> = f.chain().map(Failure::message).collect();
        assert_eq!(messages, vec!["query failed", "DB connection refused"]);
        assert!(!f.is_client_facing());
    }

    #[test]
    fn given_unexpected_failure_when_set_client_message_then_becomes_client_facing() {
        let mut f = Failure::unexpected("internal");
        f.set_client_message("error.retry-later");
        assert!(f.is_client_facing());
    }
}
