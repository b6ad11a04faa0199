//! appfront: application front controller
//!
//! Bootstraps configuration, selects the runtime frontend (CLI or web),
//! dispatches to a handler and translates uncaught failures into a
//! frontend-appropriate presentation.
//!
//! Layers:
//! - [`domain`]: contexts, failure chain, messages, command targets
//! - [`application`]: front controller, command resolution, failure translation
//! - [`infrastructure`]: process boundary, bean and service containers
//! - [`cli`]: the built-in `appfront` tool command

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{Application, ApplicationError, ApplicationResult, CommandRegistry, Runtime};
pub use config::{AppConfig, ConfigLoader, FileConfigLoader};
pub use domain::{Command, CommandResult, CommandTarget, Failure, Frontend};
