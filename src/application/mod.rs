//! Application layer: front controller, command resolution and failure translation
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod app;
pub mod commands;
pub mod error;
pub mod error_ext;
pub mod registry;
pub mod resolver;
pub mod runtime;
pub mod translator;

pub use app::Application;
pub use commands::{BuildContext, CommandRegistry, MapEntry};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use registry::{Dispatcher, ExceptionHandler, FrontendRegistry};
pub use resolver::{CommandResolver, LookupSettings, Resolution};
pub use runtime::Runtime;
pub use translator::{ExceptionTranslator, Translation};
