//! Static registration table for CLI commands
//!
//! Holds three kinds of entries:
//! - named handlers: plain functions, addressable by name
//! - command classes: fully qualified names (`cli::command::DeployCommand`)
//!   with a factory that builds the command object
//! - explicit command-map entries registered in code

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{Command, CommandResult, CommandTarget, DirectHandler, Failure};

/// Inputs available to a command factory.
pub struct BuildContext<'a> {
    pub config: &'a AppConfig,
    pub registry: &'a CommandRegistry,
    /// Bean definition parameters; empty outside the bean container
    pub params: &'a toml::Table,
}

pub type CommandFactory =
    Arc<dyn Fn(&BuildContext<'_>) -> Result<Arc<dyn Command>, Failure> + Send + Sync>;

/// Value of an explicit command-map entry.
#[derive(Clone)]
pub enum MapEntry {
    Handler(DirectHandler),
    /// Name of a registered handler or command class
    Name(String),
}

#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, DirectHandler>,
    classes: BTreeMap<String, CommandFactory>,
    map: BTreeMap<String, MapEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_handler<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&[String], &mut dyn Write) -> CommandResult + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn register_class<F>(&mut self, class: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&BuildContext<'_>) -> Result<Arc<dyn Command>, Failure> + Send + Sync + 'static,
    {
        self.classes.insert(class.into(), Arc::new(factory));
        self
    }

    /// Register a command class whose factory is its `Default` impl.
    pub fn register_default<C>(&mut self, class: impl Into<String>) -> &mut Self
    where
        C: Command + Default + 'static,
    {
        self.register_class(class, |_| Ok(Arc::new(C::default()) as Arc<dyn Command>))
    }

    pub fn map_handler<F>(&mut self, identifier: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&[String], &mut dyn Write) -> CommandResult + Send + Sync + 'static,
    {
        self.map
            .insert(identifier.into(), MapEntry::Handler(Arc::new(handler)));
        self
    }

    pub fn map_name(&mut self, identifier: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.map.insert(identifier.into(), MapEntry::Name(name.into()));
        self
    }

    pub fn handler(&self, name: &str) -> Option<&DirectHandler> {
        self.handlers.get(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn map_entry(&self, identifier: &str) -> Option<&MapEntry> {
        self.map.get(identifier)
    }

    /// Build an instance of `class`; `None` when the class is not registered.
    pub fn instantiate(&self, class: &str, ctx: &BuildContext<'_>) -> Option<Result<CommandTarget, Failure>> {
        self.classes
            .get(class)
            .map(|factory| factory(ctx).map(CommandTarget::Command))
    }

    /// Resolve `name` as a handler first, then as a command class.
    pub fn resolve_name(&self, name: &str, ctx: &BuildContext<'_>) -> Option<Result<CommandTarget, Failure>> {
        if let Some(handler) = self.handler(name) {
            return Some(Ok(CommandTarget::Direct(handler.clone())));
        }
        self.instantiate(name, ctx)
    }

    pub fn handler_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn mapped_identifiers(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Noop;

    impl Command for Noop {
        fn execute(&self, _args: &[String], _out: &mut dyn Write) -> CommandResult {
            Ok(3)
        }
    }

    #[test]
    fn given_name_registered_as_handler_and_class_when_resolve_name_then_handler_wins() {
        let mut registry = CommandRegistry::new();
        registry
            .register_handler("shared", |_, _| Ok(1))
            .register_default::<Noop>("shared")
            .register_default::<Noop>("cli::command::NoopCommand");

        let config = AppConfig::default();
        let params = toml::Table::new();
        let ctx = BuildContext {
            config: &config,
            registry: &registry,
            params: &params,
        };

        let target = registry.resolve_name("shared", &ctx).expect("found").expect("built");
        assert_eq!(target.invoke(&[], &mut Vec::<u8>::new()).expect("run"), 1);

        let target = registry
            .resolve_name("cli::command::NoopCommand", &ctx)
            .expect("found")
            .expect("built");
        assert!(matches!(target, CommandTarget::Command(_)));
        assert_eq!(target.invoke(&[], &mut Vec::<u8>::new()).expect("run"), 3);

        assert!(registry.resolve_name("missing", &ctx).is_none());
    }
}
