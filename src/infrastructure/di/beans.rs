//! Named bean lookup backed by `dependency-injection/beans`
//!
//! A definition that is a table with a `factory` key names a registered
//! handler or command class; the remaining keys are passed to the factory.
//! Any other definition is a plain value bean (e.g. a message dictionary).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::commands::{BuildContext, CommandRegistry};
use crate::config::AppConfig;
use crate::domain::CommandTarget;
use crate::infrastructure::{InfraError, InfraResult};

const FACTORY_KEY: &str = "factory";

#[derive(Debug, Clone)]
pub enum Bean {
    Command(CommandTarget),
    Value(toml::Value),
}

/// Bean container. Beans are built on first access and cached.
pub struct BeanContainer {
    definitions: toml::Table,
    config: Arc<AppConfig>,
    registry: Arc<CommandRegistry>,
    cache: RefCell<BTreeMap<String, Bean>>,
}

impl BeanContainer {
    pub fn new(definitions: toml::Table, config: Arc<AppConfig>, registry: Arc<CommandRegistry>) -> Self {
        debug!("beans: {} definitions", definitions.len());
        Self {
            definitions,
            config,
            registry,
            cache: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn has_bean(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn bean_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> InfraResult<Bean> {
        if let Some(bean) = self.cache.borrow().get(name) {
            return Ok(bean.clone());
        }

        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| InfraError::UnknownBean(name.to_string()))?;
        let bean = self.build(name, definition)?;
        self.cache.borrow_mut().insert(name.to_string(), bean.clone());
        Ok(bean)
    }

    fn build(&self, name: &str, definition: &toml::Value) -> InfraResult<Bean> {
        let factory = definition
            .as_table()
            .and_then(|t| t.get(FACTORY_KEY))
            .and_then(toml::Value::as_str);

        let Some(factory) = factory else {
            debug!("beans: '{name}' is a value bean");
            return Ok(Bean::Value(definition.clone()));
        };

        let params: toml::Table = definition
            .as_table()
            .map(|t| {
                t.iter()
                    .filter(|(k, _)| k.as_str() != FACTORY_KEY)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let ctx = BuildContext {
            config: &self.config,
            registry: &self.registry,
            params: &params,
        };

        debug!("beans: building '{name}' with factory '{factory}'");
        match self.registry.resolve_name(factory, &ctx) {
            Some(Ok(target)) => Ok(Bean::Command(target)),
            Some(Err(source)) => Err(InfraError::BeanConstruction {
                bean: name.to_string(),
                source,
            }),
            None => Err(InfraError::UnknownFactory {
                bean: name.to_string(),
                factory: factory.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Command, CommandResult, Failure};

    struct Greeter {
        greeting: String,
    }

    impl Command for Greeter {
        fn execute(&self, _args: &[String], _out: &mut dyn std::io::Write) -> CommandResult {
            Ok(self.greeting.len() as i32)
        }
    }

    fn container(defs: &str) -> BeanContainer {
        let mut registry = CommandRegistry::new();
        registry
            .register_class("app::Greeter", |ctx| {
                let greeting = ctx
                    .params
                    .get("greeting")
                    .and_then(toml::Value::as_str)
                    .ok_or_else(|| Failure::unexpected("greeting missing"))?;
                Ok(Arc::new(Greeter {
                    greeting: greeting.to_string(),
                }) as Arc<dyn Command>)
            })
            .register_handler("app::ping", |_, _| Ok(0));
        let definitions: toml::Table = toml::from_str(defs).expect("parse");
        BeanContainer::new(definitions, Arc::new(AppConfig::default()), Arc::new(registry))
    }

    #[test]
    fn given_factory_definition_when_get_then_command_built_with_params() {
        let beans = container(r#"hello = { factory = "app::Greeter", greeting = "hi!" }"#);
        assert!(beans.has_bean("hello"));
        match beans.get("hello").expect("bean") {
            Bean::Command(target) => assert_eq!(target.invoke(&[], &mut Vec::<u8>::new()).expect("run"), 3),
            other => panic!("expected command bean, got {other:?}"),
        }
    }

    #[test]
    fn given_handler_factory_when_get_then_direct_target() {
        let beans = container(r#"ping = { factory = "app::ping" }"#);
        assert!(matches!(
            beans.get("ping").expect("bean"),
            Bean::Command(CommandTarget::Direct(_))
        ));
    }

    #[test]
    fn given_plain_definition_when_get_then_value_bean() {
        let beans = container(
            r#"
limit = 10
[messages]
"error.unexpected-error" = "Oops"
"#,
        );
        assert!(matches!(beans.get("limit").expect("bean"), Bean::Value(toml::Value::Integer(10))));
        assert!(matches!(beans.get("messages").expect("bean"), Bean::Value(toml::Value::Table(_))));
    }

    #[test]
    fn given_unknown_factory_or_bean_when_get_then_error() {
        let beans = container(r#"broken = { factory = "app::Missing" }"#);
        assert!(matches!(beans.get("broken"), Err(InfraError::UnknownFactory { .. })));
        assert!(matches!(beans.get("absent"), Err(InfraError::UnknownBean(_))));
    }

    #[test]
    fn given_failing_factory_when_get_then_construction_error() {
        let beans = container(r#"hello = { factory = "app::Greeter" }"#);
        let err = beans.get("hello").unwrap_err();
        assert!(matches!(err, InfraError::BeanConstruction { .. }));
    }
}
