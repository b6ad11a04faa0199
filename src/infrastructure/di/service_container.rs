//! Service container for one application run
//!
//! Wires up the collaborators a dispatcher needs: config, environment,
//! command registry, the optional bean container and the message dictionary.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::commands::CommandRegistry;
use crate::config::AppConfig;
use crate::domain::{Dictionary, Failure, FailureResult};
use crate::infrastructure::di::{Bean, BeanContainer};
use crate::infrastructure::traits::Environment;

pub const BEANS_PATH: &str = "dependency-injection/beans";
pub const INLINE_DICT_PATH: &str = "i18n/dict/en";
pub const DICT_BEAN_PATH: &str = "i18n/di-lookup/bean-name";

/// Container holding all services of the current run.
///
/// Starts with no bean container and the built-in dictionary;
/// [`ServiceContainer::init_collaborators`] fills in the configured ones.
pub struct ServiceContainer {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Process boundary abstraction
    pub env: Arc<dyn Environment>,

    /// Registered handlers and command classes
    pub registry: Arc<CommandRegistry>,

    /// Bean container, present when beans are configured
    pub beans: Option<BeanContainer>,

    /// Messages for client-facing output
    pub dictionary: Dictionary,
}

impl ServiceContainer {
    pub fn new(config: Arc<AppConfig>, env: Arc<dyn Environment>, registry: Arc<CommandRegistry>) -> Self {
        Self {
            config,
            env,
            registry,
            beans: None,
            dictionary: Dictionary::default(),
        }
    }

    /// Initialize the bean container, then the message dictionary (which
    /// may be looked up as a bean). Order matters.
    pub fn init_collaborators(&mut self) -> FailureResult<()> {
        self.init_bean_container();
        self.init_messages()
    }

    pub fn init_bean_container(&mut self) {
        if let Some(definitions) = self.config.get_table(BEANS_PATH) {
            info!("beans: container initialized");
            self.beans = Some(BeanContainer::new(
                definitions.clone(),
                self.config.clone(),
                self.registry.clone(),
            ));
        }
    }

    /// Inline dictionary wins over a dictionary bean.
    pub fn init_messages(&mut self) -> FailureResult<()> {
        let table = if self.config.has_param(INLINE_DICT_PATH) {
            debug!("messages: inline dictionary");
            self.config
                .get_table(INLINE_DICT_PATH)
                .cloned()
                .ok_or_else(|| Failure::unexpected(format!("{INLINE_DICT_PATH} must be a table")))?
        } else if self.config.has_param(DICT_BEAN_PATH) {
            let name = self.config.get_str(DICT_BEAN_PATH, "");
            debug!("messages: dictionary bean '{name}'");
            let beans = self.beans.as_ref().ok_or_else(|| {
                Failure::unexpected(format!("dictionary bean '{name}' requested but no beans are configured"))
            })?;
            match beans.get(&name)? {
                Bean::Value(toml::Value::Table(table)) => table,
                _ => return Err(Failure::unexpected(format!("bean '{name}' is not a message dictionary"))),
            }
        } else {
            return Ok(());
        };

        let configured = Dictionary::from_table(&table).map_err(|e| Failure::from_error(&e))?;
        info!("messages: {} entries loaded", configured.len());
        self.dictionary.merge(configured);
        Ok(())
    }
}
