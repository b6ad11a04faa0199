//! CLI command resolution
//!
//! argv[0] yields two candidate identifiers (file name, file name without
//! extension). Each candidate is looked up, in order, in the explicit
//! command map, the bean container and finally by class-name convention.
//! The first candidate that resolves is executed. A candidate that resolves
//! to something that cannot be executed stops the search.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::{debug, instrument};

use crate::application::commands::{BuildContext, CommandRegistry, MapEntry};
use crate::config::AppConfig;
use crate::domain::identifier::{base_name, candidate_identifiers, to_class_stem};
use crate::domain::message::{COMMAND_NOT_FOUND, INVALID_COMMAND};
use crate::domain::{CommandResult, CommandTarget, DictionaryMessage, Failure, FailureResult};
use crate::exitcode;
use crate::infrastructure::di::{Bean, BeanContainer, ServiceContainer};

pub const DEFAULT_NAMESPACE: &str = "cli::command";
pub const DEFAULT_CLASS_SUFFIX: &str = "Command";

/// Outcome of looking up one identifier.
#[derive(Debug)]
pub enum Resolution {
    Target(CommandTarget),
    /// Something was found but it cannot be executed; carries its description
    Invalid(String),
}

/// Lookup settings read from the `cli/*` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSettings {
    pub namespaces: Vec<String>,
    pub class_prefix: String,
    pub class_suffix: String,
    pub di_enabled: bool,
    pub di_prefix: String,
    pub di_suffix: String,
}

impl LookupSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            namespaces: config.get_str_array("cli/class-lookup/namespace", &[DEFAULT_NAMESPACE]),
            class_prefix: config.get_str("cli/class-lookup/prefix", ""),
            class_suffix: config.get_str("cli/class-lookup/suffix", DEFAULT_CLASS_SUFFIX),
            di_enabled: config.get_bool("cli/di-lookup/enable"),
            di_prefix: config.get_str("cli/di-lookup/prefix", ""),
            di_suffix: config.get_str("cli/di-lookup/suffix", ""),
        }
    }

    /// Fully qualified class name for `identifier` in `namespace`.
    pub fn class_name(&self, namespace: &str, identifier: &str) -> String {
        let class = format!("{}{}{}", self.class_prefix, to_class_stem(identifier), self.class_suffix);
        let namespace = namespace.trim_end_matches("::");
        if namespace.is_empty() {
            class
        } else {
            format!("{namespace}::{class}")
        }
    }

    pub fn bean_name(&self, identifier: &str) -> String {
        format!("{}{}{}", self.di_prefix, identifier, self.di_suffix)
    }
}

pub struct CommandResolver<'a> {
    config: &'a AppConfig,
    registry: &'a CommandRegistry,
    beans: Option<&'a BeanContainer>,
    settings: LookupSettings,
    config_map: BTreeMap<String, toml::Value>,
    empty: toml::Table,
}

impl<'a> CommandResolver<'a> {
    pub fn new(config: &'a AppConfig, registry: &'a CommandRegistry, beans: Option<&'a BeanContainer>) -> Self {
        let config_map = config
            .get_table("cli/command-map")
            .map(|t| t.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Self {
            config,
            registry,
            beans,
            settings: LookupSettings::from_config(config),
            config_map,
            empty: toml::Table::new(),
        }
    }

    pub fn from_services(services: &'a ServiceContainer) -> Self {
        Self::new(&services.config, &services.registry, services.beans.as_ref())
    }

    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    fn build_context(&self) -> BuildContext<'_> {
        BuildContext {
            config: self.config,
            registry: self.registry,
            params: &self.empty,
        }
    }

    /// Resolve and execute the command named by `args[0]`; the command
    /// writes to `out`.
    #[instrument(skip(self, out))]
    pub fn run(&self, args: &[String], out: &mut dyn Write) -> CommandResult {
        let program = args.first().map(String::as_str).unwrap_or_default();

        for identifier in candidate_identifiers(program) {
            match self.resolve(&identifier)? {
                None => {
                    debug!("resolve: no match for '{identifier}'");
                }
                Some(Resolution::Target(target)) => {
                    debug!("resolve: '{identifier}' -> {target:?}");
                    return target.invoke(args, out);
                }
                Some(Resolution::Invalid(value)) => {
                    return Err(Failure::client(
                        format!("Invalid handler '{value}' for command {identifier}"),
                        DictionaryMessage::new(INVALID_COMMAND).with_param("command", &identifier),
                        exitcode::NOT_EXECUTABLE,
                    ));
                }
            }
        }

        let base = base_name(program);
        Err(Failure::client(
            format!("Command not found: {base}"),
            DictionaryMessage::new(COMMAND_NOT_FOUND).with_param("command", &base),
            exitcode::NOT_FOUND,
        ))
    }

    /// Look up one identifier: explicit map, bean container, convention.
    pub fn resolve(&self, identifier: &str) -> FailureResult<Option<Resolution>> {
        if let Some(resolution) = self.resolve_mapped(identifier)? {
            return Ok(Some(resolution));
        }
        if let Some(resolution) = self.resolve_bean(identifier)? {
            return Ok(Some(resolution));
        }
        self.resolve_by_convention(identifier)
    }

    fn resolve_mapped(&self, identifier: &str) -> FailureResult<Option<Resolution>> {
        // config entries override those registered in code
        if let Some(value) = self.config_map.get(identifier) {
            debug!("resolve: '{identifier}' in configured command map");
            return match value.as_str() {
                Some(name) => self.resolve_name(name).map(Some),
                None => Ok(Some(Resolution::Invalid(value.to_string()))),
            };
        }

        match self.registry.map_entry(identifier) {
            Some(MapEntry::Handler(handler)) => {
                debug!("resolve: '{identifier}' mapped to handler");
                Ok(Some(Resolution::Target(CommandTarget::Direct(handler.clone()))))
            }
            Some(MapEntry::Name(name)) => self.resolve_name(name).map(Some),
            None => Ok(None),
        }
    }

    fn resolve_name(&self, name: &str) -> FailureResult<Resolution> {
        match self.registry.resolve_name(name, &self.build_context()) {
            Some(target) => target.map(Resolution::Target),
            None => Ok(Resolution::Invalid(name.to_string())),
        }
    }

    fn resolve_bean(&self, identifier: &str) -> FailureResult<Option<Resolution>> {
        if !self.settings.di_enabled {
            return Ok(None);
        }
        let Some(beans) = self.beans else {
            debug!("resolve: bean lookup enabled but no bean container configured");
            return Ok(None);
        };

        let name = self.settings.bean_name(identifier);
        if !beans.has_bean(&name) {
            return Ok(None);
        }
        debug!("resolve: '{identifier}' -> bean '{name}'");
        match beans.get(&name)? {
            Bean::Command(target) => Ok(Some(Resolution::Target(target))),
            Bean::Value(value) => Ok(Some(Resolution::Invalid(value.to_string()))),
        }
    }

    fn resolve_by_convention(&self, identifier: &str) -> FailureResult<Option<Resolution>> {
        for namespace in &self.settings.namespaces {
            let class = self.settings.class_name(namespace, identifier);
            if let Some(target) = self.registry.instantiate(&class, &self.build_context()) {
                debug!("resolve: '{identifier}' -> class {class}");
                return target.map(|t| Some(Resolution::Target(t)));
            }
        }
        Ok(None)
    }
}
