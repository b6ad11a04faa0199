//! I/O boundary traits for testability
//!
//! The process boundary (argument vector and environment variables) is
//! abstracted so the application can be driven with simulated invocations.

use std::collections::BTreeMap;

/// Process environment abstraction.
pub trait Environment: Send + Sync {
    /// Argument vector, argv[0] first.
    fn args(&self) -> Vec<String>;

    /// Value of an environment variable.
    fn var(&self, name: &str) -> Option<String>;

    /// All environment variables.
    fn vars(&self) -> Vec<(String, String)>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// The environment of the running process.
#[derive(Debug, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn args(&self) -> Vec<String> {
        std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
            .collect()
    }
}

/// A fixed environment, e.g. for embedding or simulated requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    args: Vec<String>,
    vars: BTreeMap<String, String>,
}

impl StaticEnvironment {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            vars: BTreeMap::new(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn args(&self) -> Vec<String> {
        self.args.clone()
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}
