//! Built-in `appfront` tool command
//!
//! Reached through the regular resolver: invoking the binary as `appfront`
//! resolves by convention to `cli::command::AppfrontCommand`.

use std::io::Write;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::commands::{BuildContext, CommandRegistry};
use crate::application::resolver::LookupSettings;
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, AppConfig, FileConfigLoader};
use crate::domain::{Command, CommandResult};
use crate::exitcode;

pub const APPFRONT_CLASS: &str = "cli::command::AppfrontCommand";

/// Register the built-in command classes.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register_class(APPFRONT_CLASS, |ctx| {
        Ok(Arc::new(AppfrontCommand::from_context(ctx)) as Arc<dyn Command>)
    });
}

/// Snapshot of what the resolver can reach, for `appfront commands`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandListing {
    pub classes: Vec<String>,
    pub handlers: Vec<String>,
    /// identifier → target description
    pub mapped: Vec<(String, String)>,
}

impl CommandListing {
    pub fn collect(config: &AppConfig, registry: &CommandRegistry) -> Self {
        let mut mapped: Vec<(String, String)> = registry
            .mapped_identifiers()
            .map(|id| (id.to_string(), "(registered)".to_string()))
            .collect();
        if let Some(table) = config.get_table("cli/command-map") {
            for (id, target) in table {
                let target = target.as_str().map(str::to_string).unwrap_or_else(|| target.to_string());
                mapped.retain(|(existing, _)| existing != id);
                mapped.push((id.clone(), target));
            }
        }
        mapped.sort();

        Self {
            classes: registry.class_names().map(str::to_string).collect(),
            handlers: registry.handler_names().map(str::to_string).collect(),
            mapped,
        }
    }
}

pub struct AppfrontCommand {
    config: AppConfig,
    listing: CommandListing,
}

impl AppfrontCommand {
    pub fn from_context(ctx: &BuildContext<'_>) -> Self {
        Self {
            config: ctx.config.clone(),
            listing: CommandListing::collect(ctx.config, ctx.registry),
        }
    }

    /// Execute parsed arguments, writing to `out`.
    #[instrument(skip(self, out))]
    pub fn run(&self, cli: &Cli, out: &mut dyn Write) -> CliResult<i32> {
        match &cli.command {
            Some(Commands::Config { command }) => self.config_command(command, cli.verbose, out),
            Some(Commands::Commands) => self.list_commands(cli.verbose, out),
            Some(Commands::Completion { shell }) => {
                debug!("completion: {shell:?}");
                generate(*shell, &mut Cli::command(), "appfront", out);
                Ok(exitcode::OK)
            }
            None => {
                let help = Cli::command().render_help();
                output::info(out, &help).with_context("write help")?;
                Ok(exitcode::OK)
            }
        }
    }

    fn config_command(&self, command: &ConfigCommands, verbose: bool, out: &mut dyn Write) -> CliResult<i32> {
        match command {
            ConfigCommands::Show => {
                let text = self.config.to_toml()?;
                output::info(out, &text).with_context("write config")?;
            }
            ConfigCommands::Template => {
                output::info(out, &AppConfig::template()).with_context("write template")?;
            }
            ConfigCommands::Path => {
                let loader = FileConfigLoader::from_process_env();
                output::header(out, "Config files (lowest precedence first)").with_context("write paths")?;
                let app_files = ["default.toml", "site.toml"].map(|name| loader.config_dir().join(name));
                let files = global_config_path()
                    .map(|global| ("global", global))
                    .into_iter()
                    .chain(app_files.into_iter().map(|path| ("app", path)));
                for (label, path) in files {
                    let line = if verbose {
                        let state = if path.exists() { "found" } else { "missing" };
                        format!("{} ({state})", path.display())
                    } else {
                        path.display().to_string()
                    };
                    output::action(out, label, &line).with_context("write paths")?;
                }
                output::action(out, "env", "APPFRONT__<SECTION>__<KEY>").with_context("write paths")?;
            }
        }
        Ok(exitcode::OK)
    }

    fn list_commands(&self, verbose: bool, out: &mut dyn Write) -> CliResult<i32> {
        let sections: [(&str, Vec<String>); 3] = [
            ("Command map", self.listing.mapped.iter().map(|(id, t)| format!("{id} -> {t}")).collect()),
            ("Command classes", self.listing.classes.clone()),
            ("Handlers", self.listing.handlers.clone()),
        ];
        for (title, entries) in sections {
            output::header(out, title).with_context("write listing")?;
            if entries.is_empty() {
                output::detail(out, "(none)").with_context("write listing")?;
            }
            for entry in entries {
                output::detail(out, &entry).with_context("write listing")?;
            }
        }
        if verbose {
            self.list_lookup_settings(out)?;
        }
        Ok(exitcode::OK)
    }

    fn list_lookup_settings(&self, out: &mut dyn Write) -> CliResult<()> {
        let settings = LookupSettings::from_config(&self.config);
        output::header(out, "Lookup").with_context("write listing")?;
        output::action(out, "namespaces", &settings.namespaces.join(", ")).with_context("write listing")?;
        output::action(out, "class", &settings.class_name("", "<identifier>")).with_context("write listing")?;
        let beans = if settings.di_enabled {
            settings.bean_name("<identifier>")
        } else {
            "disabled".to_string()
        };
        output::action(out, "bean", &beans).with_context("write listing")?;
        Ok(())
    }
}

impl Command for AppfrontCommand {
    fn execute(&self, args: &[String], out: &mut dyn Write) -> CommandResult {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                write!(out, "{}", e.render())
                    .with_context("write help")
                    .map_err(CliError::from)?;
                return Ok(exitcode::OK);
            }
            Err(e) => return Err(CliError::Usage(e.render().to_string()).into()),
        };
        let code = self.run(&cli, out)?;
        out.flush().with_context("flush output").map_err(CliError::from)?;
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(config: &str) -> AppfrontCommand {
        let config = AppConfig::from_toml_str(config).expect("config");
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        registry.register_handler("app::ping", |_, _| Ok(0)).map_name("ping", "app::ping");
        let params = toml::Table::new();
        AppfrontCommand::from_context(&BuildContext {
            config: &config,
            registry: &registry,
            params: &params,
        })
    }

    fn run(cmd: &AppfrontCommand, args: &[&str]) -> (i32, String) {
        let cli = Cli::try_parse_from(args).expect("parse");
        let mut out = Vec::<u8>::new();
        let code = cmd.run(&cli, &mut out).expect("run");
        (code, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn given_commands_subcommand_when_run_then_lists_map_classes_and_handlers() {
        colored::control::set_override(false);
        let cmd = command(
            r#"
[cli.command-map]
deploy = "cli::command::DeployCommand"
ping = "app::other"
"#,
        );
        let (code, text) = run(&cmd, &["appfront", "commands"]);
        assert_eq!(code, exitcode::OK);
        assert!(text.contains("deploy -> cli::command::DeployCommand"));
        assert!(text.contains("ping -> app::other"), "config entry overrides registered one: {text}");
        assert!(text.contains(APPFRONT_CLASS));
        assert!(text.contains("app::ping"));
    }

    #[test]
    fn given_config_show_when_run_then_prints_effective_toml() {
        let cmd = command("[debug]\nenable = true\n");
        let (code, text) = run(&cmd, &["appfront", "config", "show"]);
        assert_eq!(code, exitcode::OK);
        assert!(text.contains("[debug]"));
        assert!(text.contains("enable = true"));
    }

    #[test]
    fn given_unknown_subcommand_when_execute_then_usage_failure() {
        let cmd = command("");
        let failure = cmd
            .execute(&["appfront".to_string(), "bogus".to_string()], &mut Vec::<u8>::new())
            .unwrap_err();
        assert!(failure.is_client_facing());
        assert_eq!(failure.code(), exitcode::USAGE);
    }

    #[test]
    fn given_verbose_commands_when_run_then_lookup_settings_listed() {
        colored::control::set_override(false);
        let cmd = command(
            r#"
[cli.class-lookup]
namespace = ["app::jobs", "cli::command"]
suffix = "Job"
"#,
        );

        let (_, quiet) = run(&cmd, &["appfront", "commands"]);
        let (code, text) = run(&cmd, &["appfront", "--verbose", "commands"]);

        assert_eq!(code, exitcode::OK);
        assert!(!quiet.contains("namespaces"));
        assert!(text.contains("namespaces: app::jobs, cli::command"), "got: {text}");
        assert!(text.contains("<identifier>Job"));
        assert!(text.contains("bean: disabled"));
    }

    #[test]
    fn given_output_sink_when_execute_then_all_output_written_there() {
        colored::control::set_override(false);
        let cmd = command("[debug]\nenable = true\n");

        let mut out = Vec::<u8>::new();
        let args = ["appfront", "config", "show"].map(String::from);
        let code = cmd.execute(&args, &mut out).expect("execute");
        assert_eq!(code, exitcode::OK);
        assert!(String::from_utf8(out).expect("utf8").contains("[debug]"));

        let mut help = Vec::<u8>::new();
        let args = ["appfront", "--help"].map(String::from);
        cmd.execute(&args, &mut help).expect("help");
        assert!(String::from_utf8(help).expect("utf8").contains("Usage"));
    }
}
