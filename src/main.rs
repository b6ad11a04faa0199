use std::process;
use std::sync::Arc;

use appfront::cli::{output, register_builtins, CliError};
use appfront::infrastructure::traits::ProcessEnvironment;
use appfront::{Application, CommandRegistry, FileConfigLoader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Log filter, e.g. `APPFRONT_LOG=appfront=debug`
const LOG_ENV: &str = "APPFRONT_LOG";

fn main() {
    setup_logging();

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);

    let mut app = Application::new(
        Box::new(FileConfigLoader::from_process_env()),
        Arc::new(ProcessEnvironment),
    )
    .with_registry(registry);

    match app.run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            let e = CliError::from(e);
            output::error(&e);
            process::exit(e.exit_code());
        }
    }
}

fn setup_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    // Create a noisy module filter
    let noisy_modules = ["config::"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(env_filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();
}
