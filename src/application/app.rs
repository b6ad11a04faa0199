//! Application front controller
//!
//! `run()` loads the configuration, pushes a context for the detected
//! frontend, initializes collaborators and dispatches. Any failure raised
//! after the context exists goes to the exception handler registered for
//! the current frontend.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::commands::CommandRegistry;
use crate::application::registry::{Dispatcher, ExceptionHandler, FrontendRegistry};
use crate::application::resolver::CommandResolver;
use crate::application::runtime::Runtime;
use crate::application::translator::handle_failure;
use crate::application::ApplicationResult;
use crate::config::{AppConfig, ConfigLoader};
use crate::domain::{ApplicationContext, CommandResult, ContextStack, Failure, Frontend, Request};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::Environment;

/// Marker of an inbound HTTP request in the environment.
pub const REQUEST_METHOD_VAR: &str = "REQUEST_METHOD";

pub struct Application {
    loader: Box<dyn ConfigLoader>,
    env: Arc<dyn Environment>,
    registry: Arc<CommandRegistry>,
    dispatchers: FrontendRegistry<Dispatcher>,
    handlers: FrontendRegistry<ExceptionHandler>,
    stack: ContextStack,
    out: Box<dyn Write>,
}

impl Application {
    /// Application with the default CLI dispatcher, no web dispatcher and the
    /// default exception handler for both frontends. Output goes to stdout.
    pub fn new(loader: Box<dyn ConfigLoader>, env: Arc<dyn Environment>) -> Self {
        let cli_dispatcher: Dispatcher = Arc::new(dispatch_cli_request);
        let handler: ExceptionHandler = Arc::new(handle_failure);
        let mut handlers = FrontendRegistry::new(handler.clone());
        handlers.set(Frontend::Web, handler);

        Self {
            loader,
            env,
            registry: Arc::new(CommandRegistry::default()),
            dispatchers: FrontendRegistry::new(cli_dispatcher),
            handlers,
            stack: ContextStack::new(),
            out: Box::new(io::stdout()),
        }
    }

    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Override the request dispatcher for `frontend`.
    pub fn set_request_dispatcher<F>(&mut self, frontend: Frontend, dispatcher: F)
    where
        F: Fn(&mut Runtime<'_>) -> CommandResult + Send + Sync + 'static,
    {
        self.dispatchers.set(frontend, Arc::new(dispatcher));
    }

    /// Override the exception handler for `frontend`.
    pub fn set_exception_handler<F>(&mut self, frontend: Frontend, handler: F)
    where
        F: Fn(&mut Runtime<'_>, &Failure) -> i32 + Send + Sync + 'static,
    {
        self.handlers.set(frontend, Arc::new(handler));
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn context_stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Bootstrap and dispatch; returns the exit status.
    ///
    /// Configuration loading failures happen before any frontend is known
    /// and are returned as errors instead of being translated.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> ApplicationResult<i32> {
        let config = Arc::new(self.loader.load()?);
        let context = build_context(config.clone(), self.env.as_ref());
        info!(frontend = %context.frontend(), "bootstrap: context ready");

        let Self {
            env,
            registry,
            dispatchers,
            handlers,
            stack,
            out,
            ..
        } = self;

        let mut stack = stack.enter(context);
        let mut services = ServiceContainer::new(config, env.clone(), registry.clone());
        let bootstrapped = services.init_collaborators();

        let mut rt = Runtime::new(&mut stack, &services, out.as_mut());
        let result = bootstrapped.and_then(|()| {
            let dispatcher = dispatchers.select(rt.frontend()).clone();
            debug!(frontend = %rt.frontend(), "dispatch");
            dispatcher(&mut rt)
        });

        let code = match result {
            Ok(code) => code,
            Err(failure) => {
                let handler = handlers.select(rt.frontend()).clone();
                handler(&mut rt, &failure)
            }
        };
        info!(code, "run finished");
        Ok(code)
    }
}

fn build_context(config: Arc<AppConfig>, env: &dyn Environment) -> ApplicationContext {
    let mut ctx = ApplicationContext::new(config);
    let has_request = env
        .var(REQUEST_METHOD_VAR)
        .is_some_and(|method| !method.is_empty());

    if has_request {
        ctx.set_frontend(Frontend::Web);
        if let Some(request) = Request::from_vars(env.vars()) {
            ctx.set_request(request);
        }
    } else {
        ctx.set_frontend(Frontend::Cli);
    }
    ctx
}

/// Default CLI dispatcher: resolve argv[0] to a command and run it.
pub fn dispatch_cli_request(rt: &mut Runtime<'_>) -> CommandResult {
    let args = rt.args();
    let services = rt.services();
    CommandResolver::from_services(services).run(&args, rt.out())
}
