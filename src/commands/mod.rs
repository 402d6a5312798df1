/// Command dispatch: builds the client, checks the instance, routes to handlers.
pub mod enqueue;
pub mod health;
pub mod queue;
pub mod result;
pub mod stats;
pub mod status;

use std::time::Duration;

use lacus_client::{InstanceConfig, LacusClient, LacusError};

use crate::cli::OutputCtx;
use crate::cli::args::{Cli, Command};

/// Build the instance configuration from global flags.
#[must_use]
pub fn instance_config(cli: &Cli) -> InstanceConfig {
    let mut config = InstanceConfig::new(cli.url_instance.as_str())
        .verify_tls(!cli.insecure)
        .timeout(Duration::from_secs(cli.timeout));
    if let Some(token) = &cli.token {
        config = config.token(token.as_str());
    }
    if let Some(proxy) = &cli.proxy {
        config = config.proxy(proxy.as_str());
    }
    if let Some(user_agent) = &cli.user_agent {
        config = config.user_agent(user_agent.as_str());
    }
    config
}

/// Run the parsed command line.
///
/// `--redis_up` takes precedence over the subcommand. The instance must answer
/// the liveness probe before anything else is sent.
///
/// # Errors
///
/// Returns `LacusError` on any argument, network or remote failure.
pub fn run(cli: &Cli, ctx: &OutputCtx) -> Result<(), LacusError> {
    if !cli.redis_up && cli.command.is_none() {
        return Err(LacusError::InvalidRequest(
            "no command given; use --redis_up or one of the subcommands".to_owned(),
        ));
    }

    let client = LacusClient::new(instance_config(cli))?;

    let t_probe = ctx.timer("is_up");
    let up = client.is_up();
    drop(t_probe);
    if !up {
        return Err(LacusError::Remote {
            status: None,
            message: format!("Unable to reach {}. Is the server up?", client.root_url()),
        });
    }

    if cli.redis_up {
        return health::run_redis_up(&client, ctx);
    }

    match &cli.command {
        Some(command) => dispatch(command, &client, ctx),
        None => Ok(()),
    }
}

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `LacusError` on any command failure.
pub fn dispatch(
    command: &Command,
    client: &LacusClient,
    ctx: &OutputCtx,
) -> Result<(), LacusError> {
    match command {
        Command::Enqueue(args) => enqueue::run(args, client, ctx),
        Command::Status(args) => status::run(args, client, ctx),
        Command::Result(args) => result::run(args, client, ctx),
        Command::Stats(args) => stats::run_daily(args, client, ctx),
        Command::DbStatus => stats::run_db_status(client, ctx),
        Command::InstanceStatus => stats::run_instance_status(client, ctx),
        Command::Busy => health::run_busy(client, ctx),
        Command::Ongoing(args) => queue::run_ongoing(args, client, ctx),
        Command::Enqueued(args) => queue::run_enqueued(args, client, ctx),
    }
}
