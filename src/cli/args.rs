/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lacus_client::capture::Browser;

/// pylacus: query a Lacus instance.
#[derive(Debug, Parser)]
#[command(
    name = "pylacus",
    about = "Query a Lacus instance.",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// URL of the instance.
    #[arg(long = "url-instance", env = "LACUS_URL", value_name = "URL")]
    pub url_instance: String,

    /// Check if redis is up. Takes precedence over any subcommand.
    #[arg(long = "redis_up")]
    pub redis_up: bool,

    /// Bearer token sent with every request.
    #[arg(long, env = "LACUS_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Skip TLS certificate verification of the instance.
    #[arg(long)]
    pub insecure: bool,

    /// Proxy used to reach the instance (not passed on to captures).
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// User agent of this client (not passed on to captures).
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers.
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Log requests and timings to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// Pretty-printed JSON.
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
    /// Aligned table with headers (human-readable).
    Table,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enqueue a url for capture.
    Enqueue(EnqueueArgs),
    /// Get status of a capture.
    Status(CaptureArgs),
    /// Get result of a capture.
    Result(ResultArgs),
    /// Capture statistics for a day.
    Stats(StatsArgs),
    /// Database status (number of keys, memory usage).
    DbStatus,
    /// List captures currently running.
    Ongoing(QueueArgs),
    /// List captures waiting in the queue.
    Enqueued(QueueArgs),
    /// Overall status of the instance.
    InstanceStatus,
    /// Check whether every capture slot is in use.
    Busy,
}

/// Arguments for `pylacus enqueue`.
#[derive(Debug, Args)]
pub struct EnqueueArgs {
    /// URL to capture.
    pub url: Option<String>,

    /// Render a local file instead of a URL.
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub document: Option<PathBuf>,

    /// JSON file with capture settings; command-line options override it.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Recursive capture depth.
    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    /// Queue priority.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub priority: Option<i32>,

    /// Maximum number of retries.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Capture again even if an identical capture ran recently.
    #[arg(long)]
    pub force: bool,

    /// Browser engine (chromium, firefox, webkit).
    #[arg(long, value_name = "BROWSER")]
    pub browser: Option<Browser>,

    /// Emulated device name.
    #[arg(long, value_name = "NAME")]
    pub device_name: Option<String>,

    /// User agent used by the capture.
    #[arg(long, value_name = "UA")]
    pub capture_user_agent: Option<String>,

    /// Proxy used by the capture.
    #[arg(long, value_name = "URL")]
    pub capture_proxy: Option<String>,

    /// Capture timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub capture_timeout: Option<u64>,
}

/// A capture identifier.
#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// UUID of the capture.
    pub uuid: String,
}

/// Arguments for `pylacus result`.
#[derive(Debug, Args)]
pub struct ResultArgs {
    /// UUID of the capture.
    pub uuid: String,

    /// Decode artifacts and print a summary instead of the raw capture.
    #[arg(long)]
    pub decode: bool,
}

/// Arguments for `pylacus stats`.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Day to report (YYYY-MM-DD); defaults to today.
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// List the URLs instead of counting them.
    #[arg(long)]
    pub details: bool,
}

/// Arguments for `pylacus ongoing` / `pylacus enqueued`.
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Include the capture settings of each entry.
    #[arg(long)]
    pub with_settings: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_enqueue() {
        let cli = Cli::try_parse_from([
            "pylacus",
            "--url-instance",
            "http://127.0.0.1:7100",
            "enqueue",
            "circl.lu",
            "--priority",
            "-5",
            "--browser",
            "firefox",
        ])
        .unwrap();
        assert_eq!(cli.url_instance, "http://127.0.0.1:7100");
        let Some(Command::Enqueue(args)) = cli.command else {
            panic!("expected enqueue");
        };
        assert_eq!(args.url.as_deref(), Some("circl.lu"));
        assert_eq!(args.priority, Some(-5));
        assert_eq!(args.browser, Some(Browser::Firefox));
    }

    #[test]
    fn test_parse_redis_up_without_subcommand() {
        let cli =
            Cli::try_parse_from(["pylacus", "--url-instance", "127.0.0.1:7100", "--redis_up"])
                .unwrap();
        assert!(cli.redis_up);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_stats_date() {
        let cli = Cli::try_parse_from([
            "pylacus",
            "--url-instance",
            "127.0.0.1:7100",
            "stats",
            "--date",
            "2024-03-01",
        ])
        .unwrap();
        let Some(Command::Stats(args)) = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(
            Cli::try_parse_from([
                "pylacus",
                "--url-instance",
                "x",
                "stats",
                "--date",
                "yesterday"
            ])
            .is_err()
        );
    }
}
