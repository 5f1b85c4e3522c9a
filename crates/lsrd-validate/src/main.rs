//! lsrd-validate - cross-module consistency validator CLI
//!
//! Runs one validation pass against a live lsrd suite and maps the report
//! to a process exit code.

use anyhow::Context;
use clap::Parser;
use lsrd_types::ModuleKind;
use lsrd_validate::{
    render, ReportFormat, TcpModuleClient, ValidateOptions, Validator,
};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "lsrd-validate", version, about = "Run consistency checks across lsrd modules")]
struct Cli {
    /// Routing area to validate.
    #[arg(long, default_value = "0")]
    area: String,

    /// Per-module fetch timeout in milliseconds.
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Restrict validation to checks whose modules are all listed
    /// (repeatable, e.g. --module decision --module fib).
    #[arg(long = "module", value_name = "MODULE")]
    modules: Vec<ModuleKind>,

    /// Drop the summary detail on passing checks.
    #[arg(long)]
    suppress_detail: bool,

    /// Output format: human or json.
    #[arg(long, default_value = "human")]
    format: ReportFormat,

    /// Count skipped and errored checks as failures for the exit code.
    #[arg(long)]
    strict_skipped: bool,

    /// Override a module endpoint as module=host:port (repeatable).
    #[arg(long = "endpoint", value_name = "MODULE=ADDR", value_parser = parse_endpoint)]
    endpoints: Vec<(ModuleKind, SocketAddr)>,
}

fn parse_endpoint(s: &str) -> Result<(ModuleKind, SocketAddr), String> {
    let (module, addr) = s
        .split_once('=')
        .ok_or_else(|| format!("expected module=host:port, got '{}'", s))?;
    let module: ModuleKind = module.parse().map_err(|e| format!("{}", e))?;
    let addr: SocketAddr = addr.parse().map_err(|e| format!("{}", e))?;
    Ok((module, addr))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()).await {
        Ok(passed) => {
            if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("lsrd-validate: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut client = TcpModuleClient::localhost();
    for (module, addr) in &cli.endpoints {
        client = client.with_endpoint(*module, *addr);
    }

    let options = ValidateOptions {
        fetch_timeout: Duration::from_millis(cli.timeout_ms),
        suppress_detail: cli.suppress_detail,
        module_filter: if cli.modules.is_empty() {
            None
        } else {
            Some(cli.modules.iter().copied().collect::<BTreeSet<_>>())
        },
    };

    let validator = Validator::new(Arc::new(client));
    let report = validator
        .run(&cli.area, &options)
        .await
        .context("validation run rejected")?;

    let text = render(&report, cli.format).context("rendering report")?;
    println!("{}", text);

    let passed = report.passed(cli.strict_skipped);
    info!(
        area = %report.area,
        overall_pass = report.overall_pass,
        exit_ok = passed,
        "validation finished"
    );
    Ok(passed)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
