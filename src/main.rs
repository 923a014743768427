//! Device Management - operator tool for the device management store
//!
//! Checks and repairs the schema, prints reporting roll-ups as JSON, and
//! verifies employee credentials.

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use config::LogFormat;
use device_management::{config, db, AppConfig, Database, DeviceManagementService};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Device Management {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Some(path) = value_after(&args, "--init-config")? {
        return init_config(Path::new(path));
    }

    let command = parse_command(&args)?;
    let Some(command) = command else {
        print_help();
        return Ok(());
    };

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard must outlive every log call so file output is flushed
    let _log_guard = init_logging(&config);

    info!("Device Management starting up");

    ensure_data_directory(&config)?;

    let database = Database::connect(&config.database)
        .await
        .context("Failed to open database")?;

    let result = match command {
        Command::CheckDatabase => check_database(&database).await,
        Command::Report(kind) => print_report(&database, &kind).await,
        Command::Login(emp_id) => login(&database, emp_id).await,
    };

    database.close().await;
    result
}

#[derive(Debug, PartialEq)]
enum Command {
    CheckDatabase,
    Report(String),
    Login(i64),
}

/// Pick the requested command out of the arguments
fn parse_command(args: &[String]) -> Result<Option<Command>> {
    if args.iter().any(|arg| arg == "--check-database") {
        return Ok(Some(Command::CheckDatabase));
    }

    if let Some(kind) = value_after(args, "--report")? {
        return Ok(Some(Command::Report(kind.clone())));
    }

    if let Some(raw) = value_after(args, "--login")? {
        let emp_id = raw
            .parse::<i64>()
            .with_context(|| format!("Invalid employee id: {}", raw))?;
        return Ok(Some(Command::Login(emp_id)));
    }

    Ok(None)
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a String>> {
    match args.iter().position(|arg| arg == flag) {
        Some(i) => args
            .get(i + 1)
            .map(Some)
            .with_context(|| format!("{} requires a value", flag)),
        None => Ok(None),
    }
}

/// Write a default configuration file, refusing to replace an existing one
fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Configuration file {} already exists", path.display());
    }

    AppConfig::create_default_config(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Apply migrations and list any required tables that are still missing
async fn check_database(database: &Database) -> Result<()> {
    println!("Device Management Database Check v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Running database migrations...");
    database
        .migrate()
        .await
        .context("Failed to run database migrations")?;
    println!("Migrations completed successfully.");
    println!();

    println!("Verifying database tables...");
    let missing = db::migrations::check_schema(database).await?;
    if missing.is_empty() {
        println!(
            "All {} required tables exist.",
            db::migrations::REQUIRED_TABLES.len()
        );
        return Ok(());
    }

    for table in &missing {
        eprintln!("  Missing table: {}", table);
    }
    bail!("{} required table(s) missing", missing.len())
}

async fn print_report(database: &Database, kind: &str) -> Result<()> {
    let service = DeviceManagementService::new(database.clone());

    match kind {
        "productivity" => print_json(&service.productivity_rank().await?),
        "spending" => print_json(&service.most_spent_per_month().await?),
        "managers" => print_json(&service.manager_department_phone().await?),
        other => bail!(
            "Unknown report {:?} (expected productivity, spending or managers)",
            other
        ),
    }
}

async fn login(database: &Database, emp_id: i64) -> Result<()> {
    let password = env::var("DEVICEMGMT_PASSWORD")
        .context("DEVICEMGMT_PASSWORD must hold the password to check")?;

    let service = DeviceManagementService::new(database.clone());
    let employee = service.check_login(emp_id, &password).await?;
    let manages = service.is_manager(emp_id).await?;

    #[derive(Serialize)]
    struct LoginReport<'a> {
        #[serde(flatten)]
        employee: &'a device_management::models::Employee,
        manages: Option<String>,
    }

    print_json(&LoginReport {
        employee: &employee,
        manages,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}

/// Initialize logging based on configuration
///
/// Returns a guard that must be kept alive for file logging to work.
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use config::LogTarget;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_config = &config.logging;

    match &log_config.target {
        LogTarget::Console => {
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(subscriber, &log_config.format);
            None
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_file_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_both_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &config::LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Console output goes to stderr so report JSON on stdout stays clean
fn init_console_logging<S>(subscriber: S, format: &LogFormat)
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(false)
                        .with_line_number(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

fn init_file_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(writer))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
        }
    }
}

fn init_both_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(fmt::layer().json().with_writer(writer))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .with(
                    fmt::layer()
                        .compact()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
        }
    }
}

/// Ensure the directory holding the database file exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    let url = config.database.effective_url();
    let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
            info!("Created data directory: {:?}", parent);
        }
    }
    Ok(())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        r#"Device Management {}

USAGE:
    devicemgmt [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --check-database        Apply migrations and verify that every required
                            table exists
    --report <KIND>         Print a report as JSON. KIND is one of:
                              productivity  departments ranked by worked fraction
                              spending      top repair service per month
                              managers      department manager phone numbers
    --login <EMPID>         Check an employee's password, read from
                            DEVICEMGMT_PASSWORD
    --init-config <PATH>    Write a default configuration file to PATH

ENVIRONMENT:
    DEVICEMGMT_CONFIG       Path to configuration file (default: config.yaml)
    DATABASE_URL            Database URL, overrides the configured store
    DEVICEMGMT_DB_USER      Database user, also the default database name
    DEVICEMGMT_DB_NAME      Database name
    DEVICEMGMT_DATA_DIR     Directory holding the database file
    DEVICEMGMT_DB_MAX_CONNECTIONS
                            Upper bound on pooled connections (default: 10)
    DEVICEMGMT_LOG_FORMAT   Log format: pretty, json or compact
    DEVICEMGMT_LOG_TARGET   Log target: console, file or both
    DEVICEMGMT_LOG_DIR      Directory for log files
    RUST_LOG                Log filter (default from configuration)

CONFIGURATION:
    The tool looks for configuration files in the following order:
    1. Path specified by DEVICEMGMT_CONFIG environment variable
    2. ./config.yaml
    3. ./config/config.yaml
    4. /etc/device-management/config.yaml"#,
        env!("CARGO_PKG_VERSION")
    )
}
