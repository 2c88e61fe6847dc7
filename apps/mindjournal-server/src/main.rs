use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use modkit::{DbOptions, ModuleRegistry, RunOptions, ShutdownOptions};
use modkit_db::{ConnectOpts, DbEngine, DbHandle};
use runtime::{AppConfig, AppConfigProvider, CliArgs, DatabaseConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use api_ingress::{ApiIngress, ApiIngressConfig};
use journaling::config::JournalingConfig;
use journaling::Journaling;

const MOCK_DSN: &str = "sqlite::memory:";

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(Arc<AppConfigProvider>);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - In-memory DSNs are returned unchanged.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if modkit_db::is_memory_dsn(dsn) {
        return Ok(dsn.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// MindJournal Server - personal journaling backend
#[derive(Parser)]
#[command(name = "mindjournal-server")]
#[command(about = "MindJournal Server - personal journaling backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use a private in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created during load
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!(
        home_dir = %config.server.home_dir,
        port = config.server.port,
        "MindJournal Server starting"
    );

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args).await,
    }
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<DbEngine> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw)
        .map_err(|e| anyhow!("Invalid database DSN '{}': {}", redact_dsn(raw), e))?;

    match url.scheme() {
        "sqlite" => Ok(DbEngine::Sqlite),
        "postgres" | "postgresql" => Ok(DbEngine::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// DSN the server will actually open: `--mock` wins, relative SQLite paths
/// are resolved against `server.home_dir`.
fn resolve_dsn(db_config: &DatabaseConfig, args: &CliArgs, base_dir: &Path) -> Result<String> {
    if args.mock {
        return Ok(MOCK_DSN.to_string());
    }
    detect_from_dsn(db_config)?;
    let dsn = db_config.url.trim().to_owned();
    if dsn.starts_with("sqlite://") {
        absolutize_sqlite_dsn(&dsn, base_dir, true)
    } else {
        Ok(dsn)
    }
}

/// DSN safe to log: any password is masked.
fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_ok() {
                url.to_string()
            } else {
                "<redacted>".to_string()
            }
        }
        Ok(_) => dsn.to_string(),
        Err(_) if dsn.contains('@') => "<redacted>".to_string(),
        Err(_) => dsn.to_string(),
    }
}

fn connect_opts(db_config: &DatabaseConfig) -> ConnectOpts {
    ConnectOpts {
        max_conns: db_config.max_conns,
        min_conns: db_config.min_conns,
        acquire_timeout: Some(Duration::from_secs(
            db_config.acquire_timeout_secs.unwrap_or(5),
        )),
        create_sqlite_dirs: true,
        ..Default::default()
    }
}

fn build_registry() -> Result<ModuleRegistry> {
    let ingress = Arc::new(ApiIngress::default());
    let journaling = Arc::new(Journaling::default());

    let registry = ModuleRegistry::builder()
        .register(api_ingress::MODULE_NAME, ingress.clone())
        .with_rest_host(ingress)
        .register(journaling::MODULE_NAME, journaling.clone())
        .with_db(journaling.clone())
        .with_rest(journaling)
        .build()?;
    Ok(registry)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let config_provider = Arc::new(ModkitConfigAdapter(Arc::new(AppConfigProvider::new(
        config.clone(),
    ))));
    let base_dir = PathBuf::from(&config.server.home_dir);

    let db = match (config.database.as_ref(), args.mock) {
        (Some(db_config), _) => {
            let dsn = resolve_dsn(db_config, &args, &base_dir)?;
            let shown = redact_dsn(&dsn);
            tracing::info!("Connecting to database: {}", shown);
            let db = DbHandle::connect(&dsn, connect_opts(db_config))
                .await
                .with_context(|| format!("Failed to connect to database '{}'", shown))?;
            tracing::info!("Connected DB backend: {:?}", db.engine());
            DbOptions::Handle(Arc::new(db))
        }
        (None, true) => {
            tracing::info!("No database configured; --mock uses in-memory SQLite");
            let db = DbHandle::connect(MOCK_DSN, ConnectOpts::default()).await?;
            DbOptions::Handle(Arc::new(db))
        }
        (None, false) => {
            tracing::warn!("No database configuration found, running without database");
            DbOptions::None
        }
    };

    modkit::run(RunOptions {
        registry: build_registry()?,
        modules_cfg: config_provider,
        db,
        shutdown: ShutdownOptions::Signals,
    })
    .await
}

async fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db_config) = config.database.as_ref() {
        if !args.mock {
            let engine = detect_from_dsn(db_config)?;
            tracing::info!(?engine, "Database DSN is valid");
        }
    }

    let ingress: ApiIngressConfig = module_section(&config, api_ingress::MODULE_NAME)?;
    ingress
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", ingress.bind_addr))?;

    let journal: JournalingConfig = module_section(&config, journaling::MODULE_NAME)?;
    if journal.default_page_size == 0 || journal.default_page_size > journal.max_page_size {
        return Err(anyhow!(
            "modules.{}: default_page_size must be between 1 and max_page_size",
            journaling::MODULE_NAME
        ));
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}

/// Strict decode of `modules.<name>`; a missing section yields defaults.
fn module_section<T>(config: &AppConfig, name: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw = config
        .modules
        .get(name)
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));
    serde_json::from_value(raw).with_context(|| format!("Invalid config section modules.{}", name))
}
