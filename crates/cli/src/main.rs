mod db_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    lintel_config::LintelConfig,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "lintel", about = "Lintel: code analysis history server", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of the discovered one.
    #[arg(long, global = true, env = "LINTEL_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value and `PORT`).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// SQLite database file (overrides config value).
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default when no subcommand is provided).
    Serve,
    /// Database management (migrate, list).
    Db {
        #[command(subcommand)]
        action: db_commands::DbAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Config file (explicit or discovered), then environment, then CLI flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<LintelConfig> {
    let config = match cli.config.as_deref() {
        Some(path) => lintel_config::load_config(path)?,
        None => lintel_config::discover_and_load(),
    };
    let mut config = lintel_config::apply_env_overrides(config);

    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(path) = &cli.db_path {
        config.database.path = path.clone();
    }
    Ok(config)
}

#[cfg(feature = "web-ui")]
fn web_routes() -> axum::Router<lintel_gateway::server::AppState> {
    lintel_web::web_routes()
}

#[cfg(not(feature = "web-ui"))]
fn web_routes() -> axum::Router<lintel_gateway::server::AppState> {
    axum::Router::new()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    let config = resolve_config(&cli)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            info!(version = env!("CARGO_PKG_VERSION"), "lintel starting");
            lintel_gateway::server::start_gateway(&config, web_routes()).await
        },
        Some(Commands::Db { action }) => db_commands::handle_db(action, &config).await,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["lintel"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
        assert!(!cli.json_logs);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["lintel", "db", "list", "--limit", "5", "--json-logs"])
            .unwrap();
        assert!(cli.json_logs);
        assert!(matches!(
            cli.command,
            Some(Commands::Db {
                action: db_commands::DbAction::List { limit: Some(5) }
            })
        ));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lintel.toml");
        std::fs::write(
            &path,
            "[server]\nbind = \"0.0.0.0\"\nport = 4000\n\n[database]\npath = \"from-file.db\"\n",
        )
        .unwrap();
        let config_arg = path.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["lintel", "--config", config_arg.as_str()]).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.database.path, PathBuf::from("from-file.db"));

        let cli = Cli::try_parse_from([
            "lintel",
            "--config",
            config_arg.as_str(),
            "--port",
            "5050",
            "--bind",
            "127.0.0.2",
            "--db-path",
            "cli.db",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.server.bind, "127.0.0.2");
        assert_eq!(config.database.path, PathBuf::from("cli.db"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = Cli::try_parse_from(["lintel", "--config", "/nonexistent/lintel.toml"]).unwrap();
        assert!(resolve_config(&cli).is_err());
    }
}
