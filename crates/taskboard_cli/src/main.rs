//! `taskboard` command line entry point.
//!
//! # Responsibility
//! - `serve`: run the task store HTTP service.
//! - `list|add|show|toggle|delete`: drive the task board against a running
//!   service and print the resulting view.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_client::{TaskApi, TaskBackend, TaskBoard, API_URL_VAR, DEFAULT_API_URL};
use taskboard_core::config::LOG_LEVEL_VAR;
use taskboard_core::{
    core_version, init_logging, init_stderr_logging, parse_task_id, DatabaseLocation,
    ServerConfig, TaskId,
};
use taskboard_server::TaskServer;

const CLIENT_LOG_LEVEL: &str = "warn";

/// Minimal task tracker: REST service and terminal client
#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the task store HTTP service
    ///
    /// Reads PORT, DATABASE_URL, TASKBOARD_LOG_LEVEL and TASKBOARD_LOG_DIR.
    Serve {
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// SQLite path or `:memory:` (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Show all tasks, newest first
    List {
        #[command(flatten)]
        remote: Remote,
    },

    /// Create a task
    Add {
        title: String,

        #[arg(long, short)]
        description: Option<String>,

        #[command(flatten)]
        remote: Remote,
    },

    /// Show one task
    Show {
        id: String,

        #[command(flatten)]
        remote: Remote,
    },

    /// Flip a task between open and completed
    Toggle {
        id: String,

        #[command(flatten)]
        remote: Remote,
    },

    /// Delete a task
    Delete {
        id: String,

        #[command(flatten)]
        remote: Remote,
    },
}

#[derive(clap::Args)]
struct Remote {
    /// Base URL of the task service
    #[arg(long, env = API_URL_VAR, default_value = DEFAULT_API_URL)]
    api_url: String,
}

impl Remote {
    fn board(&self) -> TaskBoard<TaskApi> {
        TaskBoard::new(TaskApi::new(self.api_url.as_str()))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(message) = load_dotenv(dotenvy::dotenv()) {
        eprintln!("warning: {message}");
    }
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Serve {
            port,
            database_url,
        } => serve(port, database_url).await,
        Commands::List { remote } => {
            init_client_logging()?;
            let mut board = remote.board();
            board.load().await?;
            print!("{}", board.render());
            Ok(())
        }
        Commands::Add {
            title,
            description,
            remote,
        } => {
            init_client_logging()?;
            let mut board = remote.board();
            board.load().await?;
            board.set_title(title);
            board.set_description(description.unwrap_or_default());
            if board.submit().await?.is_none() {
                return Err(anyhow!("title is required"));
            }
            print!("{}", board.render());
            Ok(())
        }
        Commands::Show { id, remote } => {
            init_client_logging()?;
            let id = parse_id(&id)?;
            let task = TaskApi::new(remote.api_url.as_str()).get_task(id).await?;
            let mark = if task.completed { 'x' } else { ' ' };
            println!("[{mark}] {}  ({})", task.title, task.id);
            if let Some(description) = task.description.as_deref() {
                println!("    {description}");
            }
            println!("    Created: {}", task.created_at.to_rfc3339());
            println!("    Updated: {}", task.updated_at.to_rfc3339());
            Ok(())
        }
        Commands::Toggle { id, remote } => {
            init_client_logging()?;
            let id = parse_id(&id)?;
            let mut board = remote.board();
            board.load().await?;
            board.toggle(id).await?;
            print!("{}", board.render());
            Ok(())
        }
        Commands::Delete { id, remote } => {
            init_client_logging()?;
            let id = parse_id(&id)?;
            let mut board = remote.board();
            board.load().await?;
            board.delete(id).await?;
            print!("{}", board.render());
            Ok(())
        }
    }
}

async fn serve(port: Option<u16>, database_url: Option<String>) -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(url) = database_url {
        config.database = DatabaseLocation::parse(&url);
    }

    match config.log_dir.as_deref() {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| anyhow!("log directory must be valid UTF-8"))?;
            init_logging(&config.log_level, dir).map_err(|err| anyhow!(err))?
        }
        None => init_stderr_logging(&config.log_level).map_err(|err| anyhow!(err))?,
    }

    info!(
        "event=config_load module=cli status=ok core_version={} port={} database={}",
        core_version(),
        config.port,
        config.database
    );
    println!("Server running on port: {}", config.port);
    TaskServer::start(&config)
        .await
        .context("task service stopped with an error")
}

/// A missing `.env` is normal; anything else (bad syntax, unreadable file)
/// is reported but does not stop the command.
fn load_dotenv(loaded: Result<PathBuf, dotenvy::Error>) -> Result<(), String> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(format!("ignoring .env file: {err}")),
    }
}

fn init_client_logging() -> Result<()> {
    let level = std::env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| CLIENT_LOG_LEVEL.to_string());
    init_stderr_logging(&level).map_err(|err| anyhow!(err))
}

fn parse_id(raw: &str) -> Result<TaskId> {
    parse_task_id(raw).map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::{load_dotenv, Cli, Commands};
    use clap::{CommandFactory, Parser};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_description() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "add",
            "buy milk",
            "--description",
            "2 liters",
            "--api-url",
            "http://127.0.0.1:9000",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                title,
                description,
                remote,
            } => {
                assert_eq!(title, "buy milk");
                assert_eq!(description.as_deref(), Some("2 liters"));
                assert_eq!(remote.api_url, "http://127.0.0.1:9000");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parses_serve_overrides() {
        let cli =
            Cli::try_parse_from(["taskboard", "serve", "--port", "8080", "--database-url", ":memory:"])
                .unwrap();
        match cli.command {
            Commands::Serve { port, database_url } => {
                assert_eq!(port, Some(8080));
                assert_eq!(database_url.as_deref(), Some(":memory:"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn missing_dotenv_is_silent() {
        let missing = tempfile::tempdir().unwrap().path().join("absent.env");
        assert!(load_dotenv(dotenvy::from_path(&missing).map(|()| missing.clone())).is_ok());
        assert!(load_dotenv(Ok(PathBuf::from(".env"))).is_ok());
    }

    #[test]
    fn malformed_dotenv_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PORT 3000 'unterminated").unwrap();
        let path = file.path().to_path_buf();

        let message = load_dotenv(dotenvy::from_path(&path).map(|()| path.clone())).unwrap_err();
        assert!(message.starts_with("ignoring .env file:"));
    }
}
