use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use scout_session::{
    AuthError, FetchOutcome, FileStore, HttpAuthApi, Session, SessionConfig, SessionStore, StorageError,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("not logged in")]
    NotLoggedIn,
}

#[derive(Parser, Debug)]
#[command(name = "scout-session", about = "ScoutTalent auth session CLI")]
struct Cli {
    /// Auth service base URL; overrides `AUTH_SERVICE_URL`.
    #[arg(long)]
    auth_url: Option<String>,

    /// Session file; overrides `SESSION_STORE_PATH`.
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session.
    Login {
        email: String,
        #[arg(long, env = "SCOUT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account without logging in.
    Register {
        email: String,
        #[arg(long, env = "SCOUT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: String,
    },
    /// Validate the persisted session against the service.
    Whoami,
    /// Print the persisted session without contacting the service.
    Status,
    /// Clear the persisted session.
    Logout,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {}", error_message(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = SessionConfig::from_env()?;
    if let Some(url) = cli.auth_url {
        config.auth_service_url = scout_session::config::normalize_base_url(&url);
    }
    if let Some(path) = cli.store {
        config.store_path = path;
    }

    let api = HttpAuthApi::from_config(&config)?;
    let storage = FileStore::open(&config.store_path)?;
    let store =
        SessionStore::new(Arc::new(api), Arc::new(storage)).with_fetch_failure_policy(config.fetch_failure_policy);
    store.initialize_from_storage().await;

    match cli.command {
        Command::Login { email, password } => {
            let response = store.login(&email, &password).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Register { email, password, full_name } => {
            let response = store.register(&email, &password, &full_name).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Whoami => match store.fetch_current_user().await {
            FetchOutcome::NoSession => return Err(CliError::NotLoggedIn),
            FetchOutcome::Validated => print_session(&store.snapshot().await)?,
            FetchOutcome::Invalidated(e) => {
                eprintln!("session is no longer valid and was cleared: {e}");
                return Err(CliError::NotLoggedIn);
            }
            FetchOutcome::Superseded => {
                let session = store.snapshot().await;
                if !session.is_authenticated() {
                    return Err(CliError::NotLoggedIn);
                }
                print_session(&session)?;
            }
            FetchOutcome::Unverified(e) => {
                eprintln!("could not verify session: {e}");
                print_session(&store.snapshot().await)?;
            }
        },
        Command::Status => {
            let session = store.snapshot().await;
            if !session.is_authenticated() {
                return Err(CliError::NotLoggedIn);
            }
            print_session(&session)?;
        }
        Command::Logout => {
            store.logout().await;
            println!("logged out");
        }
    }

    Ok(())
}

/// Error line for the terminal; rejections carry the service's own message.
fn error_message(err: &CliError) -> String {
    match err {
        CliError::Auth(AuthError::Rejected { body, .. }) => match service_message(body) {
            Some(message) => format!("{err}: {message}"),
            None => err.to_string(),
        },
        _ => err.to_string(),
    }
}

/// The `error` field of a JSON error body, or the trimmed raw body.
fn service_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .or_else(|| Some(body.to_owned())),
        Err(_) => Some(body.to_owned()),
    }
}

fn print_session(session: &Session) -> Result<(), CliError> {
    let body = serde_json::json!({
        "authenticated": session.is_authenticated(),
        "user": session.user,
        "profile_id": session.profile_id,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
