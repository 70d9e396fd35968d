use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use chatbot_client::api::ApiError;
use chatbot_client::app::AppContainer;
use chatbot_client::config::{ClientConfig, ConfigError};
use chatbot_client::state::chat::{ChatController, Role};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("generative chat is not configured; set GENAI_API_KEY_ENV")]
    AssistantNotConfigured,
    #[error("{0}")]
    Rejected(String),
}

#[derive(Parser, Debug)]
#[command(name = "chatbot", about = "Chatbot client: sign in, sign up, and chat from the terminal")]
struct Cli {
    /// Overrides `CHATBOT_BASE_URL`.
    #[arg(long, env = "CHATBOT_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the access token.
    Login { username: String, password: String },
    /// Create an account.
    Signup {
        username: String,
        password: String,
        full_name: String,
    },
    /// Read questions from stdin, one per line, and print replies.
    Chat {
        /// Talk to the generative service instead of the backend.
        #[arg(long)]
        assistant: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let app = AppContainer::from_config(config).await?;

    match cli.command {
        Command::Login { username, password } => run_login(&app, &username, &password).await,
        Command::Signup { username, password, full_name } => {
            run_signup(&app, &username, &password, &full_name).await
        }
        Command::Chat { assistant } => {
            let controller = if assistant {
                app.assistant_chat().ok_or(CliError::AssistantNotConfigured)?
            } else {
                if app.prefs().current_access_token().is_empty() {
                    eprintln!("not signed in; backend chat requests will be rejected until `chatbot login`");
                }
                app.backend_chat()
            };
            run_chat(&controller).await
        }
    }
}

async fn run_login(app: &AppContainer, username: &str, password: &str) -> Result<(), CliError> {
    let controller = app.sign_in();
    controller.on_username_change(username);
    controller.on_password_change(password);
    controller.on_sign_in_click();
    controller.settle().await;

    let state = controller.state();
    if state.is_logged_in {
        println!("signed in as {username}; token saved to {}", app.prefs().path().display());
        return Ok(());
    }
    controller.error_shown();
    Err(CliError::Rejected(state.error.unwrap_or_else(|| "sign in failed".to_owned())))
}

async fn run_signup(app: &AppContainer, username: &str, password: &str, full_name: &str) -> Result<(), CliError> {
    let controller = app.sign_up();
    controller.on_username_change(username);
    controller.on_password_change(password);
    controller.on_full_name_change(full_name);
    controller.on_confirm_click();
    controller.settle().await;

    let state = controller.state();
    if state.is_signed_up {
        println!("account created; run `chatbot login {username} <password>` to sign in");
        return Ok(());
    }
    controller.error_shown();
    Err(CliError::Rejected(state.error_message.unwrap_or_else(|| "sign up failed".to_owned())))
}

async fn run_chat(controller: &ChatController) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = 0;

    while let Some(line) = lines.next_line().await? {
        controller.on_input_change(&line);
        controller.send_message();
        controller.settle().await;

        let state = controller.state();
        for message in state.messages.iter().skip(printed) {
            if message.role == Role::Model {
                println!("{}", message.text);
            }
        }
        printed = state.messages.len();

        if let Some(error) = state.error_message {
            eprintln!("error: {error}");
            controller.error_shown();
        }
    }

    controller.shutdown();
    Ok(())
}
