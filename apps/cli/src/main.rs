use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use client_core::{ClientError, TodoClient};
use shared::{domain::TodoId, protocol::UpdateTodoRequest};
use tracing_subscriber::EnvFilter;

mod render;

use render::{render_api_error, render_page};

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Manage todos on a todo server")]
struct Cli {
    #[arg(long, env = "TODO_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every todo (the default).
    List,
    Add {
        title: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Flip a todo between pending and completed.
    Toggle { id: i64 },
    Done { id: i64 },
    Undo { id: i64 },
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    Rm { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();
    let client = TodoClient::new(&cli.server_url)?;

    match run(&client, cli.command.unwrap_or(Command::List)).await {
        Ok(page) => {
            print!("{}", render_page(&page, Utc::now()));
            Ok(())
        }
        Err(ClientError::Api(err)) => {
            eprintln!("error: {}", render_api_error(&err));
            std::process::exit(1);
        }
        Err(err) => Err(err).with_context(|| format!("request to {} failed", client.server_url())),
    }
}

async fn run(
    client: &TodoClient,
    command: Command,
) -> Result<shared::protocol::TodoPage, ClientError> {
    match command {
        Command::List => client.page().await,
        Command::Add { title, description } => {
            client.create(&title, description.as_deref()).await
        }
        Command::Toggle { id } => client.toggle(TodoId(id)).await,
        Command::Done { id } => client.set_completed(TodoId(id), true).await,
        Command::Undo { id } => client.set_completed(TodoId(id), false).await,
        Command::Edit {
            id,
            title,
            description,
            clear_description,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            let changes = UpdateTodoRequest {
                title: title.map(Some),
                description,
                completed: None,
            };
            client.update(TodoId(id), &changes).await
        }
        Command::Rm { id } => client.delete(TodoId(id)).await,
    }
}
