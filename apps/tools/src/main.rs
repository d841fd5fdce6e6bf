use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::Todo;
use storage::{prepare_database_url, seed, Storage, TodoRepository, DEFAULT_DATABASE_URL};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// A sqlite url or a plain file path.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database if needed and apply migrations.
    Migrate,
    Seed {
        #[arg(long, default_value_t = seed::DEFAULT_RANDOM_TODOS)]
        random: usize,
    },
    List,
    PurgeCompleted,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();
    let (storage, database_url) = open_storage(&cli.database_url).await?;

    match cli.command {
        Command::Migrate => {
            info!(%database_url, "migrations applied");
        }
        Command::Seed { random } => {
            let inserted = seed::seed(&storage, random).await?;
            println!("seeded {} todos", inserted.len());
        }
        Command::List => {
            for todo in storage.list_todos().await? {
                println!("{}", format_row(&todo));
            }
        }
        Command::PurgeCompleted => {
            let removed = purge_completed(&storage).await?;
            println!("removed {removed} completed todos");
        }
    }

    Ok(())
}

async fn open_storage(raw_database_url: &str) -> Result<(Storage, String)> {
    let database_url = prepare_database_url(raw_database_url)?;
    let storage = Storage::new(&database_url).await?;
    Ok((storage, database_url))
}

async fn purge_completed(repo: &dyn TodoRepository) -> Result<usize> {
    let mut removed = 0;
    for todo in repo.list_todos().await?.into_iter().filter(|t| t.completed) {
        if repo.delete_todo(todo.id).await? {
            removed += 1;
        }
    }
    Ok(removed)
}

fn format_row(todo: &Todo) -> String {
    format!(
        "{:>4} [{}] {} ({})",
        todo.id.0,
        if todo.completed { 'x' } else { ' ' },
        todo.title,
        todo.created_at.format("%Y-%m-%d %H:%M")
    )
}
