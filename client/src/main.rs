use clap::{Parser, Subcommand};
use jot_api::v1::Todo;
use jot_client::{Client, DEFAULT_URL};
use uuid::Uuid;

/// Manage the todo list from the command line.
#[derive(Debug, Parser)]
#[command(name = "jot", version)]
struct Cli {
    /// Base url of the api.
    #[arg(long, env = "JOT_URL", default_value = DEFAULT_URL)]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every todo, newest first.
    List,
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },
    Edit {
        id: Uuid,
        #[arg(required = true)]
        text: Vec<String>,
    },
    Done {
        id: Uuid,
    },
    Undo {
        id: Uuid,
    },
    Rm {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let client = Client::new(cli.url);

    match cli.command {
        Command::List => {}
        Command::Add { text } => {
            client.create(&text.join(" ")).await?;
        }
        Command::Edit { id, text } => {
            client.set_text(id, &text.join(" ")).await?;
        }
        Command::Done { id } => {
            client.set_completed(id, true).await?;
        }
        Command::Undo { id } => {
            client.set_completed(id, false).await?;
        }
        Command::Rm { id } => {
            println!("{}", client.delete(id).await?);
        }
    }

    // always show the fresh list, like the page did after every change
    for todo in client.list().await? {
        print_todo(&todo);
    }

    Ok(())
}

fn print_todo(todo: &Todo) {
    let mark = if todo.completed { 'x' } else { ' ' };
    println!("[{}] {}  {}", mark, todo.text, todo.id);
}
