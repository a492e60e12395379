use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use taskboard_client::config::ClientConfig;
use taskboard_client::render::{render_error, render_list, render_task};
use taskboard_client::{BoardError, HttpTaskApi, TaskBoard, TaskForm};
use taskboard_core::{TaskFilter, TaskPriority, TaskStatus};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Manage tasks on a taskboard server")]
struct Cli {
    /// Base URL of the API, overriding TASKBOARD_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// List tasks, newest first.
    List {
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
    },
    /// Show a single task.
    Show { id: Uuid },
    /// Create a task.
    Create {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: FormFields,
    },
    /// Edit a task. Pass an empty string to clear the description or due date.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: FormFields,
    },
    /// Delete a task.
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Args)]
struct FormFields {
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    status: Option<TaskStatus>,
    #[arg(long)]
    priority: Option<TaskPriority>,
    /// Due date as YYYY-MM-DD.
    #[arg(long)]
    due: Option<String>,
}

impl FormFields {
    fn apply(self, form: &mut TaskForm) {
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(priority) = self.priority {
            form.priority = priority;
        }
        if let Some(due) = self.due {
            form.due_date = due;
        }
    }
}

/// Asks before deleting. Anything but an explicit yes, including end of input, declines.
fn confirm(id: Uuid, input: &mut impl BufRead, output: &mut impl Write) -> std::io::Result<bool> {
    write!(output, "Delete task {id}? [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn run(board: &TaskBoard<HttpTaskApi>, command: Commands) -> Result<(), BoardError> {
    match command {
        Commands::List { status, priority } => {
            print!("{}", render_list(&board.list_state()));
            let state = board.set_filter(TaskFilter { status, priority }).await;
            print!("{}", render_list(&state));
        }
        Commands::Show { id } => {
            let task = board.fetch_task(id).await?;
            print!("{}", render_task(&task));
        }
        Commands::Create { title, fields } => {
            let mut form = TaskForm {
                title,
                ..TaskForm::new()
            };
            fields.apply(&mut form);
            board.open_create_form();
            let task = board.submit(&form).await?;
            println!("Created task {}", task.id);
            print!("{}", render_list(&board.list_state()));
        }
        Commands::Edit { id, title, fields } => {
            let current = board.fetch_task(id).await?;
            let mut form = TaskForm::from_task(&current);
            if let Some(title) = title {
                form.title = title;
            }
            fields.apply(&mut form);
            board.open_edit_form(current);
            let task = board.submit(&form).await?;
            print!("{}", render_task(&task));
        }
        Commands::Delete { id, yes } => {
            board.request_delete(id);
            let confirmed = yes
                || match confirm(id, &mut std::io::stdin().lock(), &mut std::io::stdout()) {
                    Ok(answer) => answer,
                    Err(err) => {
                        tracing::error!("Could not read confirmation for task {}: {}", id, err);
                        false
                    }
                };
            if !confirmed {
                board.cancel_delete();
                println!("Cancelled");
                return Ok(());
            }
            board.confirm_delete().await?;
            println!("Deleted task {id}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let board = TaskBoard::new(HttpTaskApi::new(&config)?);
    if let Err(err) = run(&board, cli.command).await {
        eprint!("{}", render_error(&err.messages()));
        std::process::exit(1);
    }
    Ok(())
}
