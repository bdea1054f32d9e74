//! Task Tracker - File-Backed Task Tracking
//!
//! Command-line front end for the task tracker: add, update, delete,
//! and list tasks kept in a single JSON file.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;

use task_tracker::{Result, Status, Task, TaskId, TaskRepository, TaskUpdate};

#[derive(Parser)]
#[command(name = "task-cli")]
#[command(version = "0.1.0")]
#[command(about = "Track tasks in a single JSON file", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the task file (defaults to the user data directory)
    #[arg(short, long, global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Task file name inside the directory
    #[arg(short, long, global = true, default_value = "tasks.json")]
    file: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// What needs doing (at most 300 characters)
        description: String,
    },

    /// Change a task's description and/or status
    Update {
        /// Id of the task to update
        id: TaskId,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New status: todo, in-progress, or done
        #[arg(short, long, value_parser = parse_status)]
        status: Option<Status>,
    },

    /// Delete a task
    Delete {
        /// Id of the task to delete
        id: TaskId,
    },

    /// List tasks, all of them or filtered by status
    List {
        /// Only show tasks with this status: todo, in-progress, or done
        #[arg(short, long, value_parser = parse_status)]
        status: Option<Status>,
    },
}

fn parse_status(raw: &str) -> Result<Status> {
    raw.parse()
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "task_tracker=debug,info"
    } else {
        "task_tracker=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), err);
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("   {} {}", "caused by:".dimmed(), cause);
            source = cause.source();
        }
        process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = cli.dir.unwrap_or_else(default_dir);
    let mut repo = TaskRepository::open(dir, cli.file)?;

    if cli.verbose {
        println!(
            "{} Task file: {}",
            "Info:".blue(),
            repo.file_path().display()
        );
    }

    match cli.command {
        Commands::Add { description } => {
            let task = repo.create_task(description)?;
            println!("{} Added task {}", "OK".green().bold(), task.id);
            print_task(&task);
        }

        Commands::Update {
            id,
            description,
            status,
        } => {
            let mut update = TaskUpdate::new();
            if let Some(description) = description {
                update = update.with_description(description);
            }
            if let Some(status) = status {
                update = update.with_status(status);
            }

            if update.is_empty() {
                // Still checks the id exists; just writes nothing.
                let task = repo.update_task(id, update)?;
                println!("{} Nothing to change for task {}", "Note:".yellow(), task.id);
                print_task(&task);
            } else {
                let task = repo.update_task(id, update)?;
                println!("{} Updated task {}", "OK".green().bold(), task.id);
                print_task(&task);
            }
        }

        Commands::Delete { id } => {
            let task = repo.delete_task(id)?;
            println!("{} Deleted task {}", "OK".green().bold(), task.id);
            print_task(&task);
        }

        Commands::List { status } => {
            let tasks = match status {
                Some(status) => repo.read_many_tasks(status)?,
                None => repo.read_all_tasks()?,
            };

            if tasks.is_empty() {
                match status {
                    Some(status) => {
                        println!("{} No tasks with status '{}'", "Note:".yellow(), status);
                    }
                    None => println!("{} No tasks found", "Note:".yellow()),
                }
            } else {
                println!("\n{} {} total", "Tasks:".cyan().bold(), tasks.len());
                println!("{}", "─".repeat(60));
                for task in tasks.values() {
                    print_task(task);
                }
            }
        }
    }

    Ok(())
}

fn print_task(task: &Task) {
    println!(
        "   {:>4}  {}  {}  {}",
        task.id,
        status_label(task.status),
        task.description,
        task.updated_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dimmed()
    );
}

fn status_label(status: Status) -> colored::ColoredString {
    // Pad before coloring so ANSI escapes don't break column alignment.
    let padded = format!("{:<11}", status.as_str());
    match status {
        Status::Todo => padded.yellow(),
        Status::InProgress => padded.blue(),
        Status::Done => padded.green(),
    }
}

fn default_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("task-tracker"))
        .unwrap_or_else(|| PathBuf::from("."))
}
