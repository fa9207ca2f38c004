use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sprintboard::{
    Backend, Config, JsonlSlot, Overrides, Priority, Projection, Slot, SortOrder, SqliteSlot, Status, StoreError,
    SystemClock, TaskFilter, TaskInput, TaskStore,
};

#[derive(Parser)]
#[command(name = "sprintboard")]
#[command(about = "SprintBoard CLI - single-user kanban board (Backlog / In Progress / Done)")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the board directory (default: current directory)
    #[arg(short, long, env = "SPRINTBOARD_PATH")]
    store_path: Option<PathBuf>,

    /// Storage backend: jsonl or sqlite
    #[arg(short, long, env = "SPRINTBOARD_BACKEND")]
    backend: Option<Backend>,

    /// Config file (default: ~/.config/sprintboard/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task to the Backlog column
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, default_value = "P2")]
        priority: Priority,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,

        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// Edit a task; omitted fields keep their current values
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(long)]
        due: Option<NaiveDate>,

        /// Comma-separated tags (replaces the current set)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a task
    Rm {
        id: String,

        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Move a task to another column
    Mv {
        id: String,

        /// backlog, in-progress or done
        status: Status,

        /// Mark an overdue task as Done without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the board
    Ls {
        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long)]
        tag: Option<String>,

        /// Due date order: asc or desc
        #[arg(long)]
        sort: Option<SortOrder>,
    },

    /// List every tag in use
    Tags,
}

fn main() -> Result<()> {
    // Logs go to stderr so board output stays clean; RUST_LOG=debug for detail
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::load(
        cli.config.as_deref(),
        Overrides {
            store_path: cli.store_path,
            backend: cli.backend,
            sort: None,
        },
    )?;

    match config.backend {
        Backend::Jsonl => {
            let slot = JsonlSlot::open(&config.store_path)?;
            run(TaskStore::open(slot, SystemClock), cli.command, &config)
        }
        Backend::Sqlite => {
            let slot = SqliteSlot::open(&config.store_path)?;
            run(TaskStore::open(slot, SystemClock), cli.command, &config)
        }
    }
}

fn run<S: Slot>(mut store: TaskStore<S>, command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Add {
            title,
            description,
            priority,
            due,
            tags,
        } => {
            let input = TaskInput::new(title, due)
                .description(description)
                .priority(priority)
                .tags(tags);
            let task = store.create(&input)?;
            println!("Created task {}", task.id);
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            due,
            tags,
        } => {
            let mut input = store.begin_edit(&id)?;
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(description) = description {
                input.description = description;
            }
            if let Some(priority) = priority {
                input.priority = priority;
            }
            if let Some(due) = due {
                input.due_date = due;
            }
            if let Some(tags) = tags {
                input.tags = tags;
            }
            let task = store.submit(&input)?;
            println!("Updated task {}", task.id);
        }
        Commands::Rm { id, yes } => {
            if !yes && !confirm("Delete this task?")? {
                println!("Delete cancelled");
                return Ok(());
            }
            let task = store.delete(&id)?;
            println!("Deleted task {} ({})", task.id, task.title);
        }
        Commands::Mv { id, status, yes } => {
            let task = match store.move_to(&id, status, yes) {
                Err(StoreError::Blocked { .. }) => {
                    if !confirm("Task is overdue. Mark as Done anyway?")? {
                        println!("Move cancelled");
                        return Ok(());
                    }
                    store.move_to(&id, status, true)?
                }
                other => other?,
            };
            println!("Moved task {} to {}", task.id, task.status);
        }
        Commands::Ls { priority, tag, sort } => {
            let mut filter = TaskFilter::default().sort(sort.unwrap_or(config.sort));
            if let Some(priority) = priority {
                filter = filter.priority(priority);
            }
            if let Some(tag) = tag {
                filter = filter.tag(tag);
            }
            render_board(&store.query(&filter));
        }
        Commands::Tags => {
            for tag in store.distinct_tags() {
                println!("{}", tag);
            }
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    confirm_from(&mut io::stdin().lock(), prompt)
}

/// Ask a yes/no question; anything but y/yes (including EOF) is a no
fn confirm_from<R: BufRead>(input: &mut R, prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn priority_badge(priority: Priority) -> ColoredString {
    let label = format!("[{}]", priority);
    match priority {
        Priority::P1 => label.red().bold(),
        Priority::P2 => label.yellow(),
        Priority::P3 => label.green(),
    }
}

fn render_board(projection: &Projection<'_>) {
    for status in Status::ALL {
        let count = projection.column(status).count();
        println!("{} ({})", status.as_str().bold().underline(), count);

        for view in projection.column(status) {
            let task = view.task;
            let due = format!("due {}", task.due_date);
            let due = if view.overdue { due.red() } else { due.dimmed() };

            print!("  {} {}  {}", priority_badge(task.priority), task.title, due);
            if view.overdue {
                print!(" {}", "OVERDUE".on_red().white().bold());
            }
            if !task.tags.is_empty() {
                let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t)).collect();
                print!("  {}", tags.join(" ").cyan());
            }
            println!();

            if !task.description.is_empty() {
                println!("      {}", task.description.dimmed());
            }
            println!("      {}", task.id.dimmed());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm_accepts_yes() {
        assert!(confirm_from(&mut Cursor::new("y\n"), "Delete this task?").unwrap());
        assert!(confirm_from(&mut Cursor::new(" YES \n"), "Delete this task?").unwrap());
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        assert!(!confirm_from(&mut Cursor::new("\n"), "Delete this task?").unwrap());
        assert!(!confirm_from(&mut Cursor::new("nope\n"), "Delete this task?").unwrap());
        assert!(!confirm_from(&mut Cursor::new(""), "Delete this task?").unwrap());
    }

    #[test]
    fn test_rm_yes_flag_parses() {
        let cli = Cli::try_parse_from(["sprintboard", "rm", "abc", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Rm { ref id, yes: true } if id == "abc"));

        let cli = Cli::try_parse_from(["sprintboard", "rm", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Rm { yes: false, .. }));
    }
}
