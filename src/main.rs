use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::fs;
use std::path::PathBuf;
use tasktracker::{
    BackendKind, Config, KvBackend, Priority, StatusFilter, Task, TaskDraft, TaskPatch, TaskStore, ViewQuery,
    default_export_file_name, export_document, import_document,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasktracker")]
#[command(about = "TaskTracker CLI - personal task list with local persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/tasktracker/tasktracker.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage backend, overriding the config file
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Data directory, overriding the config file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,

        /// Create the task already completed
        #[arg(long)]
        completed: bool,
    },

    /// Edit fields of an existing task
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Flip a task between pending and completed
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// Show tasks, pending first, then by priority and age
    List {
        #[arg(short, long, default_value_t = StatusFilter::All)]
        filter: StatusFilter,

        /// Case-insensitive text to look for in titles and descriptions
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Write all tasks to a JSON document
    Export {
        /// Output file, or `-` for stdout (default: tasks_<YYYY-MM-DD>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all tasks with the valid entries of a JSON document
    Import { path: PathBuf },

    /// Delete every task
    Clear {
        /// Confirm; this cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Show or set the display theme
    Theme { mode: Option<ThemeMode> },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Dark,
    Light,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    // Open store
    let mut store = TaskStore::open(config.open_backend()?);

    match cli.command {
        Commands::Add {
            title,
            description,
            priority,
            completed,
        } => {
            let draft = TaskDraft::new(title, description)
                .priority(priority)
                .completed(completed)
                .validate()?;
            let task = store.create(draft);
            println!("Created {}", task.id.bold());
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            completed,
        } => {
            let patch = TaskPatch {
                title,
                description,
                priority,
                completed,
            };
            if patch.is_empty() {
                return Err(eyre!("Nothing to edit; pass --title, --description, --priority or --completed"));
            }
            let patch = patch.validate()?;
            report_missing(store.update(&id, patch), &id, "Updated");
        }
        Commands::Toggle { id } => {
            report_missing(store.toggle_complete(&id), &id, "Toggled");
        }
        Commands::Delete { id } => {
            report_missing(store.delete(&id), &id, "Deleted");
        }
        Commands::List { filter, search } => {
            print_list(&store, &ViewQuery::new(filter, search));
        }
        Commands::Export { output } => {
            if store.is_empty() {
                println!("No tasks to export");
                return Ok(());
            }
            let document = export_document(store.tasks())?;
            let output = output.unwrap_or_else(|| PathBuf::from(default_export_file_name()));
            if output.as_os_str() == "-" {
                println!("{}", document);
            } else {
                fs::write(&output, document).with_context(|| format!("Failed to write {:?}", output))?;
                println!("Exported {} tasks to {}", store.len(), output.display());
            }
        }
        Commands::Import { path } => {
            let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
            match import_document(&text) {
                Ok(tasks) => {
                    let count = tasks.len();
                    store.replace_all(tasks);
                    println!("Imported {} tasks", count);
                }
                Err(e) => {
                    eprintln!("{}", "Error importing tasks. Please check the file format.".red());
                    return Err(e.into());
                }
            }
        }
        Commands::Clear { yes } => {
            if !yes {
                return Err(eyre!("Refusing to delete all tasks without --yes"));
            }
            let count = store.len();
            store.clear();
            println!("Deleted {} tasks", count);
        }
        Commands::Theme { mode } => {
            if let Some(mode) = mode {
                let dark = matches!(mode, ThemeMode::Dark);
                store.persistence_mut().save_dark_mode_preference(dark);
            }
            let dark = store.persistence().load_dark_mode_preference();
            println!("Theme: {}", if dark { "dark" } else { "light" });
        }
    }

    Ok(())
}

fn report_missing(found: bool, id: &str, verb: &str) {
    if found {
        println!("{} {}", verb, id.bold());
    } else {
        println!("{}", format!("No task with id {}", id).yellow());
    }
}

fn print_list<B: KvBackend>(store: &TaskStore<B>, query: &ViewQuery) {
    let tasks = store.view(query);

    if tasks.is_empty() {
        println!("{}", query.empty_message());
    }

    for task in tasks {
        print_task(task);
    }

    let counts = store.counts();
    let totals: Vec<String> = [StatusFilter::All, StatusFilter::Pending, StatusFilter::Completed]
        .into_iter()
        .map(|filter| {
            let label = format!("{}: {}", filter, counts.for_filter(filter));
            if filter == query.status { label.bold().to_string() } else { label }
        })
        .collect();
    println!();
    println!("{}", totals.join("  "));
}

fn print_task(task: &Task) {
    let check = if task.completed { "[x]".green() } else { "[ ]".normal() };
    let priority = match task.priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".blue(),
    };
    let title = if task.completed {
        task.title.strikethrough()
    } else {
        task.title.bold()
    };

    println!("{} {:<6} {}  {}", check, priority, title, task.id.dimmed());
    println!("      {}", task.description);

    let mut dates = format!("created {}", task.created_at.format("%b %-d, %Y %H:%M"));
    if task.updated_at != task.created_at {
        dates.push_str(&format!(", updated {}", task.updated_at.format("%b %-d, %Y %H:%M")));
    }
    println!("      {}", dates.dimmed());
}
