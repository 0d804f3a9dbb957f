mod list;
mod tui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use taskboard_core::{
    apply_input, draft_from_input, parse_args, Config, FilterSelector, KeyValueStore, Task,
    TaskService, TaskUpdate, Theme,
};
use tracing_subscriber::EnvFilter;

pub type Service = TaskService<Box<dyn KeyValueStore>>;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "A personal task board", long_about = None)]
struct Cli {
    /// Directory holding the task and theme files (default: ~/.taskboard)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is saved
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a task (usage: add "Buy milk" pri:low cat:shopping due:fri desc:2l)
    Add {
        /// Title words plus key:value metadata
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Edit a task by id (usage: edit 3f2a9c1d "New title" pri:high)
    Edit {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Mark a task done, or undone if it already is
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// List tasks
    List {
        /// all, pending, completed, high, medium, low, work, personal, shopping, health
        #[arg(short, long, default_value = "all")]
        filter: FilterSelector,
        /// Case-insensitive text to look for in title and description
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show task counters
    Stats,
    /// Show or change the display theme
    Theme { mode: Option<ThemeMode> },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.ephemeral)?;
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(&config, interactive)?;

    let mut service: Service = TaskService::open(config.open_store()?);

    match cli.command {
        Some(Commands::Add { args }) => {
            let (draft, warnings) = draft_from_input(parse_args(&args), today());
            print_warnings(&warnings);
            let created = service.create(draft)?;
            println!("{}", added_line(created.as_ref()));
            if let Some(task) = &created {
                print_details(task);
            }
        }
        Some(Commands::Edit { id, args }) => {
            let Some(task) = find_task(&service, &id) else {
                println!("Error: No single task matches id '{}'.", id);
                return Ok(());
            };
            let mut fields = TaskUpdate::from(&task);
            let warnings = apply_input(&mut fields, parse_args(&args), today());
            print_warnings(&warnings);
            if service.update(&task.id, fields)? {
                if let Some(updated) = service.get(&task.id) {
                    println!("Task updated: {} (ID: {})", updated.title, updated.id.short());
                    print_details(updated);
                }
            } else {
                println!("Nothing changed.");
            }
        }
        Some(Commands::Toggle { id }) => {
            let Some(task) = find_task(&service, &id) else {
                println!("Error: No single task matches id '{}'.", id);
                return Ok(());
            };
            service.toggle_complete(&task.id)?;
            let state = if task.completed { "pending" } else { "completed" };
            println!("Task {}: {}", state, task.title);
        }
        Some(Commands::Delete { id }) => {
            let Some(task) = find_task(&service, &id) else {
                println!("Error: No single task matches id '{}'.", id);
                return Ok(());
            };
            service.delete(&task.id)?;
            println!("Task deleted: {}", task.title);
        }
        Some(Commands::List { filter, search }) => {
            let view = service.view(filter, &search);
            list::print_tasks(&view);
        }
        Some(Commands::Stats) => {
            let counts = service.view(FilterSelector::All, "").counts;
            list::print_counts(&counts);
        }
        Some(Commands::Theme { mode }) => {
            let theme = match mode {
                None => service.theme(),
                Some(ThemeMode::Toggle) => service.toggle_theme()?,
                Some(ThemeMode::Light) => {
                    service.set_theme(Theme::Light)?;
                    Theme::Light
                }
                Some(ThemeMode::Dark) => {
                    service.set_theme(Theme::Dark)?;
                    Theme::Dark
                }
            };
            println!("Theme: {}", if theme.is_dark() { "dark" } else { "light" });
        }
        Some(Commands::Tui) | None => {
            tui::run(service)?;
        }
    }
    Ok(())
}

/// Logs go to stderr, or to a file while the TUI owns the terminal.
/// `RUST_LOG` overrides the default `warn` level.
fn init_logging(config: &Config, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    if interactive && !config.ephemeral {
        std::fs::create_dir_all(&config.data_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_file())?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|e| anyhow!("failed to initialize logging: {}", e))
    } else if interactive {
        // no file to write to, and stderr belongs to the TUI
        Ok(())
    } else {
        builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!("failed to initialize logging: {}", e))
    }
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

fn find_task(service: &Service, id: &str) -> Option<Task> {
    service.find(id).cloned()
}

// Blank titles are ignored, not an error.
fn added_line(created: Option<&Task>) -> String {
    match created {
        Some(task) => format!("Task added: {} (ID: {})", task.title, task.id.short()),
        None => "Nothing added: title is blank.".to_string(),
    }
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("Warning: {}", warning);
    }
}

fn print_details(task: &Task) {
    if let Some(d) = task.due_date {
        println!("  Due: {}", d);
    }
    println!("  Priority: {}", task.priority);
    println!("  Category: {}", task.category);
    if !task.description.is_empty() {
        println!("  Description: {}", task.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::{MemoryKeyValueStore, TaskDraft};

    fn service() -> Service {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryKeyValueStore::new());
        TaskService::open(store)
    }

    #[test]
    fn blank_add_is_reported_neutrally() {
        let mut service = service();
        let created = service.create(TaskDraft::new("  ")).unwrap();
        assert_eq!(added_line(created.as_ref()), "Nothing added: title is blank.");
        assert!(service.tasks().is_empty());
    }

    #[test]
    fn added_line_names_the_task() {
        let mut service = service();
        let task = service.create(TaskDraft::new("Buy milk")).unwrap().unwrap();
        let line = added_line(Some(&task));
        assert!(line.starts_with("Task added: Buy milk (ID: "));
        assert!(line.contains(&task.id.short()));
    }
}
