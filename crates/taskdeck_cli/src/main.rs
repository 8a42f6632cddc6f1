//! Command-line shell over `taskdeck_core`.
//!
//! # Responsibility
//! - Map subcommands onto task controller and viewer calls.
//! - Render collections and pages as plain text.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskdeck_core::db::open_db;
use taskdeck_core::{
    init_from_config, AppConfig, HttpPostSource, RemoteListViewer, SqliteStorage, StorageProvider,
    Task, TaskFilter, TaskId, TaskService,
};

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Local task list and post browser")]
struct Cli {
    /// Path to a TOML config file (defaults to ./taskdeck.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task; blank text is ignored.
    Add { text: String },
    /// Flip a task between active and completed.
    Toggle { id: TaskId },
    /// Remove a task.
    Delete { id: TaskId },
    /// Show tasks matching a filter.
    List {
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },
    /// Fetch remote posts, then search and page through them.
    Posts {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print core health and version.
    Ping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_from_config(&config)
        .map_err(|err| anyhow!(err))
        .context("failed to initialize logging")?;

    match cli.command {
        Command::Add { text } => with_tasks(&config, |service| {
            let before = service.total_count();
            service.add_task(&text);
            if service.total_count() == before {
                println!("Nothing to add.");
            }
            print_tasks(service, TaskFilter::All);
        }),
        Command::Toggle { id } => with_tasks(&config, |service| {
            service.toggle_task(id);
            print_tasks(service, TaskFilter::All);
        }),
        Command::Delete { id } => with_tasks(&config, |service| {
            service.delete_task(id);
            print_tasks(service, TaskFilter::All);
        }),
        Command::List { filter } => with_tasks(&config, |service| print_tasks(service, filter)),
        Command::Posts { query, page } => browse_posts(&config, query, page),
        Command::Ping => {
            println!("taskdeck_core ping={}", taskdeck_core::ping());
            println!("taskdeck_core version={}", taskdeck_core::core_version());
            Ok(())
        }
    }
}

fn with_tasks(
    config: &AppConfig,
    f: impl FnOnce(&mut TaskService<SqliteStorage<'_>>),
) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let mut service = TaskService::open(SqliteStorage::new(&conn));
    f(&mut service);
    Ok(())
}

fn print_tasks<S: StorageProvider>(service: &TaskService<S>, filter: TaskFilter) {
    let captions = TaskFilter::ALL
        .iter()
        .map(|candidate| {
            let label = service.filter_label(*candidate);
            if *candidate == filter {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect::<Vec<_>>();
    println!("{}", captions.join("  "));

    let visible = service.filtered_view(filter);
    if visible.is_empty() {
        println!("No tasks found. Add a task to get started!");
    } else {
        for task in visible {
            println!("{}", task_line(task));
        }
    }

    if service.total_count() > 0 {
        println!("{}", service.remaining_label());
    }
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {:>13}  {}", task.id, task.text)
}

fn browse_posts(config: &AppConfig, query: Option<String>, page: usize) -> Result<()> {
    let source = HttpPostSource::new(config.posts_url.clone())
        .context("failed to build HTTP client")?;
    let mut viewer = RemoteListViewer::new();
    println!("Loading posts from {} ...", source.url());
    viewer.load(&source);

    if let Some(message) = viewer.error() {
        println!("Error loading data: {message}");
        println!("Run the command again to retry.");
        return Err(anyhow!("post fetch failed: {message}"));
    }

    if let Some(query) = query {
        viewer.set_query(query);
    }
    viewer.go_to_page(page);

    println!("{}", viewer.summary_label());
    let items = viewer.page_items();
    if items.is_empty() {
        println!("No posts found matching your search.");
        return Ok(());
    }
    for item in items {
        println!("#{:<4} {}", item.id, item.title);
        println!("      {}", item.body.replace('\n', " "));
    }
    if viewer.total_pages() > 1 {
        println!("{}", viewer.page_label());
    }
    Ok(())
}
