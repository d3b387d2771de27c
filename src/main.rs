use clap::Parser;
use colored::*;
use eyre::{bail, Context, Result};
use log::info;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use taskdeck::bus::{BusEvent, EventBus, Topic};
use taskdeck::domain::{Board, Strategy, Task, TaskPatch};
use taskdeck::ranking::coerce_number;
use taskdeck::remote::{HttpConfig, HttpTaskApi, TaskApi};
use taskdeck::store::{NoticeSink, TaskStore};

mod cli;
mod config;

use cli::{Cli, Commands};
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskdeck")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taskdeck.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Notice sink that prints transient messages to stderr
struct TerminalNotices;

impl NoticeSink for TerminalNotices {
    fn push(&self, message: &str) {
        eprintln!("{} {}", "•".cyan(), message);
    }
}

fn format_due(task: &Task) -> String {
    task.due_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn print_task_line(task: &Task) {
    println!(
        "  {:>4}  {}  due {}  importance {}  effort {}h",
        task.id.to_string().bold(),
        task.title,
        format_due(task),
        coerce_number(&task.importance),
        coerce_number(&task.estimated_hours),
    );
}

fn print_board(board: &Board) {
    println!("{}", "Active".green().bold());
    if board.active.is_empty() {
        println!("  {}", "Nothing to show yet.".dimmed());
    }
    for task in &board.active {
        print_task_line(task);
    }
}

fn print_completed(tasks: &[Task]) {
    println!("{}", "Completed".dimmed().bold());
    if tasks.is_empty() {
        println!("  {}", "Completed tasks will appear here.".dimmed());
    }
    for task in tasks {
        print_task_line(task);
    }
}

fn print_suggestions(tasks: &[Task]) {
    println!("{}", "Suggestions".cyan().bold());
    if tasks.is_empty() {
        println!("  {}", "No suggestions right now.".dimmed());
    }
    for task in tasks {
        print_task_line(task);
    }
}

/// Build a store wired to the service, the bus, and the terminal notice sink
fn build_store(api: &Arc<HttpTaskApi>, bus: &Arc<EventBus>, strategy: Strategy) -> TaskStore {
    TaskStore::new(api.clone(), bus.clone())
        .with_strategy(strategy)
        .with_notices(Arc::new(TerminalNotices))
}

/// Default view: board and suggestions together, fetched concurrently
async fn run_overview(api: Arc<HttpTaskApi>, bus: Arc<EventBus>) -> Result<()> {
    let store = build_store(&api, &bus, Strategy::default());
    bus.subscribe(Topic::TasksUpdated, |event| {
        if let BusEvent::TasksUpdated(board) = event {
            print_board(board);
        }
        Ok(())
    });
    bus.subscribe(Topic::SuggestionsUpdated, |event| {
        if let BusEvent::SuggestionsUpdated(tasks) = event {
            print_suggestions(tasks);
        }
        Ok(())
    });

    store.init().await;
    Ok(())
}

async fn run_board(
    api: Arc<HttpTaskApi>,
    bus: Arc<EventBus>,
    strategy: Option<&str>,
    completed: bool,
) -> Result<()> {
    let strategy = strategy.map(Strategy::parse).unwrap_or_default();
    info!("Showing board under strategy {strategy}");

    let store = build_store(&api, &bus, strategy);
    bus.subscribe(Topic::TasksUpdated, |event| {
        if let BusEvent::TasksUpdated(board) = event {
            print_board(board);
        }
        Ok(())
    });

    store.refresh_tasks(false).await;

    if completed {
        let tasks = api.list_completed_tasks().await?;
        print_completed(&tasks);
    }
    Ok(())
}

async fn run_suggest(
    api: Arc<HttpTaskApi>,
    bus: Arc<EventBus>,
    strategy: Option<&str>,
    query: Option<&str>,
) -> Result<()> {
    let strategy = strategy.map(Strategy::parse).unwrap_or_default();
    info!("Fetching suggestions - strategy: {strategy}, query: {query:?}");

    let store = build_store(&api, &bus, strategy).with_search(query.unwrap_or_default());
    bus.subscribe(Topic::SuggestionsUpdated, |event| {
        if let BusEvent::SuggestionsUpdated(tasks) = event {
            print_suggestions(tasks);
        }
        Ok(())
    });

    store.refresh_suggestions().await;
    Ok(())
}

async fn run_import(api: Arc<HttpTaskApi>, bus: Arc<EventBus>, file: &PathBuf) -> Result<()> {
    let raw = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        fs::read_to_string(file)
            .with_context(|| format!("Failed to read batch file: {}", file.display()))?
    };

    let store = build_store(&api, &bus, Strategy::default());
    store.submit_batch(&raw).await?;
    println!("{} {} task(s) on the board", "Imported:".green(), store.tasks().len());
    Ok(())
}

async fn run_update(
    api: Arc<HttpTaskApi>,
    bus: Arc<EventBus>,
    id: i64,
    patch: TaskPatch,
) -> Result<()> {
    if patch.is_empty() {
        bail!("nothing to update: pass at least one field flag");
    }
    let store = build_store(&api, &bus, Strategy::default());
    store.update_task(id, &patch).await?;
    println!("{} task {}", "Updated:".green(), id);
    Ok(())
}

async fn run_complete(api: Arc<HttpTaskApi>, bus: Arc<EventBus>, id: i64) -> Result<()> {
    let store = build_store(&api, &bus, Strategy::default());
    store.refresh_tasks(false).await;
    let Some(task) = store.tasks().into_iter().find(|task| task.id == id) else {
        bail!("task {id} not found");
    };
    store.complete_task(&task).await?;
    Ok(())
}

async fn run_delete(api: Arc<HttpTaskApi>, bus: Arc<EventBus>, id: i64) -> Result<()> {
    let store = build_store(&api, &bus, Strategy::default());
    store.delete_task(id).await;
    Ok(())
}

async fn run_clear(api: Arc<HttpTaskApi>, bus: Arc<EventBus>, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete every task without --yes");
    }
    let store = build_store(&api, &bus, Strategy::default());
    store.delete_all().await;
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let api_root = cli
        .api_root
        .clone()
        .unwrap_or_else(|| config.api_root.clone());
    if config.debug {
        println!("{} {}", "Service root:".yellow(), api_root);
    }

    let api = Arc::new(HttpTaskApi::new(HttpConfig {
        root: api_root,
        timeout: config.timeout(),
    })?);
    let bus = Arc::new(EventBus::new());

    match &cli.command {
        None => run_overview(api, bus).await,
        Some(Commands::Board {
            strategy,
            completed,
        }) => run_board(api, bus, strategy.as_deref(), *completed).await,
        Some(Commands::Suggest { strategy, query }) => {
            run_suggest(api, bus, strategy.as_deref(), query.as_deref()).await
        }
        Some(Commands::Import { file }) => run_import(api, bus, file).await,
        Some(Commands::Update {
            id,
            title,
            description,
            due,
            hours,
            importance,
        }) => {
            let patch = TaskPatch {
                title: title.clone(),
                description: description.clone(),
                due_date: *due,
                estimated_hours: *hours,
                importance: *importance,
                completed: None,
            };
            run_update(api, bus, *id, patch).await
        }
        Some(Commands::Complete { id }) => run_complete(api, bus, *id).await,
        Some(Commands::Delete { id }) => run_delete(api, bus, *id).await,
        Some(Commands::Clear { yes }) => run_clear(api, bus, *yes).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
