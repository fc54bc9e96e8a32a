use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use planner_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Personal task planner with repeating tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this YYYYMMDD date as today
    #[arg(long, global = true, value_parser = parse_day)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the next date of a repeat rule
    NextDate {
        /// Anchor date (YYYYMMDD), defaults to today
        #[arg(long, value_parser = parse_day)]
        now: Option<NaiveDate>,

        /// Current task date (YYYYMMDD)
        #[arg(long)]
        date: String,

        /// Repeat rule, e.g. "d 7", "y", "w 1,3", "m -1 2,8"
        #[arg(long)]
        repeat: String,
    },

    /// Add a task
    Add(TaskArgs),

    /// List tasks by date (default)
    List {
        /// Filter by DD.MM.YYYY date or by text in title/comment
        #[arg(long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single task
    Show {
        id: u64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Replace a task's fields
    Edit {
        id: u64,

        #[command(flatten)]
        task: TaskArgs,
    },

    /// Mark a task done: repeating tasks move to their next date, others are removed
    Done { id: u64 },

    /// Delete a task
    Delete { id: u64 },

    /// Export all tasks to CSV
    Export {
        /// Output file (default: <data-dir>/tasks.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct TaskArgs {
    /// Task title
    #[arg(long)]
    title: String,

    /// Due date (YYYYMMDD or "today"), defaults to today
    #[arg(long, default_value = "")]
    date: String,

    /// Free-form comment
    #[arg(long, default_value = "")]
    comment: String,

    /// Repeat rule; leave empty for a one-shot task
    #[arg(long, default_value = "")]
    repeat: String,
}

impl From<TaskArgs> for TaskRequest {
    fn from(args: TaskArgs) -> Self {
        TaskRequest {
            date: args.date,
            title: args.title,
            comment: args.comment,
            repeat: args.repeat,
        }
    }
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn main() {
    // Initialize logging
    planner_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = planner_core::config::store_path(&data_dir);
    let today = cli.today.unwrap_or_else(planner_core::date::today);
    tracing::debug!("Using data dir {:?}, today {}", data_dir, format_date(today));

    match cli.command {
        Some(Commands::NextDate { now, date, repeat }) => {
            cmd_next_date(now.unwrap_or(today), &date, &repeat)
        }
        Some(Commands::Add(args)) => cmd_add(&store_path, args.into(), today),
        Some(Commands::List { search, json }) => {
            cmd_list(&store_path, search.as_deref(), json, &config)
        }
        Some(Commands::Show { id, json }) => cmd_show(&store_path, id, json),
        Some(Commands::Edit { id, task }) => cmd_edit(&store_path, id, task.into(), today),
        Some(Commands::Done { id }) => cmd_done(&store_path, id, today),
        Some(Commands::Delete { id }) => cmd_delete(&store_path, id),
        Some(Commands::Export { output }) => {
            let output = output.unwrap_or_else(|| data_dir.join("tasks.csv"));
            cmd_export(&store_path, &output)
        }
        None => {
            // Default to "list" command
            cmd_list(&store_path, None, false, &config)
        }
    }
}

fn cmd_next_date(now: NaiveDate, date: &str, repeat: &str) -> Result<()> {
    let next = next_date(now, date, repeat)?;
    println!("{}", next);
    Ok(())
}

fn cmd_add(store_path: &Path, request: TaskRequest, today: NaiveDate) -> Result<()> {
    let id = TaskStore::update(store_path, |store| add_task(store, request, today))?;
    println!("✓ Added task {}", id);
    Ok(())
}

fn cmd_list(store_path: &Path, search: Option<&str>, json: bool, config: &Config) -> Result<()> {
    let store = TaskStore::load(store_path)?;
    let tasks = store.list(search, config.tasks.list_limit);

    if json {
        let tasks: Vec<_> = tasks.into_iter().map(task_json).collect();
        println!("{}", serde_json::json!({ "tasks": tasks }));
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for task in tasks {
        display_task_line(task);
    }
    Ok(())
}

fn cmd_show(store_path: &Path, id: u64, json: bool) -> Result<()> {
    let store = TaskStore::load(store_path)?;
    let task = store.get(id).ok_or(Error::TaskNotFound(id))?;

    if json {
        println!("{}", task_json(task));
        return Ok(());
    }

    println!("  #{} {}", task.id, task.title);
    println!("  Date:    {}", task.date);
    if task.is_recurring() {
        println!("  Repeat:  {}", task.repeat);
    }
    if !task.comment.is_empty() {
        println!("  Comment: {}", task.comment);
    }
    Ok(())
}

fn cmd_edit(store_path: &Path, id: u64, request: TaskRequest, today: NaiveDate) -> Result<()> {
    TaskStore::update(store_path, |store| update_task(store, id, request, today))?;
    println!("✓ Updated task {}", id);
    Ok(())
}

fn cmd_done(store_path: &Path, id: u64, today: NaiveDate) -> Result<()> {
    match TaskStore::update(store_path, |store| complete_task(store, id, today))? {
        Completion::Deleted => println!("✓ Task {} done and removed", id),
        Completion::Rescheduled(next) => println!("✓ Task {} done, next on {}", id, next),
    }
    Ok(())
}

fn cmd_delete(store_path: &Path, id: u64) -> Result<()> {
    let task = TaskStore::update(store_path, |store| store.remove(id))?;
    println!("✓ Deleted task {} ({})", task.id, task.title);
    Ok(())
}

fn cmd_export(store_path: &Path, output: &Path) -> Result<()> {
    let store = TaskStore::load(store_path)?;
    let count = export_csv(store.list(None, usize::MAX), output)?;

    println!("✓ Exported {} tasks", count);
    println!("  CSV: {}", output.display());
    Ok(())
}

fn display_task_line(task: &Task) {
    let mut line = format!("{:>4}  {}  {}", task.id, task.date, task.title);
    if task.is_recurring() {
        line.push_str(&format!("  [{}]", task.repeat));
    }
    if !task.comment.is_empty() {
        line.push_str(&format!("  - {}", task.comment));
    }
    println!("{}", line);
}

/// JSON shape used by the web front end: ids are strings
fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id.to_string(),
        "date": task.date,
        "title": task.title,
        "comment": task.comment,
        "repeat": task.repeat,
    })
}
