use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use daytrack::{MetricsBundle, NewTask, TaskQuery, TaskRecord, Tracker, Window};

#[derive(Parser)]
#[command(name = "daytrack", about = "Personal productivity tracker CLI")]
struct Cli {
    /// Database path (default: ~/.daytrack/daytrack.db)
    #[arg(long)]
    db: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new task for a day
    Add {
        /// What the task is (e.g. "Deep work", "Leg day")
        activity: String,
        /// Category label (Work, Study, Gym, Personal, ...)
        #[arg(long, default_value = "")]
        category: String,
        /// Planned minutes
        #[arg(long, default_value_t = 0)]
        planned: u32,
        /// Task day (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Priority: high, medium, low
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a task completed with its actual minutes
    Done {
        /// Task id (from `list`)
        id: String,
        /// Actual minutes spent
        #[arg(long, default_value_t = 0)]
        actual: u32,
    },
    /// Delete a task
    Delete {
        /// Task id (from `list`)
        id: String,
    },
    /// List logged tasks
    List {
        /// Window: today, 7d, 30d, all
        #[arg(long, default_value = "7d")]
        window: String,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Completed tasks only
        #[arg(long)]
        completed: bool,
        /// Incomplete tasks only
        #[arg(long)]
        incomplete: bool,
        /// Maximum results
        #[arg(long, default_value = "50")]
        limit: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's totals, score, goal progress, and streak
    Dashboard {
        /// Reference day (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Daily goal in minutes (default: configured goal_minutes or 360)
        #[arg(long)]
        goal: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weekly/monthly trends and the category breakdown
    Analytics {
        /// Reference day (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate AI insights from the aggregated metrics
    Insight {
        /// Reference day (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import tasks from a JSON export file
    Import {
        /// Path to a JSON array of task records
        file: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show store status
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values
    List,
}

fn parse_date(date: Option<&str>) -> anyhow::Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD)")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let db = match &cli.db {
        Some(path) => daytrack::Database::open_at(path).await?,
        None => daytrack::Database::open().await?,
    };
    let tracker = Tracker::new(db);

    match cli.command {
        Commands::Add {
            activity,
            category,
            planned,
            date,
            priority,
            notes,
        } => {
            let task = tracker
                .add_task(NewTask {
                    activity,
                    task_date: parse_date(date.as_deref())?,
                    planned_minutes: planned,
                    category,
                    priority: priority.parse()?,
                    notes,
                })
                .await?;
            println!("Added {} ({}, {})", task.id, task.activity, task.task_date);
        }
        Commands::Done { id, actual } => {
            tracker.complete_task(&id, actual).await?;
            println!("Completed {id} ({actual} min)");
        }
        Commands::Delete { id } => {
            tracker.delete_task(&id).await?;
            println!("Deleted {id}");
        }
        Commands::List {
            window,
            category,
            completed,
            incomplete,
            limit,
            json,
        } => {
            handle_list(&tracker, &window, category.as_deref(), completed, incomplete, limit, json)
                .await?;
        }
        Commands::Dashboard { date, goal, json } => {
            let today = parse_date(date.as_deref())?;
            let bundle = tracker.metrics(Window::All, today, goal).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print_dashboard(&bundle, today);
            }
        }
        Commands::Analytics { date, json } => {
            let today = parse_date(date.as_deref())?;
            let bundle = tracker.metrics(Window::All, today, None).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print_analytics(&bundle);
            }
        }
        Commands::Insight { date, json } => {
            let today = parse_date(date.as_deref())?;
            let text = match tracker.insight(today).await {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("insight generation failed: {e}");
                    daytrack::llm::insight::FALLBACK_MESSAGE.to_string()
                }
            };
            if json {
                println!("{}", serde_json::json!({ "insight": text }));
            } else {
                println!("{text}");
            }
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let records: Vec<TaskRecord> = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("cannot parse {file}: {e}"))?;
            let report = tracker.import_records(records).await?;
            println!(
                "Imported {} records ({} rejected)",
                report.imported, report.rejected
            );
        }
        Commands::Config { action } => {
            handle_config(&tracker, action).await?;
        }
        Commands::Status => {
            let stats = tracker
                .db()
                .reader()
                .call(|conn| daytrack::storage::repository::store_stats(conn))
                .await?;
            println!("Store Status");
            println!("  Tasks:      {}", stats.tasks);
            println!("  Completed:  {}", stats.completed);
            println!("  Categories: {}", stats.categories);
            println!(
                "  Span:       {} .. {}",
                stats.first_date.as_deref().unwrap_or("-"),
                stats.last_date.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

async fn handle_list(
    tracker: &Tracker,
    window: &str,
    category: Option<&str>,
    completed: bool,
    incomplete: bool,
    limit: u32,
    json: bool,
) -> anyhow::Result<()> {
    let window = Window::parse(window)?;
    let today = chrono::Local::now().date_naive();

    let mut query = TaskQuery::new().limit(limit);
    if let Some((start, end)) = window.bounds(today) {
        query = query.date_after(&start).date_before(&end);
    }
    if let Some(cat) = category {
        query = query.category(cat);
    }
    if completed {
        query = query.completed(true);
    } else if incomplete {
        query = query.completed(false);
    }

    let tasks = tracker.list_tasks(query).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("No tasks in window '{window}'.");
        return Ok(());
    }
    for task in &tasks {
        let mark = if task.is_completed { "x" } else { " " };
        let category = daytrack::record::normalize_category(&task.category);
        println!(
            "[{mark}] {}  {}  {} ({category}, planned {} min, actual {} min, {})",
            task.task_date, task.id, task.activity, task.planned_minutes, task.actual_minutes,
            task.priority
        );
    }
    Ok(())
}

fn print_dashboard(bundle: &MetricsBundle, today: NaiveDate) {
    println!("Dashboard for {today}");
    println!(
        "  Planned today:  {} min",
        bundle.daily_totals.planned_minutes
    );
    println!(
        "  Actual today:   {} min",
        bundle.daily_totals.actual_minutes
    );
    println!("  Score:          {}%", bundle.productivity_score);
    println!("  Goal progress:  {}%", bundle.goal_progress_percent);
    println!("  Streak:         {} days", bundle.streak_days);
    println!("  Weekly average: {:.1} h/day", bundle.weekly_average_hours);

    if !bundle.recent_entries.is_empty() {
        println!("\nRecent entries:");
        for task in &bundle.recent_entries {
            let mark = if task.is_completed { "x" } else { " " };
            println!(
                "  [{mark}] {}  {} ({} min)",
                task.task_date, task.activity, task.actual_minutes
            );
        }
    }
}

fn print_analytics(bundle: &MetricsBundle) {
    println!("Weekly productivity (%):");
    for point in &bundle.weekly_series {
        println!("  {}  {:>4}", point.date, point.productivity);
    }

    if !bundle.monthly_series.is_empty() {
        println!("\nMonthly productivity (%):");
        for point in &bundle.monthly_series {
            println!("  {}  {:>4}", point.month, point.productivity);
        }
    }

    if !bundle.category_distribution.is_empty() {
        println!("\nActual minutes by category:");
        for (name, minutes) in &bundle.category_distribution {
            println!("  {name:<12} {minutes:>6}");
        }
    }
}

async fn handle_config(tracker: &Tracker, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            match tracker.config_get(&key).await? {
                Some(v) => println!("{key} = {v}"),
                None => println!("{key} is not set"),
            }
        }
        ConfigAction::Set { key, value } => {
            tracker.config_set(&key, &value).await?;
            println!("Config updated.");
        }
        ConfigAction::List => {
            let items = tracker.config_list().await?;
            if items.is_empty() {
                println!("No configuration set.");
            } else {
                for (k, v) in items {
                    println!("{k} = {v}");
                }
            }
        }
    }
    Ok(())
}
