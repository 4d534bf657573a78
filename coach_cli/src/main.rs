use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use coach_core::plan::{self, weekday_index, DAY_NAMES};
use coach_core::weight::{self, trend_of};
use coach_core::*;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;
use tokio::sync::mpsc::{self, UnboundedSender};

#[derive(Parser)]
#[command(name = "fitcoach")]
#[command(about = "Personal fitness coach: guided workouts, streaks and weight tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this RFC 3339 instant as the current time
    #[arg(long, global = true, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show streak and visit count (default)
    Checkin,

    /// Import or inspect the generated plan
    Plan {
        #[command(subcommand)]
        action: PlanCommand,
    },

    /// Run a guided workout for a plan day
    Session {
        /// Plan day (0 = Monday); defaults to today
        #[arg(long)]
        day: Option<usize>,
    },

    /// Log and review body weight
    Weight {
        #[command(subcommand)]
        action: WeightCommand,
    },

    /// Clear the plan and profile (weight history and streaks are kept)
    Reset,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Adopt a plan produced by the plan generator
    Import {
        /// Generated plan JSON
        plan: PathBuf,

        /// Profile JSON the plan was generated for
        #[arg(long)]
        profile: PathBuf,
    },

    /// Show the workout and meals for a day
    Show {
        /// Plan day (0 = Monday); defaults to today
        #[arg(long)]
        day: Option<usize>,
    },
}

#[derive(Subcommand)]
enum WeightCommand {
    /// Log a weight in kilograms (replaces any entry for the same date)
    Add {
        kg: f64,

        /// Date of the measurement; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show recent entries and the overall trend
    Show {
        /// Number of entries to show
        #[arg(long)]
        last: Option<usize>,
    },

    /// Write the full history as CSV
    Export { path: PathBuf },
}

fn parse_instant(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    coach_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let now = cli.now.unwrap_or_else(Utc::now);
    tracing::debug!("Using data directory {:?}", data_dir);

    let mut store = JsonFileStore::new(&data_dir);

    // Every launch is a visit
    let stats = VisitTracker::new(&mut store, config.calendar.zone).record_visit(now)?;

    let ctx = Context {
        config: &config,
        now,
    };

    match cli.command {
        None | Some(Commands::Checkin) => cmd_checkin(&stats, &ctx),
        Some(Commands::Plan { action }) => match action {
            PlanCommand::Import { plan, profile } => {
                cmd_plan_import(&mut store, &plan, &profile)
            }
            PlanCommand::Show { day } => cmd_plan_show(&store, day, &ctx),
        },
        Some(Commands::Session { day }) => cmd_session(&store, day, &ctx),
        Some(Commands::Weight { action }) => match action {
            WeightCommand::Add { kg, date } => cmd_weight_add(&mut store, kg, date, &ctx),
            WeightCommand::Show { last } => cmd_weight_show(&mut store, last, &ctx),
            WeightCommand::Export { path } => cmd_weight_export(&mut store, &path),
        },
        Some(Commands::Reset) => cmd_reset(&mut store),
    }
}

/// What every command needs besides the store
struct Context<'a> {
    config: &'a Config,
    now: DateTime<Utc>,
}

impl Context<'_> {
    fn today(&self) -> NaiveDate {
        self.config.calendar.zone.date_of(self.now)
    }

    fn display_instant(&self, instant: DateTime<Utc>) -> String {
        const FORMAT: &str = "%a, %b %-d %H:%M";
        match self.config.calendar.zone {
            CalendarZone::Utc => format!("{} UTC", instant.format(FORMAT)),
            CalendarZone::Local => instant.with_timezone(&Local).format(FORMAT).to_string(),
        }
    }
}

fn cmd_checkin(stats: &VisitStats, ctx: &Context) -> Result<()> {
    let title = if stats.total_visits <= 1 {
        "Welcome"
    } else {
        "Welcome back"
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", title);
    println!("╰─────────────────────────────────────────╯");
    if let Some(checked_in) = stats.last_visit_timestamp {
        println!("  Checked in:   {}", ctx.display_instant(checked_in));
    }
    println!("  Day streak:   {}", stats.streak);
    println!("  Total visits: {}", stats.total_visits);
    println!();
    Ok(())
}

fn cmd_plan_import(store: &mut JsonFileStore, plan_path: &Path, profile_path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(profile_path)?;
    let profile: UserProfile = serde_json::from_str(&contents).map_err(|e| {
        Error::InvalidInput(format!("{:?} is not a valid profile: {}", profile_path, e))
    })?;

    let plan = adopt_plan(store, &ImportedPlan::new(plan_path), &profile)?;

    println!("✓ Plan adopted");
    println!("  {}", plan.summary);
    println!(
        "  {} workout days, {} diet days",
        plan.workout_plan.len(),
        plan.diet_plan.len()
    );
    Ok(())
}

fn cmd_plan_show(store: &JsonFileStore, day: Option<usize>, ctx: &Context) -> Result<()> {
    let Some(plan) = load_plan(store)? else {
        println!("No plan yet. Import one with `fitcoach plan import`.");
        return Ok(());
    };

    let index = day.unwrap_or_else(|| weekday_index(ctx.today()));
    let weekday = DAY_NAMES[index % DAY_NAMES.len()];

    println!("\n{}", plan.summary);

    match plan.workout_day(index) {
        Some(workout) => {
            println!("\n── Workout · {} ({}) ──", workout.day_name, weekday);
            println!("  Focus: {}", workout.focus);
            if workout.rest_day {
                println!("  Rest day. Recover and stretch.");
            } else {
                for (i, exercise) in workout.exercises.iter().enumerate() {
                    println!(
                        "  {}. {}: {} sets × {} reps",
                        i + 1,
                        exercise.name,
                        exercise.sets,
                        exercise.reps
                    );
                    if !exercise.notes.is_empty() {
                        println!("     {}", exercise.notes);
                    }
                }
            }
        }
        None => println!("\n  The plan has no workout days."),
    }

    match plan.diet_day(index) {
        Some(diet) => {
            println!("\n── Meals · {} ──", diet.day_name);
            for (label, meal) in diet.meals.iter() {
                println!("  {:<10} {} ({:.0} kcal)", label, meal.name, meal.calories);
            }
            println!("  Total: {:.0} kcal", diet.total_calories);
        }
        None => println!("\n  The plan has no diet days."),
    }

    if !plan.tips.is_empty() {
        println!("\n── Tips ──");
        for tip in &plan.tips {
            println!("  • {}", tip);
        }
    }
    println!();
    Ok(())
}

/// Forward stdin lines into the session loop; the channel closes at EOF
fn spawn_input_reader(sender: UnboundedSender<String>) -> Result<()> {
    thread::Builder::new()
        .name("session-input".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if sender.send(line).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

fn cmd_session(store: &JsonFileStore, day: Option<usize>, ctx: &Context) -> Result<()> {
    let Some(plan) = load_plan(store)? else {
        println!("No plan yet. Import one with `fitcoach plan import`.");
        return Ok(());
    };

    let index = day.unwrap_or_else(|| weekday_index(ctx.today()));
    let Some(workout) = plan.workout_day(index) else {
        println!("The plan has no workout days.");
        return Ok(());
    };

    if workout.scheduled_exercises().is_empty() {
        println!("{} is a rest day. Nothing to run.", workout.day_name);
        return Ok(());
    }

    let controller = SessionController::for_day(workout)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run_session(workout, controller, ctx))
}

async fn run_session(
    workout: &WorkoutDay,
    controller: SessionController,
    ctx: &Context<'_>,
) -> Result<()> {
    let (input_sender, mut input) = mpsc::unbounded_channel();
    spawn_input_reader(input_sender)?;

    let (tick_sender, mut ticks) = mpsc::unbounded_channel();
    let ticker = IntervalTicker::new(ctx.config.session.tick_interval(), tick_sender, ());
    let mut guided = GuidedSession::begin(controller, ticker)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} · {}", workout.day_name, workout.focus);
    println!("╰─────────────────────────────────────────╯");
    println!("  Enter = next   p = pause/resume   t = timer   q = quit");
    render(guided.controller());

    loop {
        tokio::select! {
            Some(()) = ticks.recv() => guided.on_tick(),
            line = input.recv() => {
                let Some(line) = line else {
                    guided.abort();
                    println!("\nSession ended. Progress was not saved.");
                    return Ok(());
                };
                match line.trim().to_lowercase().as_str() {
                    "" | "n" => {
                        if guided.advance() == Phase::Completed {
                            break;
                        }
                        render(guided.controller());
                    }
                    "p" => {
                        if guided.toggle_pause() {
                            println!("  ⏸ Paused");
                        } else {
                            println!("  ▶ Resumed");
                        }
                    }
                    "t" => print_timer(guided.controller()),
                    "q" => {
                        guided.abort();
                        println!("\nSession ended. Progress was not saved.");
                        return Ok(());
                    }
                    other => println!("  Unknown command '{}'", other),
                }
            }
        }
    }

    if let Some(summary) = guided.controller().summary() {
        println!("\n✓ Workout Complete!");
        println!("  Great job crushing {}.", summary.label);
        println!("  Exercises: {}", summary.exercise_count);
        println!("  Total active time: {}", format_clock(summary.active_seconds));
    }
    Ok(())
}

fn render(session: &SessionController) {
    match session.phase() {
        Phase::Active => {
            if let (Some(exercise), Some(position)) =
                (session.current_exercise(), session.position_label())
            {
                println!("\n  {}", position);
                println!("  → {}: {} sets × {} reps", exercise.name, exercise.sets, exercise.reps);
                if !exercise.notes.is_empty() {
                    println!("    {}", exercise.notes);
                }
                println!("  [Enter] Finish set & rest");
            }
        }
        Phase::Resting => {
            println!("\n  Rest & recover");
            match session.upcoming_exercise() {
                Some(next) => println!("  Up next: {}  [Enter] Start next set", next.name),
                None => println!("  Last rest.  [Enter] Finish workout"),
            }
        }
        Phase::Completed => {}
    }
}

fn print_timer(session: &SessionController) {
    let label = match session.phase() {
        Phase::Resting => "Rest",
        _ => "Active",
    };
    let state = if session.is_paused() { " (paused)" } else { "" };
    println!(
        "  {} {}{}",
        label,
        format_clock(session.displayed_seconds()),
        state
    );
}

fn cmd_weight_add(
    store: &mut JsonFileStore,
    kg: f64,
    date: Option<NaiveDate>,
    ctx: &Context,
) -> Result<()> {
    let date = date.unwrap_or_else(|| ctx.today());
    let entries = WeightLedger::new(store).add_entry(kg, date)?;

    println!("✓ Logged {:.1} kg for {}", kg, date);
    if entries.len() > 1 {
        if let Some(trend) = trend_of(&entries) {
            println!("  {} since {}", format::format_weight_change(trend.change), entries[0].date);
        }
    }
    Ok(())
}

fn cmd_weight_show(store: &mut JsonFileStore, last: Option<usize>, ctx: &Context) -> Result<()> {
    let ledger = WeightLedger::new(store);
    let window = ledger.window(last.unwrap_or(ctx.config.progress.trend_window))?;

    if window.is_empty() {
        println!("No weight entries yet. Log one with `fitcoach weight add <kg>`.");
        return Ok(());
    }

    for entry in &window {
        println!("  {}  {:>6.1} kg", entry.date, entry.weight);
    }

    let entries = ledger.entries()?;
    if let Some(trend) = trend_of(&entries) {
        println!("\n  Current weight: {:.1} kg", trend.current);
        if entries.len() > 1 {
            println!("  {}", format::format_weight_change(trend.change));
        }
    }
    Ok(())
}

fn cmd_weight_export(store: &mut JsonFileStore, path: &Path) -> Result<()> {
    let entries = WeightLedger::new(store).entries()?;
    let written = weight::export_csv(&entries, path)?;
    println!("✓ Exported {} entries to {}", written, path.display());
    Ok(())
}

fn cmd_reset(store: &mut JsonFileStore) -> Result<()> {
    plan::reset(store)?;
    println!("✓ Plan and profile cleared. Weight history and streaks were kept.");
    Ok(())
}
