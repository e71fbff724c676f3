use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use fitplan_core::timer::parse_rest_seconds_or;
use fitplan_core::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fitplan")]
#[command(about = "Personal workout plan tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Exercise alternatives JSON (overrides config)
    #[arg(long, global = true)]
    alternatives_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new plan from a profile (replaces the current plan)
    Generate {
        /// Profile JSON file
        #[arg(long)]
        profile: PathBuf,

        /// Pre-generated curriculum JSON (overrides config)
        #[arg(long)]
        plan_file: Option<PathBuf>,

        /// Language passed to the provider
        #[arg(long)]
        language: Option<String>,
    },

    /// Show the plan with completion marks (default)
    Show {
        /// Only show one week (0-based)
        #[arg(long)]
        week: Option<usize>,
    },

    /// Toggle a day, e.g. w0-d1
    ToggleDay { day: String },

    /// Toggle one exercise, e.g. w0-d1-ex2
    ToggleExercise {
        exercise: String,

        /// Mark the day complete if this was its last open exercise
        #[arg(long)]
        commit: bool,
    },

    /// Mark a day complete after all its exercises are done
    CommitDay { day: String },

    /// Reorder an exercise within a day
    Move { day: String, from: usize, to: usize },

    /// List alternatives for an exercise
    Alternatives { exercise: String },

    /// Replace an exercise with one of its alternatives
    Swap {
        exercise: String,

        /// 1-based index into the alternatives list
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },

    /// Record a body-weight sample
    Weigh {
        weight: f64,

        /// Sample date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show body-weight history
    Progress,

    /// Record a workout session
    Log {
        /// Plan day this session belongs to
        #[arg(long)]
        day: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "")]
        focus: String,

        /// Minutes
        #[arg(long, default_value_t = 0)]
        duration: u32,

        #[arg(long)]
        calories: Option<u32>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        /// Activity screenshot used to prefill the entry
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Show workout history, newest first
    Logs,

    /// Run the rest timer for an exercise or a rest spec
    Rest {
        /// Exercise id whose rest value is used
        exercise: Option<String>,

        /// Free-text rest such as "90s" or "2 min"
        #[arg(long, conflicts_with = "exercise")]
        spec: Option<String>,

        /// Tick interval override (for testing)
        #[arg(long, hide = true)]
        tick_millis: Option<u64>,
    },

    /// Export progress and logs as CSV
    Export {
        /// Output directory (defaults to the data directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Discard the current plan, profile and completion
    Reset,
}

fn main() -> Result<()> {
    // Initialize logging
    fitplan_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(path) = cli.alternatives_file {
        config.plan.alternatives_file = Some(path);
    }
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let mut app = FitnessApp::load(Persistence::new(FileStore::new(data_dir.join("state"))));
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Generate {
            profile,
            plan_file,
            language,
        }) => cmd_generate(&mut app, &config, &profile, plan_file, language, today),
        Some(Commands::Show { week }) => cmd_show(&app, week),
        None => cmd_show(&app, None),
        Some(Commands::ToggleDay { day }) => {
            let day: DayId = day.parse()?;
            let complete = app.toggle_day(day)?;
            println!(
                "✓ {} marked {}",
                day,
                if complete { "complete" } else { "incomplete" }
            );
            Ok(())
        }
        Some(Commands::ToggleExercise { exercise, commit }) => {
            cmd_toggle_exercise(&mut app, exercise.parse()?, commit)
        }
        Some(Commands::CommitDay { day }) => {
            let day: DayId = day.parse()?;
            app.commit_day(day)?;
            println!("✓ {} marked complete", day);
            Ok(())
        }
        Some(Commands::Move { day, from, to }) => {
            let day: DayId = day.parse()?;
            app.move_exercise(day.week, day.day, from, to)?;
            println!("✓ Moved exercise {} -> {} in {}", from, to, day);
            Ok(())
        }
        Some(Commands::Alternatives { exercise }) => {
            let provider = file_provider(&config, None);
            let alternatives =
                app.suggest_alternatives(&provider, exercise.parse()?, &config.plan.language)?;
            for (i, alt) in alternatives.iter().enumerate() {
                println!("  {}. {} ({} x {}, rest {})", i + 1, alt.name, alt.sets, alt.reps, alt.rest);
            }
            Ok(())
        }
        Some(Commands::Swap { exercise, pick }) => {
            cmd_swap(&mut app, &config, exercise.parse()?, pick)
        }
        Some(Commands::Weigh { weight, date }) => {
            app.add_progress(ProgressEntry {
                date: date.unwrap_or(today),
                weight,
            });
            println!("✓ Recorded {:.1} kg", weight);
            Ok(())
        }
        Some(Commands::Progress) => cmd_progress(&app),
        Some(Commands::Log {
            day,
            name,
            focus,
            duration,
            calories,
            notes,
            date,
            image,
        }) => {
            let day_id = day.map(|d| d.parse::<DayId>()).transpose()?;
            let draft = LogDraft {
                date,
                day_id,
                day_name: name.unwrap_or_else(|| "Workout".into()),
                focus,
                duration,
                notes,
                image_url: None,
                calories,
            };
            cmd_log(&mut app, &config, draft, image.as_deref(), today)
        }
        Some(Commands::Logs) => cmd_logs(&app),
        Some(Commands::Rest {
            exercise,
            spec,
            tick_millis,
        }) => cmd_rest(&app, &config, exercise, spec, tick_millis),
        Some(Commands::Export { out }) => {
            let dir = out.unwrap_or(data_dir);
            let summary = export::export_all(app.progress(), app.logs(), &dir)?;
            println!(
                "✓ Exported {} progress entries and {} logs",
                summary.progress_rows, summary.log_rows
            );
            println!("  {}", summary.progress_path.display());
            println!("  {}", summary.logs_path.display());
            Ok(())
        }
        Some(Commands::Reset) => {
            app.reset();
            println!("✓ Plan reset");
            Ok(())
        }
    }
}

fn file_provider(config: &Config, plan_file: Option<PathBuf>) -> JsonFileProvider {
    JsonFileProvider::new(
        plan_file.or_else(|| config.plan.plan_file.clone()),
        config.plan.alternatives_file.clone(),
    )
}

fn cmd_generate(
    app: &mut FitnessApp<FileStore>,
    config: &Config,
    profile_path: &Path,
    plan_file: Option<PathBuf>,
    language: Option<String>,
    today: NaiveDate,
) -> Result<()> {
    let profile = UserProfile::load(profile_path)?;
    let provider = file_provider(config, plan_file);
    let language = language.unwrap_or_else(|| config.plan.language.clone());

    let plan = match app.generate_plan(&provider, profile, &language, today) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Could not generate a plan. Your current plan is unchanged.");
            return Err(e);
        }
    };

    println!("✓ Generated '{}' ({} weeks)", plan.program_name, plan.weeks.len());
    Ok(())
}

fn cmd_show(app: &FitnessApp<FileStore>, week: Option<usize>) -> Result<()> {
    let Some(plan) = app.plan() else {
        println!("No plan yet. Run `fitplan generate --profile <file>` to create one.");
        return Ok(());
    };
    let completion = app.completion();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", plan.program_name);
    println!("╰─────────────────────────────────────────╯");
    println!("  {}", plan.description);
    println!(
        "  Overall: {:.0}% of workout days complete",
        completion.overall_progress(plan) * 100.0
    );

    for (w, weekly) in plan.weeks.iter().enumerate() {
        if week.is_some_and(|only| only != w) {
            continue;
        }
        let (done, total) = completion.week_progress(plan, w);
        println!();
        println!("  Week {} · {} ({}/{})", weekly.week_number, weekly.focus, done, total);

        for (d, day) in weekly.schedule.iter().enumerate() {
            let id = DayId::new(w, d);
            if day.is_rest_day() {
                println!("    [{}] {} · {}", id, day.day_name, day.focus);
                continue;
            }
            let mark = if completion.is_day_complete(id) { "✓" } else { " " };
            let (ex_done, ex_total) = completion.day_progress(plan, id);
            println!(
                "    [{}] {} {} · {} · {} ({}/{})",
                id, mark, day.day_name, day.focus, day.estimated_duration, ex_done, ex_total
            );
            for (i, exercise) in day.exercises.iter().enumerate() {
                let ex_id = id.exercise(i);
                let mark = if completion.is_exercise_complete(ex_id) { "✓" } else { "·" };
                println!(
                    "        {} {} {} x {} (rest {})",
                    mark, exercise.name, exercise.sets, exercise.reps, exercise.rest
                );
            }
        }
    }

    if week.is_none() && !plan.nutrition_tips.is_empty() {
        println!();
        println!("  Nutrition tips:");
        for tip in &plan.nutrition_tips {
            println!("    - {}", tip);
        }
    }
    println!();
    Ok(())
}

fn cmd_toggle_exercise(
    app: &mut FitnessApp<FileStore>,
    exercise: ExerciseId,
    commit: bool,
) -> Result<()> {
    let outcome = app.toggle_exercise(exercise)?;
    let state = if app.completion().is_exercise_complete(exercise) {
        "done"
    } else {
        "not done"
    };
    println!("✓ {} marked {}", exercise, state);

    if let ExerciseToggle::DayEligibleForCompletion(day) = outcome {
        if commit {
            app.commit_day(day)?;
            println!("✓ All exercises finished, {} marked complete", day);
        } else {
            println!("  All exercises of {} are done.", day);
            println!("  Run `fitplan commit-day {}` to mark the day complete.", day);
        }
    }
    Ok(())
}

fn cmd_swap(
    app: &mut FitnessApp<FileStore>,
    config: &Config,
    exercise: ExerciseId,
    pick: usize,
) -> Result<()> {
    let provider = file_provider(config, None);
    let alternatives = app.suggest_alternatives(&provider, exercise, &config.plan.language)?;
    let replacement = pick
        .checked_sub(1)
        .and_then(|i| alternatives.get(i))
        .cloned()
        .ok_or_else(|| {
            Error::Other(format!(
                "pick {} is out of range (1-{})",
                pick,
                alternatives.len()
            ))
        })?;

    let name = replacement.name.clone();
    app.swap_exercise(exercise, replacement)?;
    println!("✓ {} is now {}", exercise, name);
    Ok(())
}

fn cmd_progress(app: &FitnessApp<FileStore>) -> Result<()> {
    let ledger = app.progress();
    if ledger.is_empty() {
        println!("No weight entries yet.");
        return Ok(());
    }
    for entry in ledger.entries() {
        println!("  {}  {:.1} kg", entry.date, entry.weight);
    }
    if let Some(change) = ledger.net_change() {
        println!("  Change: {:+.1} kg", change);
    }
    Ok(())
}

fn cmd_log(
    app: &mut FitnessApp<FileStore>,
    config: &Config,
    draft: LogDraft,
    image: Option<&Path>,
    today: NaiveDate,
) -> Result<()> {
    let draft = match image {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            let provider = file_provider(config, None);
            FitnessApp::<FileStore>::prefill_from_image(&provider, &bytes, &config.plan.language, draft)
        }
        None => draft,
    };

    let id = app.log_workout(draft, today);
    println!("✓ Session logged ({})", id);
    Ok(())
}

fn cmd_logs(app: &FitnessApp<FileStore>) -> Result<()> {
    let logs = app.logs();
    if logs.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }
    for log in logs.entries() {
        let calories = log
            .calories
            .map(|c| format!(", {} kcal", c))
            .unwrap_or_default();
        println!(
            "  {}  {} · {} · {} min{}",
            log.date, log.day_name, log.focus, log.duration, calories
        );
    }
    println!(
        "  Total: {} sessions, {} min",
        logs.len(),
        logs.total_minutes()
    );
    Ok(())
}

fn cmd_rest(
    app: &FitnessApp<FileStore>,
    config: &Config,
    exercise: Option<String>,
    spec: Option<String>,
    tick_millis: Option<u64>,
) -> Result<()> {
    let (rest_spec, label) = match (exercise, spec) {
        (Some(id), _) => {
            let id: ExerciseId = id.parse()?;
            let plan = app
                .plan()
                .ok_or_else(|| Error::State("no workout plan; run generate first".into()))?;
            let exercise = plan
                .exercise(id)
                .ok_or_else(|| Error::InvalidId(format!("{} is not in the plan", id)))?;
            (exercise.rest.clone(), exercise.name.clone())
        }
        (None, Some(spec)) => (spec, "Rest".to_string()),
        (None, None) => (String::new(), "Rest".to_string()),
    };

    let tick_millis = tick_millis.unwrap_or(config.timer.tick_millis);
    if tick_millis == 0 {
        return Err(Error::Config("tick interval must be positive".into()));
    }
    let period = Duration::from_millis(tick_millis);
    let mut driver = TimerDriver::with_period(period, config.timer.default_rest_seconds);
    let seconds = parse_rest_seconds_or(&rest_spec, config.timer.default_rest_seconds);
    println!("Resting {}s after {}", seconds, label);

    driver.start(&rest_spec, label);
    while matches!(driver.state(), TimerState::Running { .. }) {
        // Timeouts and stale ticks leave the countdown where it was
        if !driver.wait_tick(period * 2) {
            continue;
        }
        if let TimerState::Running { remaining, .. } = driver.state() {
            println!("  {}s", remaining);
        }
    }
    if let TimerState::Expired { label } = driver.state() {
        println!("✓ Rest over, back to {}", label);
    }
    Ok(())
}
