mod app;
mod checklist;
mod config;
mod digest;
mod error;
mod filter;
mod generator;
mod models;
mod scoring;
mod status;
mod store;
mod timers;
mod tui;

use anyhow::{anyhow, Context, Result};
use app::App;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::Config;
use digest::{DigestOutcome, DigestSnapshot};
use filter::{FilterChange, SortKey, Visible};
use models::{split_list, Experience, Job, Preferences, Source, WorkMode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use status::JobStatus;
use std::time::Instant;
use store::Database;
use timers::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Job notification tracker - match, filter, save and digest job postings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new synthetic job dataset
    Generate {
        /// Seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,

        /// Number of jobs to generate (defaults to JOBTRACK_JOB_COUNT or 60)
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// List jobs on the dashboard
    List {
        /// Search title or company
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Exact location (e.g. Bangalore, Remote)
        #[arg(short, long)]
        location: Option<String>,

        /// Work mode (onsite, hybrid, remote)
        #[arg(short, long)]
        mode: Option<WorkMode>,

        /// Source (linkedin, naukri, indeed, instahyre, hirist)
        #[arg(long)]
        source: Option<Source>,

        /// Application status (not-applied, applied, rejected, selected)
        #[arg(long)]
        status: Option<JobStatus>,

        /// Sort order (latest, match, salary)
        #[arg(long, default_value = "latest")]
        sort: SortKey,

        /// Only show jobs at or above the minimum match score
        #[arg(long)]
        matches: bool,
    },

    /// Show job details
    Show {
        /// Job ID (e.g. job-12)
        id: String,
    },

    /// Toggle a saved bookmark
    Save {
        /// Job ID
        id: String,
    },

    /// List saved jobs
    Saved,

    /// Set the application status of a job
    Status {
        /// Job ID
        id: String,

        /// New status (not-applied, applied, rejected, selected)
        status: JobStatus,
    },

    /// Show recent status updates
    Updates,

    /// Manage matching preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },

    /// Generate or show the daily digest
    Digest {
        /// Digest date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Print the plain-text email body instead of a table
        #[arg(long)]
        text: bool,
    },

    /// Manage the pre-ship test checklist
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommands,
    },

    /// Check whether the project is ready to ship
    Ship,

    /// Browse jobs interactively
    Browse,

    /// Remove all stored state
    Reset,
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Show current preferences
    Show,

    /// Update preferences (unspecified fields keep their value)
    Set {
        /// Comma separated role keywords
        #[arg(short, long)]
        keywords: Option<String>,

        /// Comma separated preferred locations
        #[arg(short, long)]
        locations: Option<String>,

        /// Comma separated work modes
        #[arg(short, long)]
        modes: Option<String>,

        /// Experience tier (Fresher, "0-1 Years", "1-3 Years"); empty for any
        #[arg(short, long)]
        experience: Option<String>,

        /// Comma separated skills
        #[arg(short, long)]
        skills: Option<String>,

        /// Minimum match score for the match-only filter (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_score: Option<u8>,
    },

    /// Reset preferences to defaults
    Clear,
}

#[derive(Subcommand)]
enum ChecklistCommands {
    /// Show checklist progress
    Show,

    /// Mark a step as passed (1-10)
    Check { step: usize },

    /// Mark a step as not passed (1-10)
    Uncheck { step: usize },

    /// Clear every step
    Reset,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = Config::from_env();
    let db = Database::open(&config.database_path)?;
    tracing::debug!(path = %db.path().display(), "opened database");

    let now = Instant::now();
    let today = Local::now().date_naive();
    let mut app = App::load(&db).with_digest_size(config.digest_size);

    if needs_dataset(&cli.command) {
        app.ensure_jobs(&mut rand::thread_rng(), config.job_count, now);
    }

    match cli.command {
        Commands::Generate { seed, count } => {
            let count = count.unwrap_or(config.job_count);
            match seed {
                Some(seed) => app.regenerate(&mut StdRng::seed_from_u64(seed), count, now),
                None => app.regenerate(&mut rand::thread_rng(), count, now),
            }
            println!("Generated {} jobs.", app.jobs().len());
        }

        Commands::List {
            search,
            location,
            mode,
            source,
            status,
            sort,
            matches,
        } => {
            if let Some(search) = search {
                app.update_filter(FilterChange::Search(search), now);
            }
            app.update_filter(FilterChange::Location(location), now);
            app.update_filter(FilterChange::Mode(mode), now);
            app.update_filter(FilterChange::Source(source), now);
            app.update_filter(FilterChange::Status(status), now);
            app.update_filter(FilterChange::Sort(sort), now);
            app.update_filter(FilterChange::MatchOnly(matches), now);
            app.flush_filter();

            if !app.has_preferences() {
                println!("Set your preferences to activate intelligent matching (jobtrack prefs set).\n");
            }
            match app.visible() {
                Visible::NoJobs => println!("No jobs available. Run 'jobtrack generate'."),
                Visible::NoMatches { total } => {
                    println!("No jobs match your search (0 of {}). Adjust your filters.", total)
                }
                Visible::Jobs(jobs) => print_jobs(&app, &jobs),
            }
        }

        Commands::Show { id } => match app.job(&id) {
            Some(job) => print_job(&app, job),
            None => println!("Job '{}' not found.", id),
        },

        Commands::Save { id } => match app.toggle_save(&id, now) {
            Some(true) => println!("Saved '{}'.", id),
            Some(false) => println!("Removed '{}' from saved jobs.", id),
            None => println!("Job '{}' not found.", id),
        },

        Commands::Saved => {
            let jobs = app.saved_jobs();
            if jobs.is_empty() {
                println!("No saved jobs yet.");
            } else {
                print_jobs(&app, &jobs);
            }
        }

        Commands::Status { id, status } => {
            if app.set_status(&id, status, today, now) {
                println!("Marked '{}' as {}.", id, status);
            } else {
                println!("Job '{}' not found.", id);
            }
        }

        Commands::Updates => {
            let updates = app.recent_updates();
            if updates.is_empty() {
                println!("No status updates yet.");
            } else {
                println!("{:<10} {:<8} {:<28} {:<18} {:<12}", "DATE", "ID", "TITLE", "COMPANY", "STATUS");
                println!("{}", "-".repeat(80));
                for (job, record) in updates {
                    println!(
                        "{:<10} {:<8} {:<28} {:<18} {:<12}",
                        record.date,
                        job.id,
                        truncate(&job.title, 26),
                        truncate(&job.company, 16),
                        record.status
                    );
                }
            }
        }

        Commands::Prefs { command } => match command {
            PrefsCommands::Show => print_preferences(app.preferences()),

            PrefsCommands::Set {
                keywords,
                locations,
                modes,
                experience,
                skills,
                min_score,
            } => {
                let mut prefs = app.preferences().clone();
                if let Some(keywords) = keywords {
                    prefs.role_keywords = split_list(&keywords);
                }
                if let Some(locations) = locations {
                    prefs.preferred_locations = split_list(&locations);
                }
                if let Some(modes) = modes {
                    prefs.preferred_mode = split_list(&modes)
                        .iter()
                        .map(|m| m.parse::<WorkMode>().map(|m| m.to_string()))
                        .collect::<Result<Vec<_>, _>>()?;
                }
                if let Some(experience) = experience {
                    let experience = experience.trim().to_string();
                    if !experience.is_empty()
                        && !Experience::ALL.iter().any(|e| e.as_str() == experience)
                    {
                        return Err(anyhow!(
                            "Unknown experience level '{}'. Expected Fresher, 0-1 Years or 1-3 Years",
                            experience
                        ));
                    }
                    prefs.experience_level = experience;
                }
                if let Some(skills) = skills {
                    prefs.skills = split_list(&skills);
                }
                if let Some(min_score) = min_score {
                    prefs.min_match_score = min_score;
                }
                app.save_preferences(prefs, now);
                print_preferences(app.preferences());
            }

            PrefsCommands::Clear => {
                app.save_preferences(Preferences::default(), now);
                println!("Preferences reset to defaults.");
            }
        },

        Commands::Digest { date, text } => {
            let date = date.unwrap_or(today);
            let outcome = app.generate_digest(date, now);
            match outcome.snapshot() {
                Some(snapshot) => {
                    let fresh = matches!(outcome, DigestOutcome::Generated(_));
                    print_digest(snapshot, text, fresh);
                }
                None => {
                    println!("Set preferences to generate a personalized digest (jobtrack prefs set).");
                }
            }
        }

        Commands::Checklist { command } => match command {
            ChecklistCommands::Show => print_checklist(&app),
            ChecklistCommands::Check { step } => {
                set_step(&mut app, step, true, now)?;
                print_checklist(&app);
            }
            ChecklistCommands::Uncheck { step } => {
                set_step(&mut app, step, false, now)?;
                print_checklist(&app);
            }
            ChecklistCommands::Reset => {
                app.reset_checklist(now);
                print_checklist(&app);
            }
        },

        Commands::Ship => {
            let checklist = app.checklist();
            if checklist.ready_to_ship() {
                println!("All {} tests passed. Ready to ship.", checklist::ITEMS.len());
            } else {
                println!(
                    "Locked: complete all tests before shipping ({} / {} passed).",
                    checklist.passed_count(),
                    checklist::ITEMS.len()
                );
            }
        }

        Commands::Browse => {
            tui::run_browse(&mut app, today).context("Terminal browser failed")?;
        }

        Commands::Reset => {
            let removed = db.clear()?;
            println!("Removed {} stored value(s) from {}", removed, db.path().display());
        }
    }

    for toast in app.notifications.drain() {
        if toast.level == Level::Error {
            eprintln!("warning: {}", toast.message);
        }
    }

    Ok(())
}

fn set_step(app: &mut App, step: usize, passed: bool, now: Instant) -> Result<()> {
    let index = step
        .checked_sub(1)
        .filter(|i| *i < checklist::ITEMS.len())
        .ok_or_else(|| anyhow!("Step must be between 1 and {}", checklist::ITEMS.len()))?;
    app.set_check(index, passed, now);
    Ok(())
}

fn print_jobs(app: &App, jobs: &[&Job]) {
    println!(
        "{:<8} {:<5} {:<26} {:<16} {:<10} {:<7} {:<10} {:>5} {:<12}",
        "ID", "SAVED", "TITLE", "COMPANY", "LOCATION", "MODE", "SALARY", "MATCH", "STATUS"
    );
    println!("{}", "-".repeat(106));
    for job in jobs {
        println!(
            "{:<8} {:<5} {:<26} {:<16} {:<10} {:<7} {:<10} {:>5} {:<12}",
            job.id,
            if app.is_saved(&job.id) { "*" } else { "" },
            truncate(&job.title, 24),
            truncate(&job.company, 14),
            truncate(&job.location, 10),
            job.mode,
            truncate(&job.salary_range, 10),
            job.match_score,
            app.status_of(&job.id)
        );
    }
    println!("\n{} job(s)", jobs.len());
}

fn print_job(app: &App, job: &Job) {
    println!("{} ({})", job.title, job.id);
    println!("Company: {}", job.company);
    println!("Location: {} ({})", job.location, job.mode);
    println!("Experience: {}", job.experience);
    println!("Salary: {}", job.salary_range);
    println!("Skills: {}", job.skills.join(", "));
    println!("Source: {}", job.source);
    println!("Posted: {}", posted_label(job.posted_days_ago));
    println!("Match: {}%", job.match_score);
    match app.status_record(&job.id) {
        Some(record) => println!("Status: {} (since {})", record.status, record.date),
        None => println!("Status: {}", JobStatus::NotApplied),
    }
    if app.is_saved(&job.id) {
        println!("Saved: yes");
    }
    println!("Apply: {}", job.apply_url);
    println!("\n{}", textwrap::fill(&job.description, 80));
}

fn print_preferences(prefs: &Preferences) {
    let list = |items: &[String]| {
        if items.is_empty() {
            "(any)".to_string()
        } else {
            items.join(", ")
        }
    };
    println!("Role keywords:  {}", list(&prefs.role_keywords));
    println!("Locations:      {}", list(&prefs.preferred_locations));
    println!("Work modes:     {}", list(&prefs.preferred_mode));
    println!(
        "Experience:     {}",
        if prefs.experience_level.is_empty() { "(any)" } else { prefs.experience_level.as_str() }
    );
    println!("Skills:         {}", list(&prefs.skills));
    println!("Min match:      {}", prefs.min_match_score);
}

/// Commands that work on postings get a dataset generated on first use.
fn needs_dataset(command: &Commands) -> bool {
    !matches!(command, Commands::Generate { .. } | Commands::Reset)
}

fn digest_heading(snapshot: &DigestSnapshot, generated: bool) -> String {
    if generated {
        format!("Generated digest for {}.", snapshot.date)
    } else {
        format!("Digest already generated for {}.", snapshot.date)
    }
}

fn print_digest(snapshot: &DigestSnapshot, text: bool, generated: bool) {
    if text {
        print!("{}", snapshot.to_plain_text());
        return;
    }
    println!("{}", digest_heading(snapshot, generated));
    if snapshot.jobs.is_empty() {
        println!("No matching roles today.");
        return;
    }
    println!("{:<4} {:<8} {:<26} {:<16} {:<10} {:>5}", "#", "ID", "TITLE", "COMPANY", "LOCATION", "MATCH");
    println!("{}", "-".repeat(74));
    for (i, job) in snapshot.jobs.iter().enumerate() {
        println!(
            "{:<4} {:<8} {:<26} {:<16} {:<10} {:>5}",
            i + 1,
            job.id,
            truncate(&job.title, 24),
            truncate(&job.company, 14),
            truncate(&job.location, 10),
            job.match_score
        );
    }
}

fn print_checklist(app: &App) {
    let checklist = app.checklist();
    println!(
        "Tests passed: {} / {}",
        checklist.passed_count(),
        checklist::ITEMS.len()
    );
    for (i, (label, passed)) in checklist.items().enumerate() {
        println!("  [{}] {:>2}. {}", if passed { "x" } else { " " }, i + 1, label);
    }
    if !checklist.ready_to_ship() {
        println!("\nResolve all issues before shipping.");
    }
}

fn posted_label(days: u8) -> String {
    match days {
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Zoho", 10), "Zoho");
        assert_eq!(truncate("Graduate Engineer Trainee", 10), "Graduat...");
    }

    #[test]
    fn test_posted_label() {
        assert_eq!(posted_label(0), "Today");
        assert_eq!(posted_label(1), "1 day ago");
        assert_eq!(posted_label(7), "7 days ago");
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "jobtrack", "list", "--mode", "remote", "--source", "LinkedIn", "--sort", "match", "--status",
            "applied", "--matches",
        ])
        .unwrap();
        match cli.command {
            Commands::List { mode, source, sort, status, matches, .. } => {
                assert_eq!(mode, Some(WorkMode::Remote));
                assert_eq!(source, Some(Source::LinkedIn));
                assert_eq!(sort, SortKey::Match);
                assert_eq!(status, Some(JobStatus::Applied));
                assert!(matches);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_digest_heading_names_the_requested_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let snapshot = DigestSnapshot { date, jobs: Vec::new() };
        assert_eq!(digest_heading(&snapshot, false), "Digest already generated for 2026-10-12.");
        assert_eq!(digest_heading(&snapshot, true), "Generated digest for 2026-10-12.");
    }

    #[test]
    fn test_reset_and_generate_skip_dataset_bootstrap() {
        let reset = Cli::try_parse_from(["jobtrack", "reset"]).unwrap();
        assert!(!needs_dataset(&reset.command));
        let generate = Cli::try_parse_from(["jobtrack", "generate", "--seed", "3"]).unwrap();
        assert!(!needs_dataset(&generate.command));
        let list = Cli::try_parse_from(["jobtrack", "list"]).unwrap();
        assert!(needs_dataset(&list.command));
    }

    #[test]
    fn test_cli_rejects_bad_threshold() {
        assert!(Cli::try_parse_from(["jobtrack", "prefs", "set", "--min-score", "120"]).is_err());
    }

    #[test]
    fn test_set_step_is_one_based() {
        let store = store::MemoryStore::new();
        let mut app = App::load(&store);
        let now = Instant::now();
        set_step(&mut app, 1, true, now).unwrap();
        assert!(app.checklist().is_passed(0));
        assert!(set_step(&mut app, 0, true, now).is_err());
        assert!(set_step(&mut app, 11, true, now).is_err());
    }
}
