mod cmd_config;
mod cmd_project;
mod cmd_report;
mod cmd_score;
mod cmd_stats;
mod cmd_trends;
mod settings;
mod workspace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use workspace::Workspace;

#[derive(Parser)]
#[command(
    name = "nightshift",
    version,
    about = "Metrics, narratives and scores from a project's session log"
)]
struct Cli {
    /// Session log to read (overrides config and NIGHTSHIFT_LOG)
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Totals and a per-session summary table
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Diff two sessions: metrics, deltas and task sets
    Compare {
        /// First session number
        a: u32,
        /// Second session number
        b: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Vertical timeline of every session
    Timeline {
        /// Tasks shown per session
        #[arg(long, default_value = "3")]
        max_tasks: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-session velocity with sliding-window averages
    Velocity {
        /// Sliding window size in sessions
        #[arg(long, default_value = "3")]
        window: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Peaks, bursts, growth runs and consistency
    Streaks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Milestones, productivity trends, recurring themes and anomalies
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Quality score for one session
    Score {
        /// Session number
        session: u32,
        /// Features delivered (overrides the module delta)
        #[arg(long)]
        features: Option<u32>,
        /// Tests added (overrides the test delta)
        #[arg(long)]
        tests: Option<u32>,
        /// CLI commands added
        #[arg(long)]
        cli: Option<u32>,
        /// API endpoints added
        #[arg(long)]
        api: Option<u32>,
        /// Health score change
        #[arg(long, allow_hyphen_values = true)]
        health_delta: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Health score history and trend
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sparkline for one tracked counter
    Sparkline {
        /// Counter name or alias (modules, tests, prs, commands, endpoints, health, dead-code)
        counter: String,
        /// Plot per-session changes instead of the running value
        #[arg(long)]
        deltas: bool,
        /// Keep only the last N sessions
        #[arg(long)]
        width: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Maturity score, stage and project age
    Maturity {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// The log told as themed chapters
    Story {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Retrospective: what went well, what to watch
    Reflect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// shields.io badges for a README
    Badges {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Facts from git history
    Git {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the full Markdown report and its JSON sidecar
    Report {
        /// Output directory (default: config report_dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print written paths as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage workspace config
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;

    // ── Config (no log needed) ──
    if let Command::Config { cmd } = &cli.cmd {
        return match cmd {
            cmd_config::ConfigCmd::Set { key, value } => cmd_config::set(&repo_root, key, value),
            cmd_config::ConfigCmd::Get { key } => cmd_config::get(&repo_root, key),
            cmd_config::ConfigCmd::List => cmd_config::list(&repo_root),
        };
    }

    let ws = Workspace::open(&repo_root, cli.log.as_deref())?;

    match cli.cmd {
        // ── Log summaries ──
        Command::Stats { json } => cmd_stats::stats(&ws, json),
        Command::Compare { a, b, json } => cmd_stats::compare(&ws, a, b, json),
        Command::Timeline { max_tasks, json } => cmd_stats::timeline(&ws, max_tasks, json),

        // ── Trends ──
        Command::Velocity { window, json } => cmd_trends::velocity(&ws, window, json),
        Command::Streaks { json } => cmd_trends::streaks(&ws, json),
        Command::Insights { json } => cmd_trends::insights(&ws, json),
        Command::Health { json } => cmd_trends::health(&ws, json),
        Command::Sparkline {
            counter,
            deltas,
            width,
            json,
        } => cmd_trends::sparkline(&ws, &counter, deltas, width, json),

        // ── Scoring ──
        Command::Score {
            session,
            features,
            tests,
            cli,
            api,
            health_delta,
            json,
        } => cmd_score::execute(
            &ws,
            session,
            cmd_score::InputOverrides {
                features,
                tests,
                cli_commands: cli,
                api_endpoints: api,
                health_delta,
            },
            json,
        ),

        // ── Project views ──
        Command::Maturity { json } => cmd_project::maturity(&ws, json),
        Command::Story { json } => cmd_project::story(&ws, json),
        Command::Badges { json } => cmd_project::badges(&ws, json),
        Command::Git { json } => cmd_project::git(&ws, json),

        // ── Reports ──
        Command::Reflect { json } => cmd_report::reflect(&ws, json),
        Command::Report { out, json } => cmd_report::report(&ws, out.as_deref(), json),

        Command::Config { .. } => unreachable!("handled before the log is loaded"),
    }
}
