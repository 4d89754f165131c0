//! cinelog CLI - your movie collection in the terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;
mod prompt;

use cinelog_core::services::MovieFilter;
use commands::{add, delete, filter, generate, list, logs, menu, random, search, setup, stats, update, users};

/// cinelog - track and rate the movies you watch
#[derive(Parser)]
#[command(name = "cinelog", version, about, long_about = None)]
struct Cli {
    /// Defaults to the interactive menu
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Menu,

    /// List profiles or create one
    Users {
        #[command(subcommand)]
        command: Option<users::UsersCommands>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a user's movies
    List {
        /// Profile name
        #[arg(long, short)]
        user: String,
        /// Sort order
        #[arg(long, value_enum, default_value = "title")]
        sort: list::SortOrder,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a movie, looking up missing details on OMDb
    Add {
        /// Movie title
        title: String,
        /// Profile name
        #[arg(long, short)]
        user: String,
        /// Release year
        #[arg(long)]
        year: Option<i32>,
        /// Rating from 0 to 10
        #[arg(long)]
        rating: Option<f64>,
        /// Poster image URL
        #[arg(long)]
        poster: Option<String>,
        /// Skip the OMDb lookup
        #[arg(long)]
        no_lookup: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a movie by title
    Delete {
        /// Movie title (case-insensitive)
        title: String,
        /// Profile name
        #[arg(long, short)]
        user: String,
    },

    /// Change a movie's rating
    Update {
        /// Movie title (case-insensitive)
        title: String,
        /// New rating from 0 to 10
        rating: f64,
        /// Profile name
        #[arg(long, short)]
        user: String,
    },

    /// Show rating statistics
    Stats {
        /// Profile name
        #[arg(long, short)]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search titles (case-insensitive substring)
    Search {
        /// Part of a title
        query: String,
        /// Profile name
        #[arg(long, short)]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter movies by rating and year
    Filter {
        /// Profile name
        #[arg(long, short)]
        user: String,
        /// Minimum rating (inclusive)
        #[arg(long)]
        min_rating: Option<f64>,
        /// First year (inclusive)
        #[arg(long)]
        start_year: Option<i32>,
        /// Last year (inclusive)
        #[arg(long)]
        end_year: Option<i32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick a random movie
    Random {
        /// Profile name
        #[arg(long, short)]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a static HTML page of a user's movies
    Generate {
        /// Profile name
        #[arg(long, short)]
        user: String,
        /// Output file (defaults to {outputDir}/{user}.html)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save the OMDb API key to settings.json
    Setup {
        /// API key (prompted when omitted)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => menu::run(),
        Commands::Users { command, json } => users::run(command, json),
        Commands::List { user, sort, json } => list::run(&user, sort, json),
        Commands::Add { title, user, year, rating, poster, no_lookup, json } => {
            add::run(add::AddArgs { title, user, year, rating, poster, no_lookup, json })
        }
        Commands::Delete { title, user } => delete::run(&title, &user),
        Commands::Update { title, rating, user } => update::run(&title, rating, &user),
        Commands::Stats { user, json } => stats::run(&user, json),
        Commands::Search { query, user, json } => search::run(&query, &user, json),
        Commands::Filter { user, min_rating, start_year, end_year, json } => filter::run(
            &user,
            MovieFilter { min_rating, start_year, end_year },
            json,
        ),
        Commands::Random { user, json } => random::run(&user, json),
        Commands::Generate { user, output, json } => generate::run(&user, output, json),
        Commands::Setup { api_key } => setup::run(api_key),
        Commands::Logs { command } => logs::run(command),
    }
}
