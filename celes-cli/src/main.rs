//! celes CLI
//!
//! Command-line interface for aggregating game achievement progress
//! from local emulator data and the platform itself.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::Env;

use celes_core::{Platform, SourceTag};

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "celes")]
#[command(about = "Aggregate game achievement progress from local sources", long_about = None)]
struct Cli {
    /// Root path for the store and schema cache (defaults to the saved
    /// setting, then the platform data directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape all enabled sources, merge with the stored collection, and persist
    Scan {
        /// Sources to run, in order (e.g., steam,codex,goldberg,sse)
        #[arg(short, long, value_delimiter = ',')]
        sources: Option<Vec<SourceTag>>,

        /// Extra directories to probe for achievement data
        #[arg(long = "search-root")]
        search_roots: Vec<PathBuf>,

        /// Language for schema requests
        #[arg(short, long, default_value = "english")]
        lang: String,

        /// Break unlock-time ties toward the oldest timestamp
        #[arg(long)]
        prefer_oldest_unlock: bool,

        /// Steam account id for public-profile lookups
        #[arg(long)]
        steam_account: Option<String>,

        /// List games owned by the Steam account instead of installed ones
        #[arg(long)]
        owned: bool,

        /// Remember --root as the default for future runs
        #[arg(long)]
        save_root: bool,
    },

    /// List every game in the local store
    List {
        /// Language for schema requests
        #[arg(short, long, default_value = "english")]
        lang: String,
    },

    /// Show one stored game in detail
    Show {
        /// App id of the game
        app_id: String,

        /// Platform the game belongs to
        #[arg(short, long, default_value = "Steam")]
        platform: Platform,

        /// Language for schema requests
        #[arg(short, long, default_value = "english")]
        lang: String,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            sources,
            search_roots,
            lang,
            prefer_oldest_unlock,
            steam_account,
            owned,
            save_root,
        } => {
            commands::scan::run_scan(
                cli.root,
                sources,
                search_roots,
                lang,
                prefer_oldest_unlock,
                steam_account,
                owned,
                save_root,
            );
        }
        Commands::List { lang } => {
            commands::list::run_list(cli.root, &lang);
        }
        Commands::Show {
            app_id,
            platform,
            lang,
        } => {
            commands::show::run_show(cli.root, &app_id, platform, &lang);
        }
    }
}
