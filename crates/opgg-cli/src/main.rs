//! OP.GG CLI - command-line front end for the opgg-core library.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use opgg_core::{
    CacheType, GameType, HistoryRequest, LangCode, Opgg, OpggBuilder, OpggConfig, Region,
    StopReason, ValidationWarning,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "opgg")]
#[command(about = "Query OP.GG player data and League of Legends metadata")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Language for localized data (en_US, ko_KR, ja_JP, zh_CN, ...)
    #[arg(long, global = true, default_value = "en_US")]
    lang: String,

    /// Cache database path (defaults to the platform cache directory)
    #[arg(long, global = true, env = "OPGG_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Give up on the whole command after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for a player by Riot ID (name#tag)
    Search {
        riot_id: String,
        /// Limit the search to one region
        #[arg(short, long)]
        region: Option<Region>,
    },
    /// Show a player's profile
    Profile {
        summoner_id: String,
        #[arg(short, long)]
        region: Region,
    },
    /// Show a player's recent games
    Games {
        summoner_id: String,
        #[arg(short, long)]
        region: Region,
        #[arg(long, default_value = "total")]
        game_type: GameType,
        #[arg(long, default_value_t = 20)]
        page_size: usize,
        /// Stop after this many games
        #[arg(long)]
        max: Option<usize>,
    },
    /// Show the match a player is currently in
    Live {
        summoner_id: String,
        #[arg(short, long)]
        region: Region,
    },
    /// List champions, or look one up by name or id
    Champions {
        #[arg(long, conflicts_with = "id")]
        name: Option<String>,
        #[arg(long)]
        id: Option<i64>,
        /// Ignore the cache
        #[arg(long)]
        refresh: bool,
    },
    /// List game versions
    Versions {
        #[arg(long)]
        refresh: bool,
    },
    /// List ranked seasons
    Seasons {
        #[arg(long)]
        refresh: bool,
    },
    /// List champion keywords
    Keywords {
        #[arg(long)]
        refresh: bool,
    },
    /// Inspect or maintain the metadata cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Row counts, languages and timestamps per table
    Stats,
    /// Delete cached rows
    Clear {
        #[arg(long = "type", default_value = "all")]
        cache_type: CacheType,
        /// Only this language (default: every language)
        #[arg(long = "only-lang")]
        only_lang: Option<String>,
    },
    /// Re-fetch everything already cached
    Refresh,
}

fn init_logging(args: &Args) {
    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    if args.log_json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        warn!("{}", warning);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let mut config = OpggConfig::from_env().context("Invalid environment configuration")?;
    if let Some(path) = &args.db_path {
        config.db_path = path.clone();
    }

    let mut builder = OpggBuilder::with_config(config);
    if let Some(secs) = args.timeout {
        builder = builder.operation_timeout(Duration::from_secs(secs));
    }
    let client = builder.build().context("Failed to initialize client")?;

    // Ctrl-C cancels whatever is in flight.
    let token = client.cancel_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling");
            token.cancel();
        }
    });

    let lang = LangCode::from(args.lang.as_str());
    run(&client, args.command, &lang).await
}

async fn run(client: &Opgg, command: Command, lang: &LangCode) -> Result<()> {
    match command {
        Command::Search { riot_id, region } => {
            let found = client.search(&riot_id, region, lang).await?;
            for failure in &found.failed_regions {
                warn!(region = %failure.region, error = %failure.error, "Region unavailable");
            }
            report_warnings(&found.warnings);
            print_json(&found.results)
        }
        Command::Profile {
            summoner_id,
            region,
        } => {
            let profile = client.get_summoner(&summoner_id, region, lang).await?;
            report_warnings(&profile.warnings);
            print_json(&profile.value)
        }
        Command::Games {
            summoner_id,
            region,
            game_type,
            page_size,
            max,
        } => {
            let mut request = HistoryRequest::new(summoner_id, region)
                .game_type(game_type)
                .lang(lang.clone())
                .page_size(page_size);
            if let Some(max) = max {
                request = request.max_games(max);
            }
            let history = client.get_recent_games(&request).await?;
            if let StopReason::PartialFailure { error } = &history.stop {
                warn!(pages = history.pages_fetched, error = %error, "History incomplete");
            }
            report_warnings(&history.warnings);
            print_json(&history.games)
        }
        Command::Live {
            summoner_id,
            region,
        } => match client.get_live_game(&summoner_id, region, lang).await? {
            Some(live) => print_json(&live.value),
            None => {
                info!(%summoner_id, "Not currently in a game");
                print_json(&serde_json::Value::Null)
            }
        },
        Command::Champions { name, id, refresh } => {
            let fetched = match (name, id) {
                (Some(name), _) => client.get_champions_by_name(&name, lang).await?,
                (None, Some(id)) => {
                    let one = client.get_champion_by_id(id, lang).await?;
                    report_warnings(&one.warnings);
                    return print_json(&one.value);
                }
                (None, None) => client.get_all_champions(lang, refresh).await?,
            };
            if let Some(error) = &fetched.cache_error {
                warn!(error = %error, "Results were not cached");
            }
            report_warnings(&fetched.warnings);
            print_json(&fetched.value)
        }
        Command::Versions { refresh } => {
            let fetched = client.get_versions(lang, refresh).await?;
            print_json(&fetched.value)
        }
        Command::Seasons { refresh } => {
            let fetched = client.get_seasons(lang, refresh).await?;
            report_warnings(&fetched.warnings);
            print_json(&fetched.value)
        }
        Command::Keywords { refresh } => {
            let fetched = client.get_keywords(lang, refresh).await?;
            report_warnings(&fetched.warnings);
            print_json(&fetched.value)
        }
        Command::Cache { action } => run_cache(client, action).await,
    }
}

async fn run_cache(client: &Opgg, action: CacheAction) -> Result<()> {
    match action {
        CacheAction::Stats => print_json(&client.cache_stats()?),
        CacheAction::Clear {
            cache_type,
            only_lang,
        } => {
            let lang = only_lang.map(LangCode::from);
            let deleted = client.clear_cache(cache_type, lang.as_ref())?;
            let summary: Vec<_> = deleted
                .iter()
                .map(|(table, rows)| serde_json::json!({ "table": table, "deleted": rows }))
                .collect();
            print_json(&summary)
        }
        CacheAction::Refresh => {
            let report = client.refresh_cache().await?;
            for (cache_type, lang, error) in &report.failed {
                warn!(
                    cache_type = cache_type.as_str(),
                    lang = %lang,
                    error = %error,
                    "Refresh failed"
                );
            }
            info!(refreshed = report.refreshed.len(), "Refresh finished");
            if !report.failed.is_empty() {
                bail!("{} cache refreshes failed", report.failed.len());
            }
            Ok(())
        }
    }
}
