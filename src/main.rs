use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use king_league::api::{build_router, state::AppState};
use king_league::config::AppConfig;
use king_league::models::{
    MatchFormat, MatchPhase, MatchRecord, Player, PlayerId, PlayoffStatus, SeasonId, SetScore,
};
use king_league::storage::{LeagueStore, NewMatch, StorageConfig};

#[derive(Parser)]
#[command(name = "king-league")]
#[command(about = "Table tennis club league: standings and playoffs")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and the default season
    Init,

    /// Register a player
    AddPlayer {
        name: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// List players
    Players,

    /// Record a match (sets may be omitted to schedule it)
    AddMatch {
        /// Player 1 (name or id)
        player1: String,

        /// Player 2 (name or id)
        player2: String,

        /// Match date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Match time (HH:MM)
        #[arg(long, default_value = "19:00")]
        time: String,

        /// "best-of-3" or "best-of-5"
        #[arg(long, default_value = "best-of-3")]
        format: String,

        /// "championship", "semifinal" or "final"
        #[arg(long, default_value = "championship")]
        phase: String,

        /// Set scores, player 1 first (e.g. "11-5,7-11,11-9")
        #[arg(long, default_value = "")]
        sets: String,
    },

    /// Replace the set scores of a match
    UpdateScores {
        id: String,

        /// Set scores, player 1 first (e.g. "11-5,7-11,11-9")
        #[arg(long)]
        sets: String,
    },

    /// Cancel a match
    CancelMatch { id: String },

    /// List recent matches
    Matches {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the standings table
    Standings {
        /// Season id (default: active season)
        #[arg(long)]
        season: Option<String>,
    },

    /// Show the playoff bracket
    Playoffs {
        /// Season id (default: active season)
        #[arg(long)]
        season: Option<String>,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("loading {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let (plain, json) = if cli.json_logs {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        (Some(layer), None)
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();

    tracing::info!("Starting king-league v{}", env!("CARGO_PKG_VERSION"));

    let mut store = LeagueStore::open(StorageConfig::new(config.data_dir.clone()));
    let season = store.init(&config.league.default_season_name)?;

    match cli.command {
        Commands::Init => {
            println!("Data directory: {}", store.config().league_dir().display());
            println!("Active season:  {} ({})", season.name, season.id);
        }
        Commands::AddPlayer { name, email } => {
            let player = store.create_player(&name, email.as_deref())?;
            println!("Added player {} ({})", player.name, player.id);
        }
        Commands::Players => {
            let players = store.players()?;
            if players.is_empty() {
                println!("No players yet. Add one with `king-league add-player <name>`.");
            }
            for player in players {
                let email = player.email.as_deref().unwrap_or("-");
                println!("{:<18} {:<24} {}", player.id, player.name, email);
            }
        }
        Commands::AddMatch {
            player1,
            player2,
            date,
            time,
            format,
            phase,
            sets,
        } => {
            let player1 = resolve_player(&store, &player1)?;
            let player2 = resolve_player(&store, &player2)?;
            let match_date = match date {
                Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .map_err(|_| anyhow!("Invalid --date (expected YYYY-MM-DD): {}", d))?,
                None => Utc::now().date_naive(),
            };

            let record = store.create_match(NewMatch {
                player1_id: player1.id,
                player2_id: player2.id,
                match_date,
                match_time: time,
                format: format.parse::<MatchFormat>()?,
                phase: phase.parse::<MatchPhase>()?,
                sets: parse_sets(&sets)?,
            })?;
            print_match(&store, &record);
        }
        Commands::UpdateScores { id, sets } => {
            let record = store.update_match_scores(&id.into(), parse_sets(&sets)?)?;
            print_match(&store, &record);
        }
        Commands::CancelMatch { id } => {
            let record = store.cancel_match(&id.into())?;
            print_match(&store, &record);
        }
        Commands::Matches { limit } => {
            for record in store.matches(Some(limit))? {
                print_match(&store, &record);
            }
        }
        Commands::Standings { season } => {
            let season_id = season.map(SeasonId::from);
            print_standings(&store, season_id.as_ref())?;
        }
        Commands::Playoffs { season } => {
            let season_id = season.map(SeasonId::from);
            print_playoffs(&store, season_id.as_ref())?;
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(store, &config.server.cors_origin);
            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Look a player up by id, falling back to a case-insensitive name match.
fn resolve_player(store: &LeagueStore, key: &str) -> Result<Player> {
    if let Ok(player) = store.player(&PlayerId::from(key)) {
        return Ok(player);
    }
    store
        .players()?
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(key.trim()))
        .ok_or_else(|| anyhow!("Unknown player: {}", key))
}

/// Parse "11-5,7-11" into numbered set scores. An empty string means no sets.
fn parse_sets(raw: &str) -> Result<Vec<SetScore>> {
    let mut scores = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (a, b) = part
            .split_once('-')
            .ok_or_else(|| anyhow!("Invalid set score '{}' (expected e.g. 11-7)", part))?;
        let a: u32 = a.trim().parse().with_context(|| format!("set score '{}'", part))?;
        let b: u32 = b.trim().parse().with_context(|| format!("set score '{}'", part))?;
        scores.push((a, b));
    }
    Ok(SetScore::numbered(&scores))
}

fn player_name(store: &LeagueStore, id: &PlayerId) -> String {
    store
        .player(id)
        .map(|p| p.name)
        .unwrap_or_else(|_| id.to_string())
}

fn print_match(store: &LeagueStore, record: &MatchRecord) {
    let sets: Vec<String> = record
        .sets
        .iter()
        .map(|s| format!("{}-{}", s.score_a, s.score_b))
        .collect();
    let winner = record
        .winner_id
        .as_ref()
        .map(|id| player_name(store, id))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{} {} {}  {} vs {}  [{}, {}, {}]  sets: {}  winner: {}",
        record.id,
        record.match_date,
        record.match_time,
        player_name(store, &record.player1_id),
        player_name(store, &record.player2_id),
        record.format,
        record.phase,
        record.status,
        if sets.is_empty() {
            "-".to_string()
        } else {
            sets.join(", ")
        },
        winner,
    );
}

fn print_standings(store: &LeagueStore, season_id: Option<&SeasonId>) -> Result<()> {
    let standings = store.standings(season_id)?;
    if standings.is_empty() {
        println!("No players yet.");
        return Ok(());
    }

    println!(
        "{:>3}  {:<20} {:>4} {:>3} {:>3} {:>3} {:>7} {:>5}",
        "#", "Player", "Pts", "MP", "W", "L", "Sets", "Diff"
    );
    for row in standings {
        let s = row.stats;
        println!(
            "{:>3}  {:<20} {:>4} {:>3} {:>3} {:>3} {:>7} {:>+5}",
            row.rank,
            row.player.name,
            s.points,
            s.matches_played,
            s.matches_won,
            s.matches_lost,
            format!("{}-{}", s.sets_won, s.sets_lost),
            s.set_differential(),
        );
    }
    Ok(())
}

fn print_playoffs(store: &LeagueStore, season_id: Option<&SeasonId>) -> Result<()> {
    let view = store.playoffs(season_id)?;
    match &view.status {
        PlayoffStatus::NotYetAvailable {
            players_with_matches,
        } => {
            println!(
                "Playoffs not yet available: {} of 4 players have played a match.",
                players_with_matches
            );
        }
        PlayoffStatus::Ready { bracket } => {
            for (label, sf) in [
                ("Semifinal 1", &bracket.semifinal_1),
                ("Semifinal 2", &bracket.semifinal_2),
            ] {
                println!(
                    "{}: #{} {} vs #{} {}",
                    label, sf.high_seed, sf.high.name, sf.low_seed, sf.low.name
                );
            }
            match &view.final_pairing {
                Some((a, b)) => println!("Final: {} vs {}", a.name, b.name),
                None => println!("Final: waiting for both semifinals"),
            }
        }
    }
    Ok(())
}
