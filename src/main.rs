use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use traitors_score::config::Config;
use traitors_score::game::GameState;
use traitors_score::history::{ArchivedSnapshot, HistoryState};
use traitors_score::scoring::{self, PlayerScore, RulePack};

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_STATE: i32 = 5;
const EXIT_HISTORY: i32 = 6;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ranked totals with movement since the last archive (default if no subcommand)
    Leaderboard {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show every scoring event and achievement for one player
    Breakdown {
        /// Player id or display name
        player: String,

        #[arg(long)]
        json: bool,
    },
    /// Append the current totals to the archive history
    Archive {
        /// Label for the snapshot, e.g. "Week 3"
        #[arg(short, long)]
        label: String,
    },
    /// List archived snapshots
    History,
    /// List rule packs, or print one pack's point table
    Rules {
        /// Rule pack id
        id: Option<String>,
    },
    /// Check the config rule packs and the game state for problems
    Validate,
}

#[derive(Parser, Debug)]
#[command(name = "traitors-score")]
#[command(about = "Fantasy league scoring for The Traitors", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/traitors-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to game state JSON (overrides config)
    #[arg(short, long, global = true)]
    state: Option<PathBuf>,

    /// Rule pack id (overrides config)
    #[arg(short, long, global = true)]
    pack: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Leaderboard {
        format: OutputFormat::Table,
    });

    let config = match traitors_score::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate custom rule packs at startup
    if let Err(errors) = scoring::validate_rule_packs(config.custom_rule_packs()) {
        eprintln!("Rule pack config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let registry = config.rule_registry();
    let pack = registry.get(cli.pack.as_deref());
    let state_path = cli.state.unwrap_or_else(|| config.state_path());

    match command {
        Commands::Leaderboard { format } => {
            let state = load_state_or_exit(&state_path);
            let scores = score_or_exit(&state, pack);
            let current = scoring::totals_by_player(&scores);

            match format {
                OutputFormat::Table => {
                    let history = load_history_or_exit(&config);
                    let movement = history.movement(&current);
                    let use_colors = traitors_score::output::should_use_colors();
                    println!(
                        "{}",
                        traitors_score::output::format_leaderboard(&scores, &movement, use_colors)
                    );
                }
                OutputFormat::Tsv => {
                    println!("{}", traitors_score::output::format_tsv(&scores));
                }
                OutputFormat::Json => {
                    let rows: Vec<_> = scores
                        .iter()
                        .map(|s| {
                            serde_json::json!({
                                "rank": s.rank,
                                "playerId": s.player.id,
                                "name": s.player.display_name(),
                                "result": s.result,
                            })
                        })
                        .collect();
                    print_json_or_exit(&rows);
                }
            }
        }
        Commands::Breakdown { player, json } => {
            let state = load_state_or_exit(&state_path);
            let Some(prediction) = state.player(&player) else {
                eprintln!("No player matching '{}' in {}", player, state_path.display());
                std::process::exit(EXIT_USAGE);
            };

            let result = match scoring::calculate_score(&state, pack, prediction) {
                Ok(r) => r,
                Err(e) => scores_unavailable(e),
            };

            if json {
                print_json_or_exit(&result);
            } else {
                let use_colors = traitors_score::output::should_use_colors();
                println!(
                    "{}",
                    traitors_score::output::format_breakdown(prediction, &result, use_colors)
                );
            }
        }
        Commands::Archive { label } => {
            let state = load_state_or_exit(&state_path);
            let scores = score_or_exit(&state, pack);
            let totals = scoring::totals_by_player(&scores);

            let history_path = config.history_path();
            let mut history = load_history_or_exit(&config);
            history.archive(ArchivedSnapshot::new(label.clone(), totals));

            if let Err(e) = traitors_score::history::save_history(&history_path, &history) {
                eprintln!("History error: {:#}", e);
                std::process::exit(EXIT_HISTORY);
            }
            tracing::info!(label = %label, players = scores.len(), "archived totals");
            println!(
                "Archived {} players as '{}' to {}",
                scores.len(),
                label,
                history_path.display()
            );
        }
        Commands::History => {
            let history = load_history_or_exit(&config);
            println!("{}", traitors_score::output::format_history(&history));
        }
        Commands::Rules { id } => match id {
            Some(id) => {
                // Explicit lookups should not silently show a different pack
                match registry.packs().iter().find(|p| p.id == id) {
                    Some(pack) => println!("{}", traitors_score::output::format_rule_pack(pack)),
                    None => {
                        eprintln!("Unknown rule pack '{}'", id);
                        std::process::exit(EXIT_USAGE);
                    }
                }
            }
            None => {
                let default_id = &registry.default_pack().id;
                for pack in registry.packs() {
                    let marker = if &pack.id == default_id { "*" } else { " " };
                    println!("{} {:<16} {}", marker, pack.id, pack.name);
                }
            }
        },
        Commands::Validate => {
            let state = load_state_or_exit(&state_path);
            match scoring::validate_game_state(&state) {
                Ok(()) => println!(
                    "OK: {} players, rule pack '{}'",
                    state.players.len(),
                    pack.id
                ),
                Err(errors) => {
                    eprintln!("Game state problems in {}:", state_path.display());
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    std::process::exit(EXIT_STATE);
                }
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Log to stderr; stdout is reserved for command output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "traitors_score=debug,warn"
    } else {
        "traitors_score=warn"
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {}", e);
    }
}

fn load_state_or_exit(path: &std::path::Path) -> GameState {
    match traitors_score::game::load_game_state(path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Scores unavailable: {:#}", e);
            std::process::exit(EXIT_STATE);
        }
    }
}

fn load_history_or_exit(config: &Config) -> HistoryState {
    match traitors_score::history::load_history(&config.history_path()) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("History error: {:#}", e);
            std::process::exit(EXIT_HISTORY);
        }
    }
}

fn score_or_exit<'a>(state: &'a GameState, pack: &RulePack) -> Vec<PlayerScore<'a>> {
    match scoring::score_all(state, pack) {
        Ok(scores) => scores,
        Err(e) => scores_unavailable(e),
    }
}

fn scores_unavailable(e: scoring::ScoreError) -> ! {
    eprintln!("Scores unavailable: {}", e);
    std::process::exit(EXIT_STATE);
}

fn print_json_or_exit<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(EXIT_STATE);
        }
    }
}
