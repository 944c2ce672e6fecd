//! tierscout - scouting tier-list CLI
//!
//! Thin presentation surface over the session core: opens the per-event
//! scouting session (stored snapshot first, roster fetch only when none
//! exists), applies place/remove mutations, and drives the export paths.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tierscout::export::{self, ExportPayload, ExportScheduler, AUTO_EXPORT_DEBOUNCE};
use tierscout::fetch::colors::ColorsClient;
use tierscout::fetch::tba::TbaClient;
use tierscout::{display, Session, SnapshotStore};
use tierscout_common::config::{self, SessionConfig, TomlConfig};
use tierscout_common::db::{self, init_database};
use tierscout_common::events::EventBus;
use tierscout_common::{ScoutNotes, Tier};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[clap(name = "tierscout")]
#[clap(about = "Scouting tier list for robotics competition events")]
struct Cli {
    /// Data folder holding the scouting database
    #[clap(long, value_name = "DIR", global = true)]
    data_folder: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the current event's session, fetching the roster if needed
    Load,
    /// Show the tier board, notes and unranked teams
    Show,
    /// Place a team into a tier (also the edit-notes path)
    Place {
        /// Target tier: S, A, B, C or D
        tier: Tier,
        /// Team number
        team: u32,
        #[clap(long, default_value = "")]
        driver_skill: String,
        #[clap(long, default_value = "")]
        hardware: String,
        #[clap(long, default_value = "")]
        communication: String,
        #[clap(long, default_value = "")]
        game_knowledge: String,
        /// Robot fits under the trench
        #[clap(long)]
        under_trench: bool,
    },
    /// Remove a team from a tier back to the unranked pool
    Remove {
        tier: Tier,
        team: u32,
    },
    /// Export current tier data to the configured spreadsheet webhook
    Export,
    /// Show the event match schedule and results
    Matches,
    /// Delete the stored snapshot for the current event
    Reset,
    /// Read or write settings
    Config {
        #[clap(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print one setting, or all of them
    Get { key: Option<String> },
    /// Write a setting
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let toml_config = TomlConfig::load();
    let data_folder = config::resolve_data_folder(cli.data_folder.as_deref(), &toml_config);
    let db_path = config::database_path(&data_folder);
    debug!("Database path: {}", db_path.display());

    // Storage is the only durable home of scouting work; failure here (or
    // on any later snapshot write) ends the session loudly.
    let pool = init_database(&db_path)
        .await
        .context("Cannot open scouting database; session state would not persist")?;

    let cfg = SessionConfig::load(&pool, &toml_config).await?;
    let store = SnapshotStore::new(pool.clone());
    let bus = EventBus::default();

    match cli.command {
        Command::Load => {
            let session = open_session(&cfg, store, bus).await?;
            info!(
                event_key = session.event_key(),
                available = session.pool().len(),
                placed = session.board().placed_count(),
                "Session ready"
            );
        }
        Command::Show => {
            let session = open_session(&cfg, store, bus).await?;
            println!("Event: {}\n", session.event_key());
            print!("{}", display::format_board(session.board(), session.notes()));
            println!("\nUnranked teams:");
            print!("{}", display::format_pool(session.pool()));
        }
        Command::Place {
            tier,
            team,
            driver_skill,
            hardware,
            communication,
            game_knowledge,
            under_trench,
        } => {
            let mut rx = bus.subscribe();
            let mut session = open_session(&cfg, store, bus.clone()).await?;

            let notes = ScoutNotes {
                driver_skill,
                hardware_electro: hardware,
                communication,
                basic_game_knowledge: game_knowledge,
                under_trench,
            };
            if session.place(tier, team, notes).await? {
                println!("Placed team {} in tier {}", team, tier);
            } else {
                println!("Team {} is not part of this event; nothing changed", team);
            }

            run_auto_export(&cfg, &session, &bus, &mut rx).await;
        }
        Command::Remove { tier, team } => {
            let mut rx = bus.subscribe();
            let mut session = open_session(&cfg, store, bus.clone()).await?;

            if session.remove(tier, team).await? {
                println!("Removed team {} from tier {}", team, tier);
            } else {
                println!("Team {} is not in tier {}; nothing changed", team, tier);
            }

            run_auto_export(&cfg, &session, &bus, &mut rx).await;
        }
        Command::Export => {
            let session = open_session(&cfg, store, bus.clone()).await?;
            let payload = ExportPayload::from_session(&session, &cfg.scout_name);

            match export::export_now(&cfg.spreadsheet_url, &payload, &bus).await {
                Ok(data) => {
                    println!("{}", data);
                    println!();
                    println!(
                        "Tier data exported to {} and printed above for pasting.",
                        cfg.spreadsheet_url
                    );
                }
                Err(export::ExportError::NoDestination) => {
                    bail!(
                        "No spreadsheet URL set. Configure one with: \
                         tierscout config set spreadsheet_url <url>"
                    );
                }
                Err(e) => bail!("Export failed: {}", e),
            }
        }
        Command::Matches => {
            let client = TbaClient::new(cfg.require_tba_key()?)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            match client.event_matches(&cfg.event_key).await {
                Ok(matches) if matches.is_empty() => {
                    println!("No matches published yet for {}", cfg.event_key);
                }
                Ok(matches) => print!("{}", display::format_matches(&matches)),
                Err(e) => bail!("Failed to fetch matches: {}", e),
            }
        }
        Command::Reset => {
            store.reset(&cfg.event_key).await?;
            println!(
                "Cleared stored snapshot for {}; next load refetches the roster",
                cfg.event_key
            );
        }
        Command::Config { action } => match action {
            ConfigAction::Get { key: Some(key) } => {
                db::settings::validate_key(&key)?;
                println!("{}", db::settings::get(&pool, &key).await?);
            }
            ConfigAction::Get { key: None } => {
                for key in db::settings::EDITABLE_KEYS {
                    println!("{} = {}", key, db::settings::get(&pool, key).await?);
                }
            }
            ConfigAction::Set { key, value } => {
                db::settings::validate_key(&key)?;
                db::settings::set(&pool, &key, &value).await?;
                println!("{} = {}", key, value);
                if key == "event_key" {
                    // Hard reset semantics: per-event state never merges
                    // across codes.
                    info!("Event changed; the next load targets {}'s own snapshot", value);
                }
            }
        },
    }

    Ok(())
}

/// Open the session for the configured event: stored snapshot first, roster
/// fetch (plus best-effort color enrichment) only when none exists.
async fn open_session(cfg: &SessionConfig, store: SnapshotStore, bus: EventBus) -> Result<Session> {
    if let Some(session) =
        Session::hydrate(&cfg.event_key, &cfg.scout_name, store.clone(), bus.clone()).await?
    {
        return Ok(session);
    }

    info!(event_key = %cfg.event_key, "No stored snapshot; fetching roster");
    let client = TbaClient::new(cfg.require_tba_key()?).map_err(|e| anyhow::anyhow!("{}", e))?;
    let teams = client
        .event_teams(&cfg.event_key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch teams: {}", e))?;

    let team_ids: Vec<u32> = teams.iter().map(|t| t.id).collect();
    let mut session =
        Session::seed(&cfg.event_key, &cfg.scout_name, teams, store, bus).await?;

    // Colors are display-only enrichment; a failure degrades, never blocks.
    match ColorsClient::new() {
        Ok(colors_client) => match colors_client.team_colors(&team_ids).await {
            Ok(colors) => {
                let updated = session.apply_colors(&colors).await?;
                debug!(updated, "Applied verified team colors");
            }
            Err(e) => {
                warn!("Failed to fetch team colors, showing teams without colors: {}", e);
            }
        },
        Err(e) => {
            warn!("Failed to fetch team colors, showing teams without colors: {}", e);
        }
    }

    Ok(session)
}

/// Arm (and, in this one-shot process, wait out) the debounced auto-export
/// if the mutation that just ran changed the board.
async fn run_auto_export(
    cfg: &SessionConfig,
    session: &Session,
    bus: &EventBus,
    rx: &mut tokio::sync::broadcast::Receiver<tierscout_common::events::SessionEvent>,
) {
    if !cfg.auto_export || cfg.spreadsheet_url.is_empty() {
        return;
    }

    let mut board_changed = false;
    while let Ok(event) = rx.try_recv() {
        debug!(?event, "Session event");
        if event.changes_board() {
            board_changed = true;
        }
    }
    if !board_changed {
        return;
    }

    let scheduler = ExportScheduler::new(&cfg.spreadsheet_url, AUTO_EXPORT_DEBOUNCE, bus.clone());
    scheduler.schedule(&ExportPayload::from_session(session, &cfg.scout_name));
    scheduler.idle().await;
}
