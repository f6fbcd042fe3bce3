use std::sync::Arc;

use anyhow::{Context, Result};
use audio::{AudioManager, SoundController, TracingSink};
use clap::{Parser, Subcommand};
use client_core::{
    network::{ChainId, Manifest, NetworkConfig, NetworkDefinition},
    transport::{HttpStateSource, HttpTransactionRelay},
    ClientEvent, GameActions, GameDirector, GameStore, NoticeLevel,
};
use shared::domain::{AccountAddress, Direction, Vec2};
use storage::Storage;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "hexgrid", about = "Command-line client for the hex-grid game")]
struct Args {
    /// KATANA or SN_SEPOLIA.
    #[arg(long)]
    chain: Option<String>,
    /// Wallet address used for transactions and lookups.
    #[arg(long)]
    account: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved network configuration as JSON.
    Network,
    /// Spawn a player for the account.
    Spawn,
    /// Move one cell and wait for the authoritative position.
    Move {
        /// east, north-east, north-west, west, south-west or south-east.
        #[arg(long, value_parser = parse_direction)]
        direction: Direction,
    },
    /// Refresh and print the player state.
    Status,
    /// Resolve the soundtrack for a route.
    Phase {
        #[arg(long, default_value = "/")]
        route: String,
        #[arg(long)]
        dead: bool,
    },
}

fn parse_direction(raw: &str) -> Result<Direction, String> {
    Direction::from_name(raw).ok_or_else(|| format!("unknown direction '{raw}'"))
}

fn resolve_network(settings: &Settings) -> Result<NetworkConfig> {
    let chain_id = settings.chain.parse::<ChainId>()?;
    let manifest_path = settings.manifest_dir.join(chain_id.manifest_file());
    let manifest = match Manifest::load(&manifest_path) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(error = %err, "continuing without a deployment manifest");
            Manifest::default()
        }
    };
    Ok(NetworkDefinition::from_env(chain_id).into_config(manifest))
}

struct Session {
    store: GameStore,
    director: Arc<GameDirector>,
    actions: GameActions,
}

async fn open_session(settings: &Settings, network: &NetworkConfig) -> Result<Session> {
    let relay_url = settings.relay_url.as_deref().unwrap_or(&network.rpc_url);
    let indexer_url = settings
        .indexer_url
        .as_deref()
        .unwrap_or(&network.torii_url);
    let executor = Arc::new(HttpTransactionRelay::new(relay_url)?);
    let source = Arc::new(HttpStateSource::new(indexer_url)?);
    let storage = Storage::new(&settings.database_url)
        .await
        .with_context(|| format!("failed to open storage at '{}'", settings.database_url))?;

    let store = GameStore::default();
    store.set_account(settings.account.clone().map(AccountAddress::new));
    let ui = client_core::UiStore::default();
    ui.set_music_enabled(settings.music_enabled);
    let director = Arc::new(GameDirector::new(store.clone(), source));
    let actions = GameActions::new(ui, Arc::clone(&director), executor, Arc::new(storage));

    if let Err(err) = actions.restore_game_id().await {
        warn!(error = %err, "failed to restore game id");
    }
    info!(
        chain = %network.chain_id,
        relay = relay_url,
        indexer = indexer_url,
        "session ready"
    );

    Ok(Session {
        store,
        director,
        actions,
    })
}

fn format_position(position: Option<Vec2>) -> String {
    position.map_or_else(|| "-".to_string(), |p| p.to_string())
}

fn print_events(events: &mut broadcast::Receiver<ClientEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            ClientEvent::Notice(notice) => match notice.level {
                NoticeLevel::Success => println!("ok: {}", notice.message),
                NoticeLevel::Error => println!("error: {}", notice.message),
            },
            ClientEvent::Spawned { game_id } => match game_id {
                Some(game_id) => println!("spawned game {game_id}"),
                None => println!("spawned"),
            },
            ClientEvent::MoveReconciled { outcome, position } => {
                println!("reconciled: {outcome:?} at {}", format_position(position));
            }
        }
    }
}

fn print_state(store: &GameStore) {
    let state = store.snapshot();
    let account = state
        .account
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let game_id = state
        .game_id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    println!("account:  {account}");
    println!("game:     {game_id}");
    println!("spawned:  {}", state.is_spawned);
    println!("position: {}", format_position(state.current_position()));
    println!("moves:    {}", state.moves);
    println!("can move: {}", state.can_move);
    println!("dead:     {}", state.is_dead);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(chain) = args.chain {
        settings.chain = chain;
    }
    if let Some(account) = args.account {
        settings.account = Some(account);
    }

    match args.command {
        Command::Network => {
            let network = resolve_network(&settings)?;
            println!("{}", serde_json::to_string_pretty(&network)?);
        }
        Command::Phase { route, dead } => {
            let mut controller = SoundController::new(AudioManager::new(TracingSink::new()));
            controller.on_user_gesture();
            let phase = controller.sync(&route, dead, settings.music_enabled);
            let state = controller.manager().state();
            println!("phase: {phase:?}");
            println!("track: {}", state.track_index);
            println!("muted: {}", state.muted);
        }
        Command::Spawn => {
            let network = resolve_network(&settings)?;
            let session = open_session(&settings, &network).await?;
            let mut events = session.actions.subscribe_events();
            let result = session.actions.handle_spawn().await;
            print_events(&mut events);
            result?;
            print_state(&session.store);
        }
        Command::Move { direction } => {
            let network = resolve_network(&settings)?;
            let session = open_session(&settings, &network).await?;
            session.director.refresh_game_state().await?;
            let mut events = session.actions.subscribe_events();
            let report = match session.actions.handle_move(direction).await {
                Ok(report) => report,
                Err(err) => {
                    print_events(&mut events);
                    return Err(err.into());
                }
            };
            println!(
                "moving {direction:?} from {} to {}",
                report.intent.pre_move,
                format_position(report.predicted)
            );
            print_events(&mut events);
            report
                .reconciliation
                .await
                .context("move reconciliation did not finish")?;
            print_events(&mut events);
            print_state(&session.store);
        }
        Command::Status => {
            let network = resolve_network(&settings)?;
            let session = open_session(&settings, &network).await?;
            session.director.refresh_game_state().await?;
            print_state(&session.store);
        }
    }

    Ok(())
}
