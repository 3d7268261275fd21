#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use zone_guide::config::MigrationOutcome;
use zone_guide::keys::is_direct_destination;
use zone_guide::{
    ButtonColor, ConfigStore, DispatchError, FavoritesRegistry, JsonFileHost, MutationOutcome, NewFavorite,
    PersistenceHost, TeleportDispatch,
};

/// Inspect and edit zone guide favorites outside the game client
#[derive(Debug, Parser)]
#[command(name = "zone-guide", version)]
struct Cli {
    /// Favorites file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List character profiles and their favorite counts
    Profiles,
    /// List a character's favorites in display order
    List {
        #[arg(short, long)]
        character: String,
    },
    /// Add a teleport favorite
    Add {
        #[arg(short, long)]
        character: String,
        #[arg(long)]
        zone: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        id: u32,
    },
    Remove {
        #[arg(short, long)]
        character: String,
        key: String,
    },
    MoveUp {
        #[arg(short, long)]
        character: String,
        key: String,
    },
    MoveDown {
        #[arg(short, long)]
        character: String,
        key: String,
    },
    /// Move pre-profile favorites into the legacy profile
    Migrate,
}

/// Dispatcher for use without a game client: a fixed character, no teleports
struct OfflineDispatch {
    character: Option<String>,
}

impl TeleportDispatch for OfflineDispatch {
    fn current_character_key(&self) -> Result<String, DispatchError> {
        self.character.clone().ok_or(DispatchError::NoCurrentCharacter)
    }

    fn teleport(&self, _destination_id: u32) -> Result<(), DispatchError> {
        Err(DispatchError::Unavailable("no game client attached".to_string()))
    }

    fn execute_named_command(&self, _name: &str) -> Result<(), DispatchError> {
        Err(DispatchError::Unavailable("no game client attached".to_string()))
    }
}

fn init_logging() -> Result<()> {
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")?;
    Ok(())
}

fn open_registry(path: PathBuf, character: String) -> FavoritesRegistry {
    let store = ConfigStore::open(Box::new(JsonFileHost::new(path)));
    let dispatch = Rc::new(OfflineDispatch {
        character: Some(character),
    });
    FavoritesRegistry::new(store, dispatch)
}

fn report(outcome: MutationOutcome, what: &str) -> Result<()> {
    match outcome {
        MutationOutcome::Saved => {
            println!("{what}");
            Ok(())
        }
        MutationOutcome::Unchanged => {
            println!("Nothing to do");
            Ok(())
        }
        MutationOutcome::Unsaved => bail!("{what}, but the favorites file could not be written"),
        MutationOutcome::Skipped => bail!("No character selected"),
    }
}

/// Only direct teleport ids; 0 and the shared-estate band are rejected
fn check_destination(id: u32) -> Result<()> {
    if !is_direct_destination(id) {
        bail!("Destination id {id} is not a teleport target");
    }
    Ok(())
}

fn print_favorites(registry: &FavoritesRegistry) {
    if registry.is_empty() {
        println!("No favorites");
        return;
    }
    for (key, entry) in registry.sorted() {
        println!(
            "{:>3}  {:<32} {:<24} id={:<6} {}",
            entry.order, entry.name, entry.zone, entry.destination_id, key
        );
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(JsonFileHost::default_path);
    info!(path = %path.display(), "Using favorites file");

    match cli.command {
        Command::Profiles => {
            let store = ConfigStore::open(Box::new(JsonFileHost::new(path)));
            for character in store.character_keys() {
                let count = store
                    .profile(character)
                    .map_or(0, |profile| profile.favorites_by_key.len());
                println!("{character:<32} {count} favorite(s)");
            }
        }
        Command::List { character } => {
            let registry = open_registry(path, character);
            print_favorites(&registry);
        }
        Command::Add {
            character,
            zone,
            location,
            id,
        } => {
            check_destination(id)?;
            let mut registry = open_registry(path, character);
            let favorite = NewFavorite::teleport(&zone, id, &location, ButtonColor::default());
            let key = favorite.key.clone();
            report(registry.add_favorite(favorite), &format!("Added {key}"))?;
        }
        Command::Remove { character, key } => {
            let mut registry = open_registry(path, character);
            report(registry.remove_favorite(&key), &format!("Removed {key}"))?;
        }
        Command::MoveUp { character, key } => {
            let mut registry = open_registry(path, character);
            report(registry.move_up(&key), &format!("Moved {key} up"))?;
            print_favorites(&registry);
        }
        Command::MoveDown { character, key } => {
            let mut registry = open_registry(path, character);
            report(registry.move_down(&key), &format!("Moved {key} down"))?;
            print_favorites(&registry);
        }
        Command::Migrate => {
            let host = JsonFileHost::new(path);
            let root = host
                .load()
                .with_context(|| format!("Failed to load {}", host.path().display()))?;
            let mut store = ConfigStore::new(root);
            match store.initialize(Box::new(host))? {
                MigrationOutcome::NotNeeded => println!("Nothing to migrate"),
                MigrationOutcome::Migrated { favorites, estate_titles } => {
                    println!("Migrated {favorites} favorite(s) and {estate_titles} estate title(s)")
                }
            }
        }
    }
    Ok(())
}
