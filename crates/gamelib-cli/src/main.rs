mod cmd;
mod output;
mod root;
mod session;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gamelib",
    about = "Shared game libraries: track who owns what and find games everyone can play",
    version,
    propagate_version = true
)]
struct Cli {
    /// Community root (default: auto-detect from .gamelib/)
    #[arg(long, global = true, env = "GAMELIB_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Member issuing the command (id or roster name)
    #[arg(long = "as", global = true, env = "GAMELIB_USER")]
    requester: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .gamelib/ with a default config and an example roster
    Init,

    /// Add a game to your library (or another member's, with manage rights)
    Add {
        title: String,
        #[arg(long)]
        user: Option<String>,
    },

    /// Remove a game from your library (or another member's, with manage rights)
    Remove {
        title: String,
        #[arg(long)]
        user: Option<String>,
    },

    /// List a member's games alphabetically
    List {
        #[arg(long)]
        user: Option<String>,
    },

    /// Check whether a member has a game, or who has it when no member is given
    Check {
        title: String,
        #[arg(long)]
        user: Option<String>,
    },

    /// Wipe a library (the Steam link is kept)
    Destroy {
        #[arg(long)]
        user: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Re-sync a linked member's Steam games
    Update {
        #[arg(long)]
        user: Option<String>,
    },

    /// Link a Steam profile (64-bit id or custom URL name) and sync its games
    Link {
        profile: String,
        #[arg(long)]
        user: Option<String>,
    },

    /// List games common to your voice channel, or to everyone online
    Suggest {
        /// 'voice' or 'online' (default: voice, falling back to online)
        mode: Option<String>,
    },

    /// Create a poll from the common games
    Poll {
        /// 'voice' or 'online' (default: voice, falling back to online)
        mode: Option<String>,
    },

    /// Pick one common game at random
    Pick {
        /// 'voice' or 'online' (default: voice, falling back to online)
        mode: Option<String>,
    },

    /// Set the Steam Web API key (manage rights required)
    Steamkey { key: String },

    /// Inspect or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let requester = cli.requester.as_deref();
    let json = cli.json;

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, json),
        Commands::Add { title, user } => {
            cmd::library::add(&root, requester, &title, user.as_deref(), json)
        }
        Commands::Remove { title, user } => {
            cmd::library::remove(&root, requester, &title, user.as_deref(), json)
        }
        Commands::List { user } => cmd::library::list(&root, requester, user.as_deref(), json),
        Commands::Check { title, user } => {
            cmd::library::check(&root, requester, &title, user.as_deref(), json)
        }
        Commands::Destroy { user, yes } => {
            cmd::library::destroy(&root, requester, user.as_deref(), yes, json)
        }
        Commands::Update { user } => cmd::steam::update(&root, requester, user.as_deref(), json),
        Commands::Link { profile, user } => {
            cmd::steam::link(&root, requester, &profile, user.as_deref(), json)
        }
        Commands::Steamkey { key } => cmd::steam::set_key(&root, requester, &key, json),
        Commands::Suggest { mode } => {
            cmd::suggest::suggest(&root, requester, mode.as_deref(), json)
        }
        Commands::Poll { mode } => cmd::suggest::poll(&root, requester, mode.as_deref(), json),
        Commands::Pick { mode } => cmd::suggest::pick(&root, requester, mode.as_deref(), json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
