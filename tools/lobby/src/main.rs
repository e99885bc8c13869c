use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cyber_lobby_client::config::DEFAULT_ADMIN_USERNAME;
use cyber_lobby_client::session::default_data_dir;
use cyber_lobby_client::{FileStore, HttpLobbyClient, HttpTransport, LobbyClient, LobbyConfig};
use shared::protocol::{PlayerId, Team, DEFAULT_AVATAR, DEFAULT_LEVEL};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "lobby", about = "Terminal client for the Cyber Lobby service")]
struct Cli {
    /// Lobby service endpoint (GET for snapshots, POST for actions)
    #[arg(long, env = "LOBBY_ENDPOINT")]
    endpoint: String,

    /// Where the session is remembered between runs
    #[arg(long, env = "LOBBY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Seconds between lobby polls
    #[arg(long, env = "LOBBY_POLL_INTERVAL", default_value_t = 3)]
    poll_interval: u64,

    /// Username allowed to kick players
    #[arg(long, env = "LOBBY_ADMIN", default_value = DEFAULT_ADMIN_USERNAME)]
    admin: String,

    /// Give up on a request after this many seconds
    #[arg(long, env = "LOBBY_TIMEOUT")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Join the lobby and remember the session
    Join {
        username: String,
        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        level: u32,
        #[arg(long, default_value = DEFAULT_AVATAR)]
        avatar: String,
    },
    /// Print the lobby once
    Status,
    /// Send a chat message
    Say {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Put a player on team a or b
    Assign { player_id: String, team: Team },
    /// Remove a player (admin only)
    Kick { player_id: String },
    /// Keep the lobby on screen, refreshing on every poll, until Ctrl-C
    Watch,
}

impl Cli {
    fn config(&self) -> LobbyConfig {
        let mut config = LobbyConfig::new(&self.endpoint)
            .with_poll_interval(Duration::from_secs(self.poll_interval))
            .with_admin(&self.admin);
        if let Some(secs) = self.timeout {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let client = Arc::new(build_client(&cli)?);

    match cli.command {
        Commands::Join {
            username,
            level,
            avatar,
        } => {
            let Some(session) = client.join(&username, level, &avatar).await else {
                bail!("could not join the lobby, see the log above");
            };
            println!("✅ Joined as {} (session {})", session.username, session.session_id);
            println!("{}", render::render(&client.view()));
        }
        Commands::Status => {
            client.restore_session();
            client.poll().await;
            println!("{}", render::render(&client.view()));
        }
        Commands::Say { text } => {
            require_session(&client)?;
            if !client.send_text(text.join(" ")).await {
                bail!("message not sent");
            }
            println!("{}", render::render(&client.view()));
        }
        Commands::Assign { player_id, team } => {
            client.restore_session();
            if !client.assign_to_team(&PlayerId::from(player_id), team).await {
                bail!("team assignment failed");
            }
            println!("{}", render::render(&client.view()));
        }
        Commands::Kick { player_id } => {
            require_session(&client)?;
            if !client.kick_player(&PlayerId::from(player_id)).await {
                bail!("kick not sent, only '{}' may kick players", client.config().admin_username);
            }
            println!("{}", render::render(&client.view()));
        }
        Commands::Watch => watch(&client).await?,
    }

    Ok(())
}

fn build_client(cli: &Cli) -> Result<HttpLobbyClient> {
    let config = cli.config();
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };

    let store = FileStore::in_dir(&data_dir)
        .with_context(|| format!("opening session store in {}", data_dir.display()))?;
    let transport = HttpTransport::new(&config)?;
    info!("🏠 Lobby endpoint {}", config.endpoint);

    Ok(LobbyClient::new(config, transport, store))
}

fn require_session(client: &HttpLobbyClient) -> Result<()> {
    if !client.restore_session() {
        bail!("no saved session, run `lobby join <username>` first");
    }
    Ok(())
}

async fn watch(client: &Arc<HttpLobbyClient>) -> Result<()> {
    client.restore_session();
    let mut changes = client.subscribe();
    let sync = client.start_sync();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                // clear screen, cursor home
                print!("\x1B[2J\x1B[H");
                println!("{}", render::render(&client.view()));
            }
            _ = &mut ctrl_c => {
                info!("👋 Leaving watch mode");
                break;
            }
        }
    }

    sync.stop();
    Ok(())
}
