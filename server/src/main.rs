use anyhow::Context;
use clap::{Parser, Subcommand};
use moodmix_backend_api::{build_router, AppState};
use moodmix_config::load as load_config;
use moodmix_rooms::UserEmotion;
use moodmix_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "moodmix-backend")]
#[command(about = "Mood-to-music agent and room blend service (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Print the song suggestion for a mood
    Suggest { emotion: String },
    /// Blend a room's moods and publish the policy
    Blend {
        #[arg(long)]
        room: String,
        /// Member moods as `user=emotion`
        #[arg(value_parser = parse_user_emotion, required = true)]
        entries: Vec<UserEmotion>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Suggest { emotion } => suggest(&emotion).await,
        Commands::Blend { room, entries } => blend(&room, &entries).await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting moodmix backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = AppState::new(services.agent, services.blender, services.rooms);
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(moodmix_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn suggest(emotion: &str) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let suggestion = services
        .agent
        .suggest(emotion)
        .context("failed to compute suggestion")?;
    println!("{suggestion}");
    Ok(())
}

async fn blend(room: &str, entries: &[UserEmotion]) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let outcome = services
        .blender
        .blend(room, entries)
        .await
        .with_context(|| format!("failed to blend room {room}"))?;

    if !outcome.published {
        info!(room_id = room, "policy computed but not published");
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn parse_user_emotion(raw: &str) -> Result<UserEmotion, String> {
    let (user, emotion) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected user=emotion, got '{raw}'"))?;

    let user = user.trim();
    if user.is_empty() {
        return Err(format!("missing user id in '{raw}'"));
    }

    Ok(UserEmotion::new(user, emotion.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_emotion_splits_on_first_equals() {
        let entry = parse_user_emotion("u1= Happy ").expect("valid entry");
        assert_eq!(entry.user_id, "u1");
        assert_eq!(entry.emotion, "Happy");
    }

    #[test]
    fn parse_user_emotion_rejects_malformed_input() {
        assert!(parse_user_emotion("u1").is_err());
        assert!(parse_user_emotion("=happy").is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["moodmix-backend"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn blend_command_collects_entries() {
        let cli = Cli::try_parse_from([
            "moodmix-backend",
            "blend",
            "--room",
            "room_001",
            "u1=happy",
            "u2=sad",
        ])
        .expect("parses");

        match cli.command {
            Some(Commands::Blend { room, entries }) => {
                assert_eq!(room, "room_001");
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[1].emotion, "sad");
            }
            _ => panic!("expected blend command"),
        }
    }

    #[test]
    fn blend_command_requires_entries() {
        assert!(Cli::try_parse_from(["moodmix-backend", "blend", "--room", "r"]).is_err());
    }
}
