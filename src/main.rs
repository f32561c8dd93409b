#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix connections, Upstream HTTP
//! - Application: Router, Stream Relay
//! - Interface: Command Handlers

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::relay::fanout::{Broadcaster, ConnectionPool};
use crate::application::relay::memory::RelayMemory;
use crate::application::relay::supervisor::StreamSupervisor;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::domain::traits::Microblog;
use crate::infrastructure::matrix::{MatrixOutlet, MatrixService};
use crate::infrastructure::upstream::{HttpMicroblog, HttpStreamSource};

#[derive(Parser)]
#[command(name = "skylark", about = "Relays a social-media stream into Matrix rooms")]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&args.config)?;

    // 2. Logging Setup
    let data_dir = Path::new(&config.system.data_dir);
    if !data_dir.exists() {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = data_dir.join("session.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(data_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting Skylark...");

    // 3. Matrix Connections
    let mut pool = ConnectionPool::new();
    let mut clients = Vec::new();
    for conn in &config.services.connections {
        let client = Client::builder()
            .homeserver_url(&conn.homeserver)
            .build()
            .await?;
        client
            .matrix_auth()
            .login_username(&conn.username, &conn.password)
            .send()
            .await?;
        tracing::info!("Logged in as {} (connection '{}')", conn.username, conn.name);

        if let Some(name) = &conn.display_name {
            let _ = client.account().set_display_name(Some(name.as_str())).await;
        }

        pool.register(&conn.name, Arc::new(MatrixOutlet::new(client.clone())));
        clients.push(client);
    }
    let pool = Arc::new(pool);

    // 4. Relay Core
    let memory = RelayMemory::shared();
    let broadcaster = Arc::new(Broadcaster::new(config.relay.announce.clone(), pool));
    let http = reqwest::Client::new();
    let source = Arc::new(HttpStreamSource::new(http.clone(), &config.relay));
    let api: Arc<dyn Microblog> = Arc::new(HttpMicroblog::new(http, &config.relay));

    let supervisor = Arc::new(StreamSupervisor::new(
        source,
        memory.clone(),
        broadcaster,
        config.relay.status_url_base.clone(),
        config.relay.reconnect_seconds.clone(),
    ));
    supervisor.start().await?;

    let router = Arc::new(CommandRouter::new(
        config.clone(),
        memory,
        api,
        supervisor.clone(),
    ));

    // 5. Event Handlers
    let start_time = std::time::SystemTime::now();
    for client in &clients {
        let loop_router = router.clone();

        client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
            let router = loop_router.clone();

            async move {
                if let Some(original_msg) = ev.as_original() {
                    // Ignore events older than start_time
                    let ts = ev.origin_server_ts();
                    let event_time = std::time::UNIX_EPOCH
                        + std::time::Duration::from_millis(ts.get().into());
                    if event_time < start_time {
                        return;
                    }

                    if let MessageType::Text(text_content) = &original_msg.content.msgtype {
                        if original_msg.sender == room.own_user_id() {
                            return;
                        }

                        let chat = MatrixService::new(room);
                        if let Err(e) = router
                            .route(&chat, &text_content.body, original_msg.sender.as_str())
                            .await
                        {
                            tracing::error!("Failed to route message: {}", e);
                        }
                    }
                }
            }
        });

        // Handle Invites
        client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
            if ev.content.membership == MembershipState::Invite {
                let _ = room.join().await;
            }
        });
    }

    // 6. Sync Loops
    let mut sync_handles = Vec::new();
    for client in clients {
        sync_handles.push(tokio::spawn(async move {
            client.sync(SyncSettings::default()).await
        }));
    }
    for handle in sync_handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Matrix sync failed: {e}"),
            Err(e) => tracing::error!("Matrix sync panic: {e}"),
        }
    }

    supervisor.stop().await;
    Ok(())
}
