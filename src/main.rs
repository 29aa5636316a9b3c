#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use chess_arbiter_server::config;
use chess_arbiter_server::logging;
use chess_arbiter_server::server::GameServer;
use chess_arbiter_server::users::InMemoryUserStore;
use chess_arbiter_server::websocket;

/// Chess Arbiter -- authoritative WebSocket server for multiplayer chess
#[derive(Parser, Debug)]
#[command(name = "chess-arbiter-server")]
#[command(about = "An authoritative, in-memory WebSocket server for real-time multiplayer chess")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from config.json if present; otherwise use code
    // defaults with env overrides.
    let cfg = config::load();

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if cli.validate_config {
        println!("Configuration validation passed");
        println!();
        println!("Configuration summary:");
        println!("  Port: {}", cfg.port);
        println!("  Forfeit window: {}s", cfg.server.forfeit_window_secs);
        println!("  Default ELO: {}", cfg.server.default_elo);
        println!("  Room code length: {}", cfg.protocol.room_code_length);
        println!(
            "  Chat message limit: {} chars",
            cfg.protocol.max_chat_message_length
        );
        return Ok(());
    }

    logging::init_with_config(&cfg.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "Starting Chess Arbiter server");

    let user_store = Arc::new(InMemoryUserStore::new());
    let server = GameServer::new(cfg.server.clone(), cfg.protocol.clone(), user_store);

    // Background sweep for abandoned rooms.
    let sweeper = Arc::clone(&server);
    tokio::spawn(async move {
        sweeper.room_sweeper_task().await;
    });

    let router = websocket::create_router(&cfg.cors_origins).with_state(Arc::clone(&server));
    let make_service = router.into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        cors_origins = %cfg.cors_origins,
        "Server started - WebSocket protocol: /ws, Metrics: /metrics"
    );

    axum::serve(listener, make_service).await?;

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn test_cli_default_no_flags() {
        let cli = Cli::try_parse_from(["chess-arbiter-server"]).unwrap();
        assert!(!cli.validate_config);
        assert!(!cli.print_config);
    }

    #[test]
    fn test_cli_validate_config_flags() {
        let cli = Cli::try_parse_from(["chess-arbiter-server", "--validate-config"]).unwrap();
        assert!(cli.validate_config);
        let cli = Cli::try_parse_from(["chess-arbiter-server", "-c"]).unwrap();
        assert!(cli.validate_config);
    }

    #[test]
    fn test_cli_validate_and_print_config_conflict() {
        let result =
            Cli::try_parse_from(["chess-arbiter-server", "--validate-config", "--print-config"]);
        assert!(result.is_err());
    }
}
