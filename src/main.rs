use mcp_transcript_server::config::ServerConfig;
use mcp_transcript_server::http;
use mcp_transcript_server::server::McpServer;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Stdout is reserved for protocol messages in stdio mode; log to stderr
    // unconditionally so both modes behave the same.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-transcript-server: configuration error: {e}");
            std::process::exit(1);
        }
    };

    let result = if std::env::args().any(|arg| arg == "--stdio") {
        let mut server = McpServer::new(config);
        server.run().await
    } else {
        http::serve(config).await
    };

    if let Err(e) = result {
        eprintln!("mcp-transcript-server: fatal error: {e}");
        std::process::exit(1);
    }
}
