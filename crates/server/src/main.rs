//! `checksum-svc` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP export).
//! 3. Load the TLS certificate and key.
//! 4. Freeze the payload and build [`AppState`].
//! 5. Bind the HTTPS listener and the plaintext redirect listener.
//! 6. Serve until Ctrl-C / SIGTERM.

mod config;
mod digest;
mod payload;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use config::Config;
use digest::Sha256Digester;
use payload::Payload;
use server::{state::AppState, Server, ServerSettings};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level, cfg.otlp_endpoint())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        http_port = cfg.http_port,
        https_port = cfg.https_port,
        "checksum-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. TLS material
    // -----------------------------------------------------------------------
    let tls = server::tls::load_server_config(&cfg.tls_cert_path, &cfg.tls_key_path)?;

    // -----------------------------------------------------------------------
    // 4. Application state
    // -----------------------------------------------------------------------
    let payload = Payload::new(cfg.payload_name.as_str(), cfg.payload_data.as_str());
    let state = AppState::new(payload, Arc::new(Sha256Digester));

    // -----------------------------------------------------------------------
    // 5. Listeners
    // -----------------------------------------------------------------------
    let settings = ServerSettings {
        http_addr: cfg.http_addr()?,
        https_addr: cfg.https_addr()?,
        tls,
        redirect_host: cfg.redirect_host.clone(),
    };
    let server = Server::bind(settings, state).await?;
    info!(
        http = %server.http_addr()?,
        https = %server.https_addr()?,
        "listening"
    );

    // -----------------------------------------------------------------------
    // 6. Serve until shutdown
    // -----------------------------------------------------------------------
    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));
    server.run(shutdown).await?;

    info!("checksum-svc stopped");
    telemetry::shutdown_telemetry();
    Ok(())
}

/// Cancel `token` on Ctrl-C or, on Unix, SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
    token.cancel();
}
