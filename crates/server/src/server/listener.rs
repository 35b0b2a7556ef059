//! Binding and running the two listeners.
//!
//! - The plaintext listener is served by `axum::serve` with the redirect router.
//! - The secure listener runs its own accept loop: for each TCP connection it
//!   spawns a task that completes the TLS handshake and then serves HTTP/1.1 or
//!   HTTP/2 (by ALPN) over the encrypted stream with `hyper-util`.
//!
//! Both stop when the shared [`CancellationToken`] is cancelled.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use rustls::ServerConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::{
    redirect::{self, RedirectTarget},
    router,
    state::AppState,
};

/// Construction parameters for [`Server`].
#[derive(Clone)]
pub struct ServerSettings {
    /// Plaintext listener address. Port `0` picks a free port.
    pub http_addr: SocketAddr,
    /// TLS listener address. Port `0` picks a free port.
    pub https_addr: SocketAddr,
    /// Certificate, key, and protocol settings for the TLS listener.
    pub tls: Arc<ServerConfig>,
    /// Host used in redirects when a plaintext request names none.
    pub redirect_host: Option<String>,
}

/// Both listeners, bound and ready to serve.
pub struct Server {
    http: TcpListener,
    https: TcpListener,
    acceptor: TlsAcceptor,
    app: Router,
    redirect: Router,
}

impl Server {
    /// Bind both listeners and build their routers.
    ///
    /// The secure listener is bound first so redirects point at the port it
    /// actually got.
    ///
    /// # Errors
    ///
    /// Returns an error if either address cannot be bound.
    pub async fn bind(settings: ServerSettings, state: AppState) -> Result<Self> {
        let https = TcpListener::bind(settings.https_addr)
            .await
            .with_context(|| format!("failed to bind HTTPS listener on {}", settings.https_addr))?;
        let http = TcpListener::bind(settings.http_addr)
            .await
            .with_context(|| format!("failed to bind HTTP listener on {}", settings.http_addr))?;

        let https_port = https.local_addr()?.port();
        let target = RedirectTarget::new(https_port, settings.redirect_host);

        Ok(Self {
            http,
            https,
            acceptor: TlsAcceptor::from(settings.tls),
            app: router::build(state),
            redirect: redirect::router(target),
        })
    }

    /// Bound address of the plaintext redirect listener.
    pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
        self.http.local_addr()
    }

    /// Bound address of the TLS listener.
    pub fn https_addr(&self) -> std::io::Result<SocketAddr> {
        self.https.local_addr()
    }

    /// Serve both listeners until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the plaintext server fails.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let Self {
            http,
            https,
            acceptor,
            app,
            redirect,
        } = self;

        info!(addr = %http.local_addr()?, "http redirect listener accepting");
        let redirect_shutdown = shutdown.clone();
        let plaintext = async move {
            axum::serve(http, redirect)
                .with_graceful_shutdown(async move { redirect_shutdown.cancelled().await })
                .await
                .context("http redirect listener failed")
        };

        let secure = serve_tls(https, acceptor, app, shutdown);

        tokio::try_join!(plaintext, secure)?;
        info!("listeners stopped");
        Ok(())
    }
}

/// Accept loop for the TLS listener. Runs until `shutdown` is cancelled.
async fn serve_tls(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    app: Router,
    shutdown: CancellationToken,
) -> Result<()> {
    info!(addr = %listener.local_addr()?, "https listener accepting");

    loop {
        let (tcp_stream, peer_addr) = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    error!(error = %e, "accept error");
                    continue;
                }
            },
        };

        debug!(%peer_addr, "accepted TCP connection");
        let acceptor = acceptor.clone();
        let app = app.clone();
        let span = info_span!("tls_connection", conn_id = %Uuid::new_v4(), %peer_addr);
        tokio::spawn(
            async move {
                if let Err(e) = handle_connection(tcp_stream, acceptor, app).await {
                    debug!(error = %e, "connection closed with error");
                }
            }
            .instrument(span),
        );
    }
}

/// Complete the TLS handshake on one connection and serve HTTP over it.
async fn handle_connection(tcp: TcpStream, acceptor: TlsAcceptor, app: Router) -> Result<()> {
    let tls = acceptor
        .accept(tcp)
        .await
        .context("TLS handshake failed")?;
    debug!("TLS handshake complete");

    let service = hyper::service::service_fn(move |req: Request<Incoming>| {
        app.clone().oneshot(req)
    });

    auto::Builder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(tls), service)
        .await
        .map_err(|e| anyhow::anyhow!("failed to serve connection: {e}"))
}
