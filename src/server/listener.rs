use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::files::DocumentRoot;
use crate::http::connection::Connection;
use crate::server::access_log::AccessLog;
use crate::server::ServerContext;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServerContext>,
}

impl Server {
    /// Prepares the document root and access log, then binds the listener.
    ///
    /// Every failure here is fatal to startup.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let root = DocumentRoot::open_or_create(&cfg.static_files.root).with_context(|| {
            format!("failed to prepare document root {}", cfg.static_files.root.display())
        })?;

        let access_log = AccessLog::open(&cfg.access_log.path).with_context(|| {
            format!("failed to open access log {}", cfg.access_log.path.display())
        })?;

        let ctx = ServerContext {
            root,
            access_log: Arc::new(access_log),
            idle_timeout: cfg.server.idle_timeout(),
            max_header_bytes: cfg.server.max_header_bytes,
        };

        Self::bind_with(&cfg.server.listen_addr, ctx).await
    }

    /// Binds with an already assembled context.
    pub async fn bind_with(addr: &str, ctx: ServerContext) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        Ok(Self {
            listener,
            ctx: Arc::new(ctx),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, one task per connection.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.local_addr()?;
        info!(
            addr = %addr,
            root = %self.ctx.root.path().display(),
            "Listening"
        );

        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    // Usually transient (e.g. out of file descriptors)
                    tracing::warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            tracing::debug!("Accepted connection from {}", peer);

            let ctx = Arc::clone(&self.ctx);
            tokio::spawn(async move {
                let mut conn = Connection::new(socket, peer, ctx);
                if let Err(e) = conn.run().await {
                    tracing::warn!("Connection error from {}: {}", peer, e);
                }
            });
        }
    }
}
