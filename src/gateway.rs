use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum_server::{Handle, tls_rustls::RustlsConfig};

use crate::{config::Config, infer::OpenAiClient};

pub mod dto;
pub mod handlers;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

async fn shutdown_on_ctrl_c(handle: Handle) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Shutdown requested, draining in-flight requests");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
        Err(error) => tracing::error!("Failed to listen for ctrl-c: {}", error),
    }
}

/// Serves the gateway over HTTPS until ctrl-c.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let client = OpenAiClient::new(&config.upstream).context("Failed to build upstream client")?;
    let router = handlers::build_router(Arc::new(client));

    let tls = RustlsConfig::from_pem_file(&config.tls.cert_path, &config.tls.key_path)
        .await
        .with_context(|| {
            format!(
                "Failed to load TLS certificate {} and key {}",
                config.tls.cert_path.display(),
                config.tls.key_path.display()
            )
        })?;

    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    tracing::info!("Starting server on https://{}", config.addr);
    axum_server::bind_rustls(config.addr, tls)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .context("Server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}
