use crate::config::AppConfig;
use crate::http::build_router;
use crate::orchestrator::Orchestrator;
use anyhow::{bail, Context, Result};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

/// Boot the HTTP server and block until it exits.
pub async fn serve_command() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    let bind = config.http_bind.clone();
    let orchestrator =
        Arc::new(Orchestrator::new(config).context("failed to initialize orchestrator")?);
    let router = build_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, "listening");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}

/// Clear in-memory state and, if `OPTIMIZATION_DB_DSN` is set, truncate the
/// persistence mirror. Runs against its own orchestrator instance, so it
/// only reaches the persisted tables of a separately running server, not
/// that server's in-memory state.
pub async fn debug_reset_command() -> Result<()> {
    let config = AppConfig::from_env();
    let orchestrator =
        Orchestrator::new(config).context("failed to initialize orchestrator")?;
    orchestrator.debug_reset();
    println!("state cleared");
    Ok(())
}

/// One-shot liveness check: a bare HTTP/1.1 GET against `/internal/health`,
/// hand-rolled over a `TcpStream` rather than pulling in an HTTP client
/// crate for a single request.
pub async fn health_command(addr: &str) -> Result<()> {
    let request = format!("GET /internal/health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");

    let mut stream =
        TcpStream::connect(addr).with_context(|| format!("failed to connect to {addr}"))?;
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.write_all(request.as_bytes())?;

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .context("failed to read response")?;

    let status_line = response.lines().next().unwrap_or_default();
    if status_line.contains("200") {
        println!("ok: {status_line}");
        Ok(())
    } else {
        bail!("unhealthy: {status_line}");
    }
}
