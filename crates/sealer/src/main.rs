//! `envelope-sealer`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise tracing (JSON logs, optional OTLP export).
//! 3. Resolve AWS SDK configuration and build the S3 client.
//! 4. Wire the KMS key provider and S3 object store into a [`JobRunner`].
//! 5. Build the Axum router and start the HTTP server.

mod aws;
mod config;
mod job;
mod server;
mod storage;
mod telemetry;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use aws::{AwsClients, KmsKeyProvider, S3ObjectStore};
use config::Config;
use job::JobRunner;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "envelope-sealer starting"
    );

    // -----------------------------------------------------------------------
    // 3. AWS clients
    // -----------------------------------------------------------------------
    let aws = AwsClients::init(cfg.s3_endpoint_url.as_deref()).await;

    // -----------------------------------------------------------------------
    // 4. Job runner
    // -----------------------------------------------------------------------
    let store = Arc::new(S3ObjectStore::new(aws.s3.clone(), cfg.max_object_bytes));
    let key_provider = Arc::new(KmsKeyProvider::new(aws.sdk_config.clone()));
    let runner = JobRunner::new(store, key_provider, &cfg);

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(AppState::new(runner), cfg.request_timeout());

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod test_support {
    use std::sync::{Arc, OnceLock};
    use std::time::Duration;

    use axum_test::TestServer;
    use envelope::MockKeyProvider;
    use rsa::{rand_core::OsRng, RsaPrivateKey};

    use crate::config::Config;
    use crate::job::JobRunner;
    use crate::server::{router, state::AppState};
    use crate::storage::MockObjectStore;

    /// Shared 2048-bit key pair; generating one per test is slow in debug builds.
    pub fn rsa_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).unwrap())
    }

    /// State whose collaborators panic if called.
    pub fn idle_state() -> AppState {
        let runner = JobRunner::new(
            Arc::new(MockObjectStore::new()),
            Arc::new(MockKeyProvider::new()),
            &Config::default(),
        );
        AppState::new(runner)
    }

    /// Test server over [`idle_state`].
    pub fn idle_server() -> TestServer {
        TestServer::new(router::build(idle_state(), Duration::from_secs(5))).unwrap()
    }
}
