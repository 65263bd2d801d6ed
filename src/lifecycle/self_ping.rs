//! Self-ping keepalive.
//!
//! Some hosts idle a service that receives no traffic; pinging our own
//! health route on a timer keeps it awake. Targets the configured base URL;
//! when `BASE_URL` is unset that is `http://localhost:<port>`.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

use crate::config::SelfPingConfig;
use crate::upstream::UpstreamClient;

#[derive(Deserialize)]
struct HealthBody {
    message: String,
}

pub struct SelfPing {
    client: UpstreamClient,
    target: String,
    config: SelfPingConfig,
}

impl SelfPing {
    pub fn new(client: UpstreamClient, base_url: &str, config: SelfPingConfig) -> Self {
        Self {
            client,
            target: base_url.to_string(),
            config,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Self-ping disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            target = %self.target,
            "Self-ping starting"
        );

        let interval = Duration::from_secs(self.config.interval_secs);
        let mut ticker = time::interval_at(Instant::now() + interval, interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.ping().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Self-ping received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Ping once; returns whether the service answered successfully.
    pub async fn ping(&self) -> bool {
        match self.client.get(&self.target).await {
            Ok(response) => {
                let message = serde_json::from_str::<HealthBody>(&response.body)
                    .map(|b| b.message)
                    .unwrap_or(response.body);
                tracing::info!("Server pinged successfully: {}", message);
                true
            }
            Err(e) => {
                tracing::error!("Error pinging server: {}", e);
                false
            }
        }
    }
}
