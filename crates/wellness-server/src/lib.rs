//! HTTP server assembly for the wellness challenge.
//!
//! Turns a [`ServerConfig`] into a configured [`WellnessService`] and mounts
//! the JSON API under `/api` next to a `/health` probe.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use wellness_core::{admin::AdminSeed, store::WellnessStore};
use wellness_service::{Backoff, ReadCache, RetryPolicy, WellnessService};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `WELLNESS_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Admins granted on top of the built-in bootstrap list.
  pub bootstrap_admins:  Vec<String>,
  pub retry_attempts:    u32,
  pub retry_delay_ms:    u64,
  /// Double the delay after each failed attempt instead of keeping it fixed.
  pub retry_exponential: bool,
  pub cache_ttl_secs:    u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              8080,
      store_path:        PathBuf::from("wellness.db"),
      bootstrap_admins:  Vec::new(),
      retry_attempts:    3,
      retry_delay_ms:    500,
      retry_exponential: false,
      cache_ttl_secs:    60,
    }
  }
}

impl ServerConfig {
  pub fn retry_policy(&self) -> RetryPolicy {
    let delay = Duration::from_millis(self.retry_delay_ms);
    let backoff = if self.retry_exponential {
      Backoff::Exponential { initial: delay, max: delay * 16 }
    } else {
      Backoff::Fixed(delay)
    };
    RetryPolicy { max_attempts: self.retry_attempts.max(1), backoff }
  }

  pub fn read_cache(&self) -> ReadCache { ReadCache::new(Duration::from_secs(self.cache_ttl_secs)) }

  pub fn admin_seed(&self) -> AdminSeed { AdminSeed::with_bootstrap(&self.bootstrap_admins) }

  /// A service over `store` with this configuration's policies applied.
  pub fn build_service<S: WellnessStore>(&self, store: Arc<S>) -> WellnessService<S> {
    WellnessService::new(store)
      .with_retry_policy(self.retry_policy())
      .with_cache(self.read_cache())
      .with_admin_seed(self.admin_seed())
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: `/api/*`, `/health`, and request tracing.
pub fn router<S>(service: Arc<WellnessService<S>>) -> Router
where
  S: WellnessStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", wellness_api::api_router(service))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }
