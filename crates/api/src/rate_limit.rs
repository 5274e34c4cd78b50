//! Rate Limiting for Prediction Routes
//!
//! Per-peer-IP limits using tower_governor's GCRA implementation.

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config keyed by peer IP, with X-RateLimit-* headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether prediction routes are limited at all
    #[serde(default)]
    pub enabled: bool,
    /// Seconds to replenish one request slot
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            per_second: 1,
            burst_size: 20,
        }
    }
}

impl RateLimitConfig {
    /// Config with limiting turned off
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Build the governor config, or `None` when limiting is disabled.
///
/// The server must be run with
/// `into_make_service_with_connect_info::<SocketAddr>()` so the peer IP
/// is available to the key extractor.
pub fn create_governor_config(
    config: &RateLimitConfig,
) -> anyhow::Result<Option<Arc<DefaultGovernorConfig>>> {
    if !config.enabled {
        return Ok(None);
    }

    let governor = GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "invalid rate limit: per_second={} burst_size={}",
                config.per_second,
                config.burst_size
            )
        })?;

    Ok(Some(Arc::new(governor)))
}
