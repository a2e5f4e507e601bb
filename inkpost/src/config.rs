//! Application settings, read from Rocket's configuration sources
//! (`Rocket.toml` and `ROCKET_*` environment variables).
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::image::ImageConfig;
use crate::routing::Fallback;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Upper bound on a single content store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout: u64,

    /// What to do with post slugs that were not known at launch.
    #[serde(default)]
    pub fallback: Fallback,

    /// Seconds a shared cache may serve a post page before revalidating.
    #[serde(default = "default_revalidate")]
    pub revalidate: u64,

    #[serde(default)]
    pub images: ImageConfig,
}

fn default_store_timeout() -> u64 {
    5000
}

fn default_revalidate() -> u64 {
    60
}

impl BlogConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout)
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        BlogConfig {
            store_timeout: default_store_timeout(),
            fallback: Fallback::default(),
            revalidate: default_revalidate(),
            images: ImageConfig::default(),
        }
    }
}
