//! Gallery configuration supplied by the shell.
//!
//! Every field has a default, so a shell may send a partial JSON document.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use thiserror::Error;

use crate::capabilities::StorageKey;
use crate::gallery::LightboxEdge;
use crate::{
    BOOKMARK_STORAGE_KEY, DEFAULT_PAGE_SIZE, DEFAULT_PLACEHOLDER_COUNT, MAX_NUMBERED_PROBES,
    MAX_PLACEHOLDER_COUNT, PAGE_DELAY_MS, TOAST_DURATION_MS,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("could not parse configuration: {0}")]
    Parse(String),

    #[error("invalid configuration field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Where and how the shell should look for gallery assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub base_path: String,
    /// Highest `n` tried for `img{n}.{ext}`.
    pub max_numbered: u32,
    pub extensions: Vec<String>,
    /// Stems tried when no numbered asset exists.
    pub common_names: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_path: "photos".into(),
            max_numbered: 50,
            extensions: ["jpg", "jpeg", "png", "gif", "webp"]
                .map(String::from)
                .to_vec(),
            common_names: [
                "photo1", "photo2", "photo3", "image1", "image2", "image3", "pic1", "pic2",
                "pic3", "sample1", "sample2", "sample3", "demo1", "demo2", "demo3", "test1",
                "test2", "test3",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub page_size: NonZeroUsize,
    pub lightbox_edge: LightboxEdge,
    /// Generate placeholder entries when the source yields nothing.
    pub placeholder_fallback: bool,
    pub placeholder_count: u32,
    pub placeholder_seed: u64,
    pub bookmark_key: String,
    pub toast_duration_ms: u64,
    /// Delay the shell waits before delivering a requested page.
    pub page_delay_ms: u64,
    pub probe: ProbeConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            lightbox_edge: LightboxEdge::Clamp,
            placeholder_fallback: true,
            placeholder_count: DEFAULT_PLACEHOLDER_COUNT,
            placeholder_seed: 0,
            bookmark_key: BOOKMARK_STORAGE_KEY.into(),
            toast_duration_ms: TOAST_DURATION_MS,
            page_delay_ms: PAGE_DELAY_MS,
            probe: ProbeConfig::default(),
        }
    }
}

impl GalleryConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholder_count > MAX_PLACEHOLDER_COUNT {
            return Err(ConfigError::Invalid {
                field: "placeholder_count",
                reason: format!("{} exceeds maximum of {MAX_PLACEHOLDER_COUNT}", self.placeholder_count),
            });
        }

        StorageKey::new(self.bookmark_key.as_str()).map_err(|e| ConfigError::Invalid {
            field: "bookmark_key",
            reason: e.to_string(),
        })?;

        if self.probe.max_numbered > MAX_NUMBERED_PROBES {
            return Err(ConfigError::Invalid {
                field: "probe.max_numbered",
                reason: format!("{} exceeds maximum of {MAX_NUMBERED_PROBES}", self.probe.max_numbered),
            });
        }

        if self.probe.extensions.is_empty() {
            return Err(ConfigError::Invalid {
                field: "probe.extensions",
                reason: "at least one extension is required".into(),
            });
        }

        if let Some(bad) = self
            .probe
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(&['.', '/'][..]))
        {
            return Err(ConfigError::Invalid {
                field: "probe.extensions",
                reason: format!("'{bad}' is not a bare file extension"),
            });
        }

        Ok(())
    }
}
