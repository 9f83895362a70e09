use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::image::{ImageOptions, ShortPayload};
use crate::wav::HeaderMode;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub wav: WavConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    pub fn image_options(&self) -> ImageOptions {
        ImageOptions {
            header_mode: self.wav.header,
            short_payload: self.wav.short_payload,
            atomic: self.output.atomic,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct WavConfig {
    pub header: HeaderMode,
    pub short_payload: ShortPayload,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Stage outputs in a temporary file and rename them on success
    pub atomic: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { atomic: true }
    }
}
