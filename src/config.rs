//! Client configuration, loaded from JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default size of the buffer handed to the engine for text results.
pub const DEFAULT_TEXT_BUFFER: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Library file name, with or without extension
    pub library_name: String,
    /// Directory holding the library (current directory if unset)
    pub library_dir: Option<PathBuf>,
    pub license_name: String,
    /// Directory holding the license (library directory if unset)
    pub license_dir: Option<PathBuf>,
    /// Capacity of text result buffers, in bytes
    pub text_buffer_size: usize,
    /// Maximum calculation step applied after each open
    pub step: Option<f64>,
    /// Per-step timeout in seconds applied after each open (0 disables)
    pub timeout: Option<i32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            library_name: "nl5_dll".to_string(),
            library_dir: None,
            license_name: "nl5.nll".to_string(),
            license_dir: None,
            text_buffer_size: DEFAULT_TEXT_BUFFER,
            step: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
