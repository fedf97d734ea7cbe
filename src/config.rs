use crate::constants::{
    BASE_URL_ENV, DEFAULT_QUALITY, DEFAULT_TIMEOUT_SECS, MAX_DOWNLOAD_SIZE, MAX_QUALITY,
    MIN_QUALITY,
};
use crate::error::{OptimizeError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Everything one optimization run needs, resolved up front and passed
/// explicitly into the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub quality: u8,
    pub timeout: Duration,
    pub max_download_size: u64,
}

impl RunConfig {
    pub fn new(
        base_url: String,
        output_dir: PathBuf,
        quality: Option<u8>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(OptimizeError::MissingBaseUrl);
        }

        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(OptimizeError::InvalidQuality(quality));
        }

        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(OptimizeError::InvalidTimeout);
        }

        Ok(Self {
            base_url: normalize_base_url(base_url),
            output_dir,
            quality,
            timeout: Duration::from_secs(timeout_secs),
            max_download_size: MAX_DOWNLOAD_SIZE,
        })
    }

    /// Joins the base URL and a descriptor path with exactly one `/`.
    pub fn resolve_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Picks the base URL from the command line, falling back to `BASE_URL`
/// from the environment or a `.env` file in the working directory.
pub fn resolve_base_url(cli_value: Option<String>) -> Result<String> {
    if let Some(url) = cli_value.filter(|u| !u.trim().is_empty()) {
        return Ok(url);
    }

    dotenvy::dotenv().ok();
    std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|u| !u.trim().is_empty())
        .ok_or(OptimizeError::MissingBaseUrl)
}
