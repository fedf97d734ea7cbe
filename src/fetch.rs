use crate::error::{OptimizeError, Result};
use std::io::Read;
use std::time::Duration;

/// Where original image bytes come from.
pub trait ImageSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP GET with a fixed per-request timeout and a body size cap.
/// No retries: one failed request fails the descriptor.
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, max_bytes }
    }
}

impl ImageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(status, _) => OptimizeError::HttpStatus {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => OptimizeError::Fetch {
                url: url.to_string(),
                message: transport.to_string(),
            },
        })?;

        // Read one byte past the cap so an oversized body is detectable.
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_bytes + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| OptimizeError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if bytes.len() as u64 > self.max_bytes {
            return Err(OptimizeError::DownloadTooLarge {
                url: url.to_string(),
                limit: self.max_bytes,
            });
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_refused_is_fetch_failure() {
        // Port 1 on loopback is reserved and never listening in test environments.
        let fetcher = HttpFetcher::new(Duration::from_secs(2), 1024);
        let err = fetcher.fetch("http://127.0.0.1:1/img/a.png").unwrap_err();
        assert!(matches!(err, OptimizeError::Fetch { .. }));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_malformed_url_is_fetch_failure() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2), 1024);
        let err = fetcher.fetch("not a url").unwrap_err();
        assert!(err.is_fetch_failure());
    }
}
