//! HTTP(S) resources, read with a blocking `ureq` agent.

use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

use crate::resource::Resource;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// A read-only resource addressed by an `http://` or `https://` URL.
#[derive(Clone)]
pub struct UrlResource {
    url: String,
    agent: ureq::Agent,
}

impl UrlResource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_agent(url, default_agent())
    }

    pub fn with_agent(url: impl Into<String>, agent: ureq::Agent) -> Self {
        Self {
            url: url.into(),
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Agent with bounded connect and overall timeouts.
pub fn default_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .timeout_connect(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
}

impl Resource for UrlResource {
    fn location(&self) -> &str {
        &self.url
    }

    fn description(&self) -> String {
        format!("URL [{}]", self.url)
    }

    fn exists(&self) -> bool {
        match self.agent.head(&self.url).call() {
            Ok(response) => response.status() < 300,
            Err(e) => {
                tracing::debug!("HEAD {} failed: {}", self.url, e);
                false
            }
        }
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + '_>> {
        let response = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(Box::new(response.into_reader()))
    }
}

impl fmt::Debug for UrlResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlResource").field("url", &self.url).finish()
    }
}
