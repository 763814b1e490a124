use crate::error::Result;
use reqwest::blocking::Client;

/// Blocking GET of a URL's body
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Transport backed by a shared blocking `reqwest` client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
