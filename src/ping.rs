/// Keeps another service warm by requesting it on demand.
pub struct Pinger {
    client: reqwest::Client,
    url: String,
}

impl Pinger {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET, no retry. Any HTTP response counts as reachable; only
    /// transport errors fail. Returns the status code received.
    pub async fn ping(&self) -> Result<u16, String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| format!("Ping request failed: {e}"))?;

        Ok(resp.status().as_u16())
    }
}
