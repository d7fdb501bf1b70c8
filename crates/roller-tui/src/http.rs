//! HTTP client for the roller daemon.

use roller_proto::feed::WATERMARK_NONE;
use roller_proto::records::RollRecord;

/// Outcome of one poll cycle.  Failures carry a message for the log but are
/// never surfaced to the user — the cycle is skipped and the next tick tries
/// again.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Records(Vec<RollRecord>),
    Empty,
    Failed(String),
}

#[derive(Clone)]
pub struct RollClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
}

impl RollClient {
    pub fn new(base_url: &str, user: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
        }
    }

    /// Fetch records newer than `watermark`.  The sentinel watermark asks
    /// for the default most-recent page instead.
    pub async fn poll_since(&self, watermark: i64) -> PollOutcome {
        let url = if watermark == WATERMARK_NONE {
            format!("{}/rolls.json", self.base_url)
        } else {
            format!("{}/rolls.json?since={}", self.base_url, watermark)
        };

        match self.fetch_records(&url).await {
            Ok(records) if records.is_empty() => PollOutcome::Empty,
            Ok(records) => PollOutcome::Records(records),
            Err(e) => PollOutcome::Failed(e.to_string()),
        }
    }

    async fn fetch_records(&self, url: &str) -> anyhow::Result<Vec<RollRecord>> {
        let records = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(records)
    }

    /// Submit a dice-notation request; the daemon rolls it and returns the
    /// recorded result.  Rejections (bad notation) come back as the server's
    /// message text.
    pub async fn submit_roll(&self, request: &str) -> anyhow::Result<RollRecord> {
        let url = format!(
            "{}/roll/{}?user={}",
            self.base_url,
            encode_path_segment(request),
            self.user
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", message.trim());
        }
        Ok(response.json().await?)
    }
}

/// Percent-encode a path segment.  Roll requests contain `|`, which is not
/// valid raw in a request path.
fn encode_path_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_' | b'.' | b'~' | b'+' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("2d20"), "2d20");
        assert_eq!(encode_path_segment("2d20+3|15-"), "2d20+3%7C15-");
        assert_eq!(encode_path_segment("a b"), "a%20b");
    }
}
