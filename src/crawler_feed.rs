//! HTTP feed crawler.
//!
//! Pulls a domain's records from a JSON feed over HTTP. The URL is a
//! template with `{year}` and `{date}` placeholders expanded from the
//! partition being refreshed. The client carries the configured timeout, so
//! a dead feed stalls a question for at most that long.

use std::time::Duration;

use serde_json::Value;

use crate::crawler::Crawler;
use crate::error::FetchError;
use crate::models::Partition;

pub struct FeedCrawler {
    url_template: String,
    client: reqwest::blocking::Client,
}

impl FeedCrawler {
    pub fn new(url_template: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(FeedCrawler {
            url_template: url_template.to_string(),
            client,
        })
    }

    fn url_for(&self, partition: &Partition) -> String {
        match partition {
            Partition::Global => self.url_template.clone(),
            Partition::Year(y) => self.url_template.replace("{year}", &y.to_string()),
            Partition::Date(d) => self
                .url_template
                .replace("{date}", &d.format("%Y%m%d").to_string())
                .replace("{year}", &d.format("%Y").to_string()),
        }
    }
}

impl Crawler for FeedCrawler {
    fn name(&self) -> String {
        format!("feed:{}", self.url_template)
    }

    /// GET the expanded URL. Non-2xx statuses and bodies that are not JSON
    /// are fetch failures, so a misbehaving feed can never replace a good
    /// snapshot with garbage.
    fn fetch(&self, partition: &Partition) -> Result<String, FetchError> {
        let url = self.url_for(partition);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text()?;
        serde_json::from_str::<Value>(&body).map_err(FetchError::Body)?;
        Ok(body)
    }
}
