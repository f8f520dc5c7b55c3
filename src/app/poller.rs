//! Command poller.
//!
//! Fetches `{api_base}/bot{token}/getUpdates?timeout=1` and extracts status
//! requests.  Every update carries a `date` (Unix seconds) from the sink;
//! the poller remembers the newest one it has seen and ignores anything
//! not strictly newer, so the same command never fires twice.
//!
//! Only the fields below are read; everything else in the payload is
//! ignored.
//!
//! ```json
//! {"ok":true,"result":[{"update_id":1,"message":{"date":1710009907,
//!   "text":"status","reply_to_message":{...}}}]}
//! ```

use log::{debug, info};
use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::config::SystemConfig;
use crate::error::{Error, Result};

use super::commands::AppCommand;
use super::ports::SinkTransport;

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    date: i64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    reply_to_message: Option<IgnoredAny>,
}

pub struct CommandPoller {
    updates_url: String,
    prime_url: String,
    require_reply: bool,
    last_date: i64,
    primed: bool,
}

impl CommandPoller {
    pub fn new(cfg: &SystemConfig) -> Self {
        let base = format!("{}/bot{}/getUpdates", cfg.api_base, cfg.bot_token);
        Self {
            updates_url: format!("{base}?timeout=1"),
            prime_url: format!("{base}?offset=-1"),
            require_reply: cfg.commands_require_reply,
            last_date: 0,
            primed: false,
        }
    }

    pub fn last_date(&self) -> i64 {
        self.last_date
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Read the newest pending update once and mark it processed, so
    /// commands sent while the device was off are not replayed.
    pub fn prime(&mut self, http: &mut impl SinkTransport) -> Result<()> {
        let body = fetch(http, &self.prime_url)?;
        let parsed: UpdatesResponse = serde_json::from_str(&body)?;
        let newest = parsed
            .result
            .iter()
            .filter_map(|u| u.message.as_ref().map(|m| m.date))
            .max();
        if let Some(date) = newest {
            self.last_date = self.last_date.max(date);
        }
        self.primed = true;
        info!("Poller: primed, ignoring updates up to {}", self.last_date);
        Ok(())
    }

    /// One poll.  Returns the commands found in updates newer than the
    /// last one processed.
    pub fn poll(&mut self, http: &mut impl SinkTransport) -> Result<Vec<AppCommand>> {
        let body = fetch(http, &self.updates_url)?;
        self.commands_in(&body)
    }

    /// Parse a `getUpdates` body and advance the processed-date watermark.
    pub fn commands_in(&mut self, body: &str) -> Result<Vec<AppCommand>> {
        let parsed: UpdatesResponse = serde_json::from_str(body)?;
        let mut out = Vec::new();
        for msg in parsed.result.into_iter().filter_map(|u| u.message) {
            if self.require_reply && msg.reply_to_message.is_none() {
                continue;
            }
            if msg.date <= self.last_date {
                continue;
            }
            self.last_date = msg.date;
            match msg.text.as_deref().and_then(AppCommand::parse) {
                Some(cmd) => out.push(cmd),
                None => debug!("Poller: ignoring update at {}", msg.date),
            }
        }
        Ok(out)
    }
}

fn fetch(http: &mut impl SinkTransport, url: &str) -> Result<String> {
    let resp = http.get(url)?;
    if resp.status != 200 {
        return Err(Error::MalformedInboundResponse);
    }
    Ok(resp.body)
}
