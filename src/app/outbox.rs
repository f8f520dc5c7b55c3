//! Outbound message queue.
//!
//! A newline-delimited text file on the [`FileStore`], one pending message
//! per line, oldest first.  Messages leave the queue only in bulk: either
//! all at once through [`Outbox::drain_all`] or the oldest few at a time
//! through [`Outbox::trim`].
//!
//! The queue never holds state in RAM; every call reads the file, so a
//! reboot loses nothing that reached flash.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::error::{Error, Result};

use super::ports::FileStore;

pub struct Outbox {
    file: heapless::String<32>,
    max_lines: usize,
    trim_lines: usize,
}

impl Outbox {
    pub fn new(cfg: &SystemConfig) -> Self {
        Self {
            file: cfg.queue_file.clone(),
            max_lines: usize::from(cfg.queue_max_lines).max(1),
            trim_lines: usize::from(cfg.queue_trim_lines).max(1),
        }
    }

    /// Append `message` (one line per embedded `\n`) and enforce the bound.
    ///
    /// A failed append loses the message.  A failed trim does not: the
    /// message is already on flash and the next enqueue retries the trim.
    pub fn enqueue(&self, store: &mut impl FileStore, message: &str) -> Result<()> {
        let mut data = Vec::with_capacity(message.len() + 1);
        data.extend_from_slice(message.as_bytes());
        data.push(b'\n');
        store.append(&self.file, &data)?;

        if let Err(e) = self.trim(store) {
            warn!("Outbox: trim after enqueue failed: {}", e);
        }
        Ok(())
    }

    /// Drop the oldest `trim_lines` lines for as long as the queue holds at
    /// least `max_lines`.  Returns the number of lines removed.
    pub fn trim(&self, store: &mut impl FileStore) -> Result<usize> {
        let lines = self.lines(store)?;
        let mut keep_from = 0;
        while lines.len().saturating_sub(keep_from) >= self.max_lines {
            keep_from += self.trim_lines;
        }
        if keep_from == 0 {
            return Ok(0);
        }
        let keep_from = keep_from.min(lines.len());

        store.overwrite(&self.file, &join_lines(&lines[keep_from..]))?;
        info!(
            "Outbox: trimmed {} oldest line(s), {} remain",
            keep_from,
            lines.len() - keep_from
        );
        Ok(keep_from)
    }

    /// Take every queued line, oldest first, and empty the queue.
    ///
    /// Does nothing while offline.  The file is removed before the lines are
    /// handed back; if the removal fails the lines stay queued and nothing
    /// is returned, so a batch is never delivered twice from one drain.
    pub fn drain_all(&self, online: bool, store: &mut impl FileStore) -> Result<Vec<String>> {
        if !online {
            return Err(Error::NetworkUnavailable);
        }
        let lines = self.lines(store)?;
        if lines.is_empty() {
            return Ok(lines);
        }
        store.remove(&self.file)?;
        info!("Outbox: drained {} line(s)", lines.len());
        Ok(lines)
    }

    /// Current contents without modifying the queue.
    pub fn lines(&self, store: &impl FileStore) -> Result<Vec<String>> {
        let Some(bytes) = store.read(&self.file)? else {
            return Ok(Vec::new());
        };
        Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect())
    }

    pub fn len(&self, store: &impl FileStore) -> Result<usize> {
        self.lines(store).map(|l| l.len())
    }

    pub fn is_empty(&self, store: &impl FileStore) -> Result<bool> {
        self.len(store).map(|n| n == 0)
    }
}

fn join_lines(lines: &[String]) -> Vec<u8> {
    let mut out = Vec::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    out
}
