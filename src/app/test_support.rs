//! In-memory port doubles shared by the unit tests in `app`.

use std::collections::HashMap;

use super::events::AppEvent;
use super::ports::{EventSink, FileStore, HttpResponse, SinkTransport, StoreError, TransportError};

#[derive(Default)]
pub struct MemStore {
    pub files: HashMap<String, Vec<u8>>,
    pub fail_append: bool,
    pub fail_remove: bool,
}

impl FileStore for MemStore {
    fn append(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        if self.fail_append {
            return Err(StoreError::Io);
        }
        self.files.entry(name.to_owned()).or_default().extend_from_slice(data);
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.files.get(name).cloned())
    }

    fn overwrite(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        self.files.insert(name.to_owned(), data.to_vec());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        if self.fail_remove {
            return Err(StoreError::Io);
        }
        self.files.remove(name);
        Ok(())
    }
}

/// Records every request; answers POSTs with `post_status` and GETs with
/// the queued responses in order (then 200 with an empty result).
pub struct ScriptedHttp {
    pub posts: Vec<(String, String)>,
    pub gets: Vec<String>,
    pub post_status: Result<u16, TransportError>,
    pub get_replies: Vec<Result<HttpResponse, TransportError>>,
}

impl Default for ScriptedHttp {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            gets: Vec::new(),
            post_status: Ok(200),
            get_replies: Vec::new(),
        }
    }
}

impl SinkTransport for ScriptedHttp {
    fn post_form(&mut self, url: &str, body: &str) -> Result<u16, TransportError> {
        self.posts.push((url.to_owned(), body.to_owned()));
        self.post_status
    }

    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.gets.push(url.to_owned());
        if self.get_replies.is_empty() {
            return Ok(HttpResponse { status: 200, body: r#"{"ok":true,"result":[]}"#.into() });
        }
        self.get_replies.remove(0)
    }
}

#[derive(Default)]
pub struct VecSink(pub Vec<AppEvent>);

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.push(event.clone());
    }
}
