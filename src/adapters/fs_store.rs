//! Flash file store adapter.
//!
//! Implements [`FileStore`] on top of `std::fs` rooted at one directory.
//! On the device that directory is the SPIFFS mount point, registered
//! through the ESP-IDF VFS so ordinary file I/O reaches flash; on the host
//! it is any writable directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::{FileStore, StoreError};

/// Where the SPIFFS partition is mounted.
pub const SPIFFS_BASE_PATH: &str = "/spiffs";

/// Mount the default SPIFFS partition at [`SPIFFS_BASE_PATH`], formatting
/// it if it cannot be mounted.
#[cfg(target_os = "espidf")]
pub fn mount_spiffs() -> Result<(), StoreError> {
    use esp_idf_sys::{ESP_OK, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register};

    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: `conf` and its strings outlive the call; called once at boot.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK {
        warn!("FsStore: SPIFFS mount failed ({})", ret);
        return Err(StoreError::NotMounted);
    }
    info!("FsStore: SPIFFS mounted at {}", SPIFFS_BASE_PATH);
    Ok(())
}

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// `root` is the mount point (or any directory on the host).  Nothing
    /// is touched until the first operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("FsStore: rooted at {}", root.display());
        Self { root }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileStore for FsStore {
    fn append(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(name))
            .map_err(|e| io_err("open for append", name, &e))?;
        f.write_all(data).map_err(|e| io_err("append", name, &e))
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err("read", name, &e)),
        }
    }

    fn overwrite(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        fs::write(self.path(name), data).map_err(|e| io_err("write", name, &e))
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("remove", name, &e)),
        }
    }
}

fn io_err(op: &str, name: &str, e: &std::io::Error) -> StoreError {
    warn!("FsStore: {} '{}' failed: {}", op, name, e);
    StoreError::Io
}
