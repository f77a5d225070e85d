//! Save files using `MessagePack`.
//!
//! A save is the list of [`SavedInstance`]s plus the highest serial issued,
//! so a restored [`SerialCounter`] never reuses one.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use templar_engine::Template;
use templar_foundation::{Error, ErrorKind, Result};
use tracing::debug;

use crate::instance::{Instance, SavedInstance};
use crate::serial::SerialCounter;

/// A complete save.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Highest serial issued when the save was made.
    pub last_serial: u64,
    /// Saved entities, in save order.
    pub instances: Vec<SavedInstance>,
}

impl SaveFile {
    /// Creates an empty save that records the counter's position.
    #[must_use]
    pub fn new(counter: &SerialCounter) -> Self {
        Self {
            last_serial: counter.current(),
            instances: Vec::new(),
        }
    }

    /// Appends an entity.
    pub fn push<T: Template>(&mut self, instance: &Instance<T>) {
        self.last_serial = self.last_serial.max(instance.serial());
        self.instances.push(instance.serialize());
    }

    /// Returns a counter positioned after every serial in this save.
    #[must_use]
    pub fn counter(&self) -> SerialCounter {
        let counter = SerialCounter::starting_at(self.last_serial);
        for saved in &self.instances {
            counter.observe(saved.serial);
        }
        counter
    }

    /// Serializes the save to bytes.
    ///
    /// Uses named serialization to preserve struct field names.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
    }

    /// Deserializes a save from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
    }

    /// Writes the save to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to,
    /// or if serialization fails.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| io_error("create", path, &e))?;

        let mut writer = BufWriter::new(file);
        let bytes = self.to_bytes()?;
        writer
            .write_all(&bytes)
            .map_err(|e| io_error("write to", path, &e))?;
        writer.flush().map_err(|e| io_error("flush", path, &e))?;

        debug!(
            path = %path.display(),
            instances = self.instances.len(),
            bytes = bytes.len(),
            "saved game"
        );
        Ok(())
    }

    /// Reads a save from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if deserialization fails.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| io_error("open", path, &e))?;

        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| io_error("read", path, &e))?;

        let save = Self::from_bytes(&bytes)?;
        debug!(
            path = %path.display(),
            instances = save.instances.len(),
            "loaded game"
        );
        Ok(save)
    }
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::IoError(format!(
        "failed to {action} file '{}': {e}",
        path.display()
    )))
}
