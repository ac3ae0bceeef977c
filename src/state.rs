//! Durable cursor storage for the mentions feed.
//!
//! This module persists the id of the last fully processed mention to a
//! flat text file so that a restarted process resumes where the previous
//! one left off instead of reprocessing old mentions. The file holds
//! exactly one value: the id as decimal text, no delimiters.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Flat-file store for the last processed mention id.
///
/// The store is read at the start of every poll cycle and rewritten after
/// each processed mention, so a crash mid-cycle loses at most the
/// in-flight mention's completion status. A single sequential process is
/// the only accessor; no locking is needed.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates a store backed by the file at `path`. The file itself is
    /// only touched on the first `read` or `write`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Using state file {}", path.display());
        StateStore { path }
    }

    /// Reads the last processed mention id.
    ///
    /// A missing file is not an error: it is created empty and an empty
    /// string is returned, which the caller treats as "process all
    /// available mentions".
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The stored id, or `""` if nothing was ever written
    /// - `Err(io::Error)`: If the file exists but cannot be read, or the
    ///   empty file cannot be created
    pub fn read(&self) -> io::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(
                    "State file {} does not exist yet, creating it empty",
                    self.path.display()
                );
                fs::File::create(&self.path)?;
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrites the stored value with the given mention id, fully
    /// replacing any previous content.
    pub fn write(&self, id: &str) -> io::Result<()> {
        debug!("Persisting last mention id {}", id);
        fs::write(&self.path, id)
    }
}
