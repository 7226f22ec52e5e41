//! Cart Persistence
//!
//! Saving a cart is optional and strictly secondary to the in-memory state:
//! a failed write is logged and otherwise ignored. [`SnapshotWriter`] moves
//! the file IO onto a background thread so cart mutations never wait on disk.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cart::{CartEvent, CartLine, CartObserver, CartSnapshot};

/// Errors raised while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error reading or writing the snapshot file
    #[error("Snapshot IO failed: {0}")]
    Io(#[from] std::io::Error),

    /// YAML encoding or decoding error
    #[error("Snapshot YAML is invalid: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Write `snapshot` to `path` as YAML.
///
/// The file is written next to `path` first and then renamed over it, so a
/// reader never sees a half-written snapshot.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be encoded or written.
pub fn save_snapshot(
    path: impl AsRef<Path>,
    snapshot: &CartSnapshot,
) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let yaml = serde_norway::to_string(snapshot)?;

    let staging = path.with_extension("yml.partial");
    fs::write(&staging, yaml)?;
    fs::rename(&staging, path)?;

    Ok(())
}

/// Read a snapshot written by [`save_snapshot`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<CartSnapshot, PersistenceError> {
    let contents = fs::read_to_string(path)?;

    Ok(serde_norway::from_str(&contents)?)
}

/// Cart observer that persists every change on a background thread.
///
/// Only the latest queued snapshot is written when the writer falls behind.
#[derive(Debug)]
pub struct SnapshotWriter {
    path: PathBuf,
    sender: Option<Sender<CartSnapshot>>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    /// Start a writer thread that saves snapshots to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let (sender, receiver) = mpsc::channel();

        let thread_path = path.clone();
        let handle = thread::Builder::new()
            .name("cart-snapshot-writer".to_string())
            .spawn(move || write_loop(&thread_path, &receiver))?;

        Ok(Self {
            path,
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Path snapshots are written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write any queued snapshot and stop the writer thread.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender ends the write loop once the queue is drained.
        self.sender.take();

        let panicked = self
            .handle
            .take()
            .is_some_and(|handle| handle.join().is_err());

        if panicked {
            warn!(path = %self.path.display(), "cart snapshot writer panicked");
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl CartObserver for SnapshotWriter {
    fn cart_changed(
        &mut self,
        event: &CartEvent,
        lines: &[CartLine<'_>],
        currency: &'static Currency,
    ) {
        let Some(sender) = &self.sender else {
            return;
        };

        if sender.send(CartSnapshot::from_lines(lines, currency)).is_err() {
            warn!(
                path = %self.path.display(),
                ?event,
                "cart snapshot writer is gone; change not persisted"
            );
        }
    }
}

fn write_loop(path: &Path, receiver: &Receiver<CartSnapshot>) {
    while let Ok(snapshot) = receiver.recv() {
        let latest = receiver.try_iter().last().unwrap_or(snapshot);

        match save_snapshot(path, &latest) {
            Ok(()) => debug!(
                path = %path.display(),
                lines = latest.lines.len(),
                "saved cart snapshot"
            ),
            Err(err) => warn!(path = %path.display(), %err, "failed to save cart snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use crate::{cart::Cart, products::Product};

    use super::*;

    fn product<'a>(id: &str) -> Product<'a> {
        Product::new(id, id, Money::from_major(100, INR))
    }

    #[test]
    fn save_then_load() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.yml");

        let mut cart = Cart::new(INR);
        cart.add_to_cart(&product("a"), 2);

        save_snapshot(&path, &cart.snapshot())?;

        assert_eq!(load_snapshot(&path)?, cart.snapshot());

        Ok(())
    }

    #[test]
    fn writer_persists_latest_state() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.yml");

        let mut cart = Cart::with_observer(INR, SnapshotWriter::spawn(&path)?);
        cart.add_to_cart(&product("a"), 2);
        cart.add_to_cart(&product("b"), 1);
        cart.update_quantity("a", 7);

        let expected = cart.snapshot();
        cart.into_observer().finish();

        assert_eq!(load_snapshot(&path)?, expected);

        Ok(())
    }

    #[test]
    fn failed_writes_leave_cart_intact() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing").join("cart.yml");

        let mut cart = Cart::with_observer(INR, SnapshotWriter::spawn(&path)?);
        cart.add_to_cart(&product("a"), 2);
        cart.remove_from_cart("a");
        cart.add_to_cart(&product("b"), 3);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Money::from_major(300, INR));

        cart.into_observer().finish();

        assert!(load_snapshot(&path).is_err(), "nothing was written");

        Ok(())
    }
}
