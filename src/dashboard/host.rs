//! Capabilities the dashboard needs from its host: user feedback and file saving.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

/// One-shot user feedback (a toast in a graphical host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Hands a finished document to the host's "save as" mechanism.
pub trait FileSaver {
    /// Store `contents` under `filename`, returning where it ended up.
    fn save(&self, filename: &str, contents: &[u8]) -> io::Result<PathBuf>;
}

impl<S: FileSaver + ?Sized> FileSaver for &S {
    fn save(&self, filename: &str, contents: &[u8]) -> io::Result<PathBuf> {
        (**self).save(filename, contents)
    }
}

/// Prints notifications; destructive ones go to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => {
                println!("{}: {}", notification.title, notification.description)
            }
            Variant::Destructive => {
                eprintln!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Saves documents into a directory.
///
/// Bytes go to a temporary file in the same directory first and are renamed
/// into place, so an interrupted save never leaves a partial document behind.
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, filename: &str, contents: &[u8]) -> io::Result<PathBuf> {
        if filename.is_empty() || filename == ".." || filename.contains(['/', '\\']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid file name '{filename}'"),
            ));
        }

        fs::create_dir_all(&self.dir)?;

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(contents)?;
        temp.flush()?;

        let path = self.dir.join(filename);
        temp.persist(&path).map_err(|e| e.error)?;
        Ok(path)
    }
}
