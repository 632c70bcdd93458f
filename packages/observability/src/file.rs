//! Append-only log file shared by every process of the client.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing_subscriber::fmt::MakeWriter;

/// Each line reaches the file in a single write, so concurrent writers
/// never interleave within a line.
pub(crate) struct LogFile {
    file: File,
}

impl LogFile {
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.file
    }
}
