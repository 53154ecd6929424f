//! The rotating writer and its builder.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};

use crate::{Error, Result};

/// Bytes per megabyte as used by `max_size_mb`.
pub const MEGABYTE: u64 = 1024 * 1024;

/// Size limit applied when `max_size_mb` is zero.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Builder for [`RotatingFileWriter`].
#[derive(Debug, Clone)]
pub struct RotatingFileWriterBuilder {
    path: PathBuf,
    max_size: u64,
    max_backups: usize,
    compress: bool,
}

impl RotatingFileWriterBuilder {
    /// Starts a builder for the active file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            compress: false,
        }
    }

    /// Maximum size of the active file in megabytes; 0 selects the default.
    #[must_use]
    pub fn max_size_mb(mut self, mb: u64) -> Self {
        let mb = if mb == 0 { DEFAULT_MAX_SIZE_MB } else { mb };
        self.max_size = mb.saturating_mul(MEGABYTE);
        self
    }

    /// Maximum size of the active file in bytes; 0 selects the default.
    #[must_use]
    pub fn max_size_bytes(mut self, bytes: u64) -> Self {
        self.max_size = if bytes == 0 {
            DEFAULT_MAX_SIZE_MB * MEGABYTE
        } else {
            bytes
        };
        self
    }

    /// Number of rotated files to keep; 0 keeps all of them.
    #[must_use]
    pub fn max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    /// Gzip rotated files.
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Opens (or creates) the active file.
    pub fn open(self) -> Result<RotatingFileWriter> {
        if self.path.file_name().is_none() {
            return Err(Error::InvalidPath(self.path));
        }
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| Error::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| Error::Open {
                path: self.path.clone(),
                source,
            })?;

        let file_limit = match self.max_backups {
            0 => FileLimit::MaxFiles(usize::MAX),
            count => FileLimit::MaxFiles(count),
        };
        let compression = if self.compress {
            Compression::OnRotate(0)
        } else {
            Compression::None
        };
        let max_bytes = usize::try_from(self.max_size).unwrap_or(usize::MAX);

        let inner = FileRotate::new(
            &self.path,
            AppendTimestamp::default(file_limit),
            ContentLimit::BytesSurpassed(max_bytes),
            compression,
            #[cfg(unix)]
            None,
        );

        Ok(RotatingFileWriter {
            path: self.path,
            max_size: self.max_size,
            max_backups: self.max_backups,
            compress: self.compress,
            inner,
        })
    }
}

/// A file writer that rotates by size.
///
/// Rotation happens between writes, so a caller that hands over one record
/// per call never has a record split across two files.
pub struct RotatingFileWriter {
    path: PathBuf,
    max_size: u64,
    max_backups: usize,
    compress: bool,
    inner: FileRotate<AppendTimestamp>,
}

impl RotatingFileWriter {
    /// Opens a writer with the given limits.
    ///
    /// * `max_size_mb` - size in megabytes before rotating (0 = 100 MB)
    /// * `max_backups` - rotated files to retain (0 = all)
    /// * `compress` - gzip rotated files
    pub fn new(
        path: impl Into<PathBuf>,
        max_size_mb: u64,
        max_backups: usize,
        compress: bool,
    ) -> Result<Self> {
        Self::builder(path)
            .max_size_mb(max_size_mb)
            .max_backups(max_backups)
            .compress(compress)
            .open()
    }

    #[must_use]
    pub fn builder(path: impl Into<PathBuf>) -> RotatingFileWriterBuilder {
        RotatingFileWriterBuilder::new(path)
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    #[must_use]
    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compress
    }

    /// Rotated files currently on disk, oldest first.
    pub fn backups(&mut self) -> Vec<PathBuf> {
        self.inner.log_paths()
    }

    /// Rotates now, regardless of size.
    pub fn rotate(&mut self) -> io::Result<()> {
        self.inner.rotate()
    }
}

impl fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path)
            .field("max_size", &self.max_size)
            .field("max_backups", &self.max_backups)
            .field("compress", &self.compress)
            .finish_non_exhaustive()
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
