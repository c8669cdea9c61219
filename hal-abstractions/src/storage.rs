//! Persistent file store
//!
//! Each call opens the named file, writes, and closes it again. No handle is
//! ever held between calls, so a power loss between writes cannot leave an
//! open file behind.

/// How a file is opened for a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenMode {
    /// Create the file, discarding any previous content
    Truncate,
    /// Create the file if missing, then write at the end
    Append,
}

/// A store of named files that supports whole-write operations.
///
/// Errors carry an [`embedded_io::ErrorKind`] so callers can report them
/// without knowing the backing medium.
pub trait LogStore {
    type Error: embedded_io::Error;

    /// Open `name` with `mode`, write all of `data`, then close the file.
    fn write_file(&mut self, name: &str, mode: OpenMode, data: &[u8]) -> Result<(), Self::Error>;
}
