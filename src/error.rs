//! Error codes shared by every layer of the filesystem.

use std::io;
use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by filesystem operations.
///
/// Each variant maps to a distinct negative code, which the command line
/// tool uses as its exit status.
#[derive(Debug, Error)]
pub enum Error {
    /// The command is unknown or its arguments are malformed.
    #[error("invalid command")]
    InvalidCommand,
    /// An argument is invalid for the requested operation.
    #[error("bad parameter")]
    BadParameter,
    /// An allocation failed.
    #[error("out of memory")]
    NoMem,
    /// The underlying image file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The boot sector does not carry the expected magic byte.
    #[error("bad boot sector")]
    BadBootSector,
    /// The inode number is outside the inode table.
    #[error("inode out of range")]
    InodeOutOfRange,
    /// The inode exists but is not allocated.
    #[error("unallocated inode")]
    UnallocatedInode,
    /// A directory was required but the inode is not one.
    #[error("invalid directory inode")]
    InvalidDirectoryInode,
    /// The offset does not fall inside the file.
    #[error("offset out of range")]
    OffsetOutOfRange,
    /// The file is, or would become, too large for its addressing mode.
    #[error("file too large")]
    FileTooLarge,
    /// No free slot is left in the allocation bitmap.
    #[error("bitmap full")]
    BitmapFull,
    /// The file name exceeds the 14-byte on-disk field.
    #[error("filename too long")]
    FilenameTooLong,
    /// The entry to create already exists.
    #[error("filename already exists")]
    FilenameAlreadyExists,
    /// Path resolution failed.
    #[error("no such file or directory")]
    NoSuchFile,
}

impl Error {
    /// Returns the negative code identifying the error.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidCommand => -1,
            Self::BadParameter => -2,
            Self::NoMem => -3,
            Self::Io(_) => -4,
            Self::BadBootSector => -5,
            Self::InodeOutOfRange => -6,
            Self::UnallocatedInode => -7,
            Self::InvalidDirectoryInode => -8,
            Self::OffsetOutOfRange => -9,
            Self::FileTooLarge => -10,
            Self::BitmapFull => -11,
            Self::FilenameTooLong => -12,
            Self::FilenameAlreadyExists => -13,
            Self::NoSuchFile => -14,
        }
    }
}
