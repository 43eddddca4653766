//! Reader/writer for the UNIX version 6 on-disk filesystem.
//!
//! A disk image is a plain host file made of 512-byte sectors: boot block,
//! superblock, inode table, bitmap areas, then data. This crate parses
//! that layout, resolves paths, reads and appends file contents, allocates
//! inodes and data sectors, and persists every change back to the image
//! bit-exactly. The `u6fs` binary exposes the operations on the command
//! line and through a read-only FUSE mount.

pub mod bitmap;
pub mod dirent;
pub mod dump;
pub mod error;
pub mod file;
pub mod fuse;
pub mod inode;
pub mod mount;
pub mod sector;
pub mod util;
