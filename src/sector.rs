//! Sector-granular access to the disk image.

use crate::error::Error;
use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;

/// The size of a sector in bytes.
pub const SECTOR_SIZE: usize = 512;

/// Reads the sector at index `sector` of the image `f` into `data`.
///
/// `data` must be exactly one sector long.
pub fn read(mut f: &File, sector: u32, data: &mut [u8]) -> Result<()> {
    if data.len() != SECTOR_SIZE {
        return Err(Error::BadParameter);
    }
    f.seek(SeekFrom::Start(sector as u64 * SECTOR_SIZE as u64))?;
    f.read_exact(data)?;
    Ok(())
}

/// Writes `data` to the sector at index `sector` of the image `f`.
///
/// `data` must be exactly one sector long.
pub fn write(mut f: &File, sector: u32, data: &[u8]) -> Result<()> {
    if data.len() != SECTOR_SIZE {
        return Err(Error::BadParameter);
    }
    f.seek(SeekFrom::Start(sector as u64 * SECTOR_SIZE as u64))?;
    f.write_all(data)?;
    Ok(())
}
