//! Per-file cursors over a mounted filesystem.

use crate::error::Error;
use crate::error::Result;
use crate::inode;
use crate::inode::IALLOC;
use crate::inode::Inode;
use crate::inode::MAX_SMALL_FILE_SIZE;
use crate::mount::UnixFs;
use crate::sector;
use crate::sector::SECTOR_SIZE;
use std::cmp::min;
use std::mem;

/// An open file: its inode number, a cached copy of the inode and the
/// current byte offset.
///
/// The cached inode is authoritative while the cursor is in use; mutating
/// operations flush it back to the inode table before returning. The
/// mounted filesystem is passed into each operation: reads borrow it
/// shared, anything that allocates or writes borrows it exclusively.
pub struct FileV6 {
    /// The inode number of the open file.
    pub inr: u16,
    /// Cached inode.
    pub inode: Inode,
    /// Current byte offset.
    pub offset: u32,
}

impl FileV6 {
    /// Opens the file of inode `inr`, with the offset at zero.
    ///
    /// Works for plain files and directories alike.
    pub fn open(fs: &UnixFs, inr: u16) -> Result<Self> {
        Ok(Self {
            inr,
            inode: Inode::read(fs, inr)?,
            offset: 0,
        })
    }

    /// Reads at most one sector at the current offset into `buf`, which
    /// must be one sector long.
    ///
    /// Returns the number of bytes of the file present in `buf`, 0 at end
    /// of file. Bytes past the returned count are not part of the file.
    pub fn read_block(&mut self, fs: &UnixFs, buf: &mut [u8]) -> Result<usize> {
        let size = self.inode.size();
        if self.offset == size {
            return Ok(0);
        }
        let sect = self
            .inode
            .find_sector(fs, (self.offset / SECTOR_SIZE as u32) as i32)?;
        sector::read(&fs.f, sect, buf)?;

        let n = min(SECTOR_SIZE as u32, size - self.offset);
        self.offset += n;
        Ok(n as usize)
    }

    /// Moves the cursor to `offset`.
    ///
    /// The offset must lie within the file and be sector-aligned, the sole
    /// exception being the exact file size.
    pub fn seek(&mut self, offset: u32) -> Result<()> {
        let size = self.inode.size();
        if offset > size {
            return Err(Error::OffsetOutOfRange);
        }
        if offset != size && offset % SECTOR_SIZE as u32 != 0 {
            return Err(Error::BadParameter);
        }
        self.offset = offset;
        Ok(())
    }

    /// Allocates a fresh inode with the given mode and opens it.
    pub fn create(fs: &mut UnixFs, mode: u16) -> Result<Self> {
        let inr = inode::alloc(fs)?;
        let mut inode: Inode = unsafe { mem::zeroed() };
        inode.i_mode = IALLOC | mode;
        inode.write(fs, inr)?;
        Ok(Self {
            inr,
            inode,
            offset: 0,
        })
    }

    /// Appends the whole of `buf` at the end of the file.
    ///
    /// Not transactional: a failure partway through leaves the bytes
    /// written so far in place.
    pub fn write_bytes(&mut self, fs: &mut UnixFs, buf: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < buf.len() {
            written += self.write_sector(fs, &buf[written..])?;
        }
        Ok(())
    }

    /// Writes at most one sector's worth of `buf` at the end of the file
    /// and returns the number of bytes consumed.
    ///
    /// When the size is sector-aligned a fresh data sector is taken from
    /// the bitmap; otherwise the partially-used last sector is filled up.
    /// Either way the grown inode is flushed before returning.
    fn write_sector(&mut self, fs: &mut UnixFs, buf: &[u8]) -> Result<usize> {
        let size = self.inode.size();
        if size >= MAX_SMALL_FILE_SIZE {
            // Large-file writes are not supported.
            return Err(Error::FileTooLarge);
        }

        let n;
        if size % SECTOR_SIZE as u32 == 0 {
            let sect = fs.fbm.find_free().ok_or(Error::BitmapFull)?;
            fs.fbm.set(sect);

            n = min(SECTOR_SIZE, buf.len());
            let mut data = [0u8; SECTOR_SIZE];
            data[..n].copy_from_slice(&buf[..n]);
            sector::write(&fs.f, sect as u32, &data)?;

            let mut addr = self.inode.i_addr;
            addr[(size / SECTOR_SIZE as u32) as usize] = sect as u16;
            self.inode.i_addr = addr;
        } else {
            let sect = self
                .inode
                .find_sector(fs, (size / SECTOR_SIZE as u32) as i32)?;
            let mut data = [0u8; SECTOR_SIZE];
            sector::read(&fs.f, sect, &mut data)?;

            let off = (size % SECTOR_SIZE as u32) as usize;
            n = min(SECTOR_SIZE - off, buf.len());
            data[off..off + n].copy_from_slice(&buf[..n]);
            sector::write(&fs.f, sect, &data)?;
        }

        self.inode.set_size(size + n as u32);
        self.inode.write(fs, self.inr)?;
        Ok(n)
    }
}
