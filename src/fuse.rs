//! Read-only FUSE bridge over a mounted image.
//!
//! The kernel addresses files by inode number; version 6 inode numbers are
//! small, stable and rooted at 1 exactly like FUSE's, so they are used
//! directly with no translation table.

use crate::dirent;
use crate::dirent::DirReader;
use crate::dump;
use crate::error::Error;
use crate::error::Result;
use crate::file::FileV6;
use crate::inode::Inode;
use crate::mount::UnixFs;
use crate::sector::SECTOR_SIZE;
use fuser::FileAttr;
use fuser::FileType;
use fuser::Filesystem;
use fuser::MountOption;
use fuser::ReplyAttr;
use fuser::ReplyData;
use fuser::ReplyDirectory;
use fuser::ReplyEntry;
use fuser::Request;
use std::cmp::min;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use std::time::UNIX_EPOCH;

/// Validity duration handed to the kernel for cached attributes.
const TTL: Duration = Duration::from_secs(1);

/// The bridge handed to the FUSE session; one per mounted image.
struct U6FuseFs<'fs> {
    fs: &'fs UnixFs,
}

impl U6FuseFs<'_> {
    /// Builds the attributes of the file of inode `inr`.
    ///
    /// Permissions are fixed at 0755: the format's permission bits are
    /// surfaced by the inspection commands but never enforced.
    fn attr(&self, inr: u16) -> Result<FileAttr> {
        let inode = Inode::read(self.fs, inr)?;
        let size = inode.size() as u64;
        Ok(FileAttr {
            ino: inr as u64,
            size,
            blocks: size.div_ceil(SECTOR_SIZE as u64),
            atime: UNIX_EPOCH,
            mtime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
            crtime: UNIX_EPOCH,
            kind: if inode.is_dir() {
                FileType::Directory
            } else {
                FileType::RegularFile
            },
            perm: 0o755,
            nlink: inode.i_nlink as u32,
            uid: inode.i_uid as u32,
            gid: inode.i_gid as u32,
            rdev: 0,
            blksize: SECTOR_SIZE as u32,
            flags: 0,
        })
    }

    /// Collects the listing of the directory of `inr`, `.` and `..` first.
    fn entries(&self, inr: u16) -> Result<Vec<(u64, FileType, String)>> {
        let mut dir = DirReader::open(self.fs, inr)?;
        let mut entries = vec![
            (inr as u64, FileType::Directory, ".".to_owned()),
            (inr as u64, FileType::Directory, "..".to_owned()),
        ];
        while let Some(entry) = dir.next(self.fs)? {
            let child = entry.d_inumber;
            let kind = match Inode::read(self.fs, child) {
                Ok(inode) if inode.is_dir() => FileType::Directory,
                _ => FileType::RegularFile,
            };
            entries.push((child as u64, kind, entry.name()));
        }
        Ok(entries)
    }

    /// Reads up to `size` bytes of the file of `inr` starting at `offset`.
    fn read_at(&self, inr: u16, offset: i64, size: u32) -> Result<Vec<u8>> {
        let mut file = FileV6::open(self.fs, inr)?;
        file.seek(offset as u32)?;

        let size = size as usize;
        let mut out = Vec::with_capacity(size);
        let mut data = [0u8; SECTOR_SIZE];
        while out.len() < size {
            let n = file.read_block(self.fs, &mut data)?;
            if n == 0 {
                break;
            }
            let take = min(n, size - out.len());
            out.extend_from_slice(&data[..take]);
        }
        Ok(out)
    }
}

impl Filesystem for U6FuseFs<'_> {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(name) = name.to_str() else {
            reply.error(libc::ENOENT);
            return;
        };
        log::debug!("lookup {name} in inode {parent}");
        let attr = dirent::lookup(self.fs, parent as u16, name).and_then(|inr| self.attr(inr));
        match attr {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyAttr) {
        match self.attr(ino as u16) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let entries = match self.entries(ino as u16) {
            Ok(entries) => entries,
            Err(e) => {
                reply.error(errno(&e));
                return;
            }
        };
        for (i, (child, kind, name)) in entries.iter().enumerate().skip(offset as usize) {
            if reply.add(*child, (i + 1) as i64, *kind, name) {
                break;
            }
        }
        reply.ok();
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        log::debug!("read {size}@{offset} from inode {ino}");
        match self.read_at(ino as u16, offset, size) {
            Ok(data) => reply.data(&data),
            Err(e) => reply.error(errno(&e)),
        }
    }
}

/// Maps a filesystem error onto the errno handed back to the kernel.
fn errno(err: &Error) -> i32 {
    match err {
        Error::NoSuchFile | Error::InodeOutOfRange | Error::UnallocatedInode => libc::ENOENT,
        Error::InvalidDirectoryInode => libc::ENOTDIR,
        Error::BadParameter | Error::OffsetOutOfRange => libc::EINVAL,
        _ => libc::EIO,
    }
}

/// Prints the superblock, then serves `fs` read-only at `mountpoint` until
/// the kernel session ends.
///
/// The session is single-threaded and the bridge borrows the mounted image
/// for its whole lifetime, so a process serves at most one mount at a time.
pub fn fuse_main(fs: &UnixFs, mountpoint: &Path) -> Result<()> {
    dump::print_superblock(fs)?;
    log::info!("serving FUSE at {}", mountpoint.display());
    let options = [MountOption::RO, MountOption::FSName("u6fs".to_owned())];
    fuser::mount2(U6FuseFs { fs }, mountpoint, &options)?;
    Ok(())
}
