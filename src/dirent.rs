//! Directory reading, path resolution and entry creation.

use crate::error::Error;
use crate::error::Result;
use crate::file::FileV6;
use crate::inode;
use crate::inode::IALLOC;
use crate::inode::Inode;
use crate::inode::SHORT_DIR_NAME;
use crate::inode::SHORT_FIL_NAME;
use crate::mount::ROOT_INUMBER;
use crate::mount::UnixFs;
use crate::sector::SECTOR_SIZE;
use crate::util::reinterpret;
use crate::util::reinterpret_mut;
use std::mem;
use std::mem::size_of;

/// Maximum length in bytes of a file name.
pub const DIRENT_MAXLEN: usize = 14;
/// Number of directory entries per sector.
pub const DIRENTRIES_PER_SECTOR: usize = SECTOR_SIZE / size_of::<DirEntry>();
/// Path separator.
const PATH_TOKEN: char = '/';

/// A 16-byte on-disk directory entry.
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct DirEntry {
    /// The inode number of the child.
    pub d_inumber: u16,
    /// The child's name, NUL-padded but not NUL-terminated when all 14
    /// bytes are used.
    pub d_name: [u8; DIRENT_MAXLEN],
}

impl DirEntry {
    /// Returns the entry's name, NUL padding stripped.
    pub fn name(&self) -> String {
        let name = self.d_name;
        let len = name.iter().position(|b| *b == 0).unwrap_or(DIRENT_MAXLEN);
        String::from_utf8_lossy(&name[..len]).into_owned()
    }
}

/// Streams the entries of one directory.
///
/// Holds a cursor on the directory's own file plus a one-sector cache of
/// entries. `cur` is the index of the next entry to hand out, `last` the
/// number of entries read so far; when they meet, the next call refills
/// the cache from the underlying file.
pub struct DirReader {
    /// Cursor on the directory's file.
    file: FileV6,
    /// One sector worth of cached entries.
    cache: [DirEntry; DIRENTRIES_PER_SECTOR],
    /// Index of the next entry to return.
    cur: usize,
    /// Number of entries read into the cache so far.
    last: usize,
}

impl DirReader {
    /// Opens a reader over the directory of inode `inr`.
    pub fn open(fs: &UnixFs, inr: u16) -> Result<Self> {
        let file = FileV6::open(fs, inr)?;
        if !file.inode.is_dir() {
            return Err(Error::InvalidDirectoryInode);
        }
        Ok(Self {
            file,
            cache: unsafe { mem::zeroed() },
            cur: 0,
            last: 0,
        })
    }

    /// Returns the next entry, or `None` at the end of the directory.
    pub fn next(&mut self, fs: &UnixFs) -> Result<Option<DirEntry>> {
        if self.cur == self.last {
            let n = self.file.read_block(fs, reinterpret_mut(&mut self.cache))?;
            if n == 0 {
                return Ok(None);
            }
            self.last += n / size_of::<DirEntry>();
        }
        let entry = self.cache[self.cur % DIRENTRIES_PER_SECTOR];
        self.cur += 1;
        Ok(Some(entry))
    }
}

/// Resolves `path` relative to the directory of inode `inr` and returns
/// the inode number of the target.
///
/// Runs of `/` are skipped silently; an empty path resolves to `inr`
/// itself. Component comparison is by byte string.
pub fn lookup(fs: &UnixFs, inr: u16, path: &str) -> Result<u16> {
    let mut cur = inr;
    let mut rest = path;
    loop {
        rest = rest.trim_start_matches(PATH_TOKEN);
        if rest.is_empty() {
            return Ok(cur);
        }
        let (component, tail) = match rest.split_once(PATH_TOKEN) {
            Some((component, tail)) => (component, tail),
            None => (rest, ""),
        };

        let mut dir = DirReader::open(fs, cur)?;
        cur = loop {
            match dir.next(fs)? {
                Some(entry) if entry.name() == component => break entry.d_inumber,
                Some(_) => {}
                None => return Err(Error::NoSuchFile),
            }
        };
        rest = tail;
    }
}

/// Prints the tree rooted at `inr`, depth first, one line per entry.
///
/// Directories print as `DIR <prefix>/<name>/`, plain files as
/// `FIL <prefix>/<name>`. A subtree is printed entirely before its later
/// siblings. The stack of open readers keeps the walk off the host stack.
pub fn print_tree(fs: &UnixFs, inr: u16, prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        println!("{SHORT_DIR_NAME} {prefix}/");
    }

    let mut stack = vec![(DirReader::open(fs, inr)?, prefix.to_owned())];
    while let Some((dir, prefix)) = stack.last_mut() {
        let prefix = prefix.clone();
        let Some(entry) = dir.next(fs)? else {
            stack.pop();
            continue;
        };
        let name = entry.name();
        match DirReader::open(fs, entry.d_inumber) {
            Ok(sub) => {
                println!("{SHORT_DIR_NAME} {prefix}/{name}/");
                stack.push((sub, format!("{prefix}{PATH_TOKEN}{name}")));
            }
            Err(Error::InvalidDirectoryInode) => {
                println!("{SHORT_FIL_NAME} {prefix}/{name}");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Creates a new entry at `path` with the given mode and returns the new
/// inode number.
///
/// The parent directory must already exist; the appended entry and the
/// parent-size growth go through a single `write_bytes` call.
pub fn create(fs: &mut UnixFs, path: &str, mode: u16) -> Result<u16> {
    let (parent, leaf) = match path.rfind(PATH_TOKEN) {
        Some(i) => path.split_at(i + 1),
        None => ("", path),
    };
    if leaf.is_empty() {
        return Err(Error::BadParameter);
    }
    if leaf.len() > DIRENT_MAXLEN {
        return Err(Error::FilenameTooLong);
    }

    let parent_inr = lookup(fs, ROOT_INUMBER, parent)?;
    match lookup(fs, parent_inr, leaf) {
        Ok(_) => return Err(Error::FilenameAlreadyExists),
        Err(Error::NoSuchFile) => {}
        Err(e) => return Err(e),
    }

    let inr = inode::alloc(fs)?;
    let mut inode: Inode = unsafe { mem::zeroed() };
    inode.i_mode = IALLOC | mode;
    inode.write(fs, inr)?;

    let mut entry: DirEntry = unsafe { mem::zeroed() };
    entry.d_inumber = inr;
    let mut name = [0u8; DIRENT_MAXLEN];
    name[..leaf.len()].copy_from_slice(leaf.as_bytes());
    entry.d_name = name;

    let mut parent_file = FileV6::open(fs, parent_inr)?;
    parent_file.write_bytes(fs, reinterpret(&entry))?;
    Ok(inr)
}

/// Creates the file at `path` and fills it with `buf`.
pub fn add_file(fs: &mut UnixFs, path: &str, mode: u16, buf: &[u8]) -> Result<()> {
    let inr = create(fs, path, mode)?;
    let mut file = FileV6::open(fs, inr)?;
    file.write_bytes(fs, buf)
}
