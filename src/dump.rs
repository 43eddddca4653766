//! Inspection commands: superblock, inode and bitmap dumps, SHA-256
//! listings.

use crate::error::Error;
use crate::error::Result;
use crate::file::FileV6;
use crate::inode::INODES_PER_SECTOR;
use crate::inode::Inode;
use crate::inode::SHORT_DIR_NAME;
use crate::mount::ROOT_INUMBER;
use crate::mount::Superblock;
use crate::mount::UnixFs;
use crate::sector::SECTOR_SIZE;
use sha2::Digest;
use sha2::Sha256;
use std::cmp::min;
use std::io;
use std::io::Write;

/// Number of leading bytes of a file covered by the SHA-256 listing.
const HASHED_LENGTH: usize = 1024;

/// Prints the superblock of `fs`.
pub fn print_superblock(fs: &UnixFs) -> Result<()> {
    let Superblock {
        s_isize,
        s_fsize,
        s_fbmsize,
        s_ibmsize,
        s_inode_start,
        s_block_start,
        s_fbm_start,
        s_ibm_start,
        s_flock,
        s_ilock,
        s_fmod,
        s_ronly,
        s_time,
        ..
    } = fs.sb;
    println!("**********FS SUPERBLOCK START**********");
    println!("{:<20}: {s_isize}", "s_isize");
    println!("{:<20}: {s_fsize}", "s_fsize");
    println!("{:<20}: {s_fbmsize}", "s_fbmsize");
    println!("{:<20}: {s_ibmsize}", "s_ibmsize");
    println!("{:<20}: {s_inode_start}", "s_inode_start");
    println!("{:<20}: {s_block_start}", "s_block_start");
    println!("{:<20}: {s_fbm_start}", "s_fbm_start");
    println!("{:<20}: {s_ibm_start}", "s_ibm_start");
    println!("{:<20}: {s_flock}", "s_flock");
    println!("{:<20}: {s_ilock}", "s_ilock");
    println!("{:<20}: {s_fmod}", "s_fmod");
    println!("{:<20}: {s_ronly}", "s_ronly");
    println!("{:<20}: [{}] {}", "s_time", s_time[0], s_time[1]);
    println!("**********FS SUPERBLOCK END**********");
    Ok(())
}

/// Prints the fields of one inode.
fn print_inode(inode: &Inode) {
    let Inode {
        i_mode,
        i_nlink,
        i_uid,
        i_gid,
        i_size0,
        i_size1,
        ..
    } = *inode;
    println!("**********FS INODE START**********");
    println!("i_mode: {i_mode}");
    println!("i_nlink: {i_nlink}");
    println!("i_uid: {i_uid}");
    println!("i_gid: {i_gid}");
    println!("i_size0: {i_size0}");
    println!("i_size1: {i_size1}");
    println!("size: {}", inode.size());
    println!("**********FS INODE END************");
}

/// Prints the inode of `inr` followed by the first sector of its contents.
///
/// Directories only get their inode printed.
pub fn cat_first_sector(fs: &UnixFs, inr: u16) -> Result<()> {
    let mut file = match FileV6::open(fs, inr) {
        Ok(file) => file,
        Err(e) => {
            println!("filev6_open failed for inode #{inr}.");
            return Err(e);
        }
    };
    println!();
    println!("Printing inode #{inr}:");
    print_inode(&file.inode);
    if file.inode.is_dir() {
        println!("which is a directory.");
        return Ok(());
    }

    println!("the first sector of data of which contains:");
    let mut data = [0u8; SECTOR_SIZE];
    let n = file.read_block(fs, &mut data)?;
    io::stdout().write_all(&data[..n])?;
    println!("----");
    Ok(())
}

/// Prints the SHA-256 of the first [`HASHED_LENGTH`] bytes of the file of
/// `inr`, or `DIR` for a directory.
fn print_shafile(fs: &UnixFs, inr: u16) -> Result<()> {
    let mut file = FileV6::open(fs, inr)?;
    if file.inode.is_dir() {
        println!("SHA inode {inr}: {SHORT_DIR_NAME}");
        return Ok(());
    }

    let mut buf = [0u8; HASHED_LENGTH];
    let mut len = 0;
    while len < HASHED_LENGTH {
        let mut data = [0u8; SECTOR_SIZE];
        let n = file.read_block(fs, &mut data)?;
        if n == 0 {
            break;
        }
        let take = min(n, HASHED_LENGTH - len);
        buf[len..len + take].copy_from_slice(&data[..take]);
        len += take;
    }

    let sha = Sha256::digest(&buf[..len]);
    print!("SHA inode {inr}: ");
    for byte in sha {
        print!("{byte:02x}");
    }
    println!();
    Ok(())
}

/// Prints the SHA-256 of every allocated file, by inode number.
pub fn print_sha_allfiles(fs: &UnixFs) -> Result<()> {
    println!("Listing inodes SHA");
    let nb_inodes = fs.sb.s_isize as u32 * INODES_PER_SECTOR as u32;
    for inr in ROOT_INUMBER as u32..nb_inodes {
        match print_shafile(fs, inr as u16) {
            Ok(()) | Err(Error::UnallocatedInode) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Prints the inode and sector bitmaps of `fs`.
pub fn print_bitmaps(fs: &UnixFs) -> Result<()> {
    fs.ibm.print("INODES");
    fs.fbm.print("SECTORS");
    Ok(())
}
