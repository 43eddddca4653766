//! Shared helpers building scratch version 6 images.

#![allow(dead_code)]

use std::fs::File;
use std::mem;
use tempfile::NamedTempFile;
use u6fs::dirent::DIRENT_MAXLEN;
use u6fs::dirent::DIRENTRIES_PER_SECTOR;
use u6fs::dirent::DirEntry;
use u6fs::inode::ADDRESSES_PER_SECTOR;
use u6fs::inode::IALLOC;
use u6fs::inode::IEXEC;
use u6fs::inode::IFDIR;
use u6fs::inode::INODES_PER_SECTOR;
use u6fs::inode::IREAD;
use u6fs::inode::IWRITE;
use u6fs::inode::Inode;
use u6fs::mount::BOOTBLOCK_MAGIC_NUM;
use u6fs::mount::BOOTBLOCK_MAGIC_NUM_OFFSET;
use u6fs::mount::BOOTBLOCK_SECTOR;
use u6fs::mount::SUPERBLOCK_SECTOR;
use u6fs::mount::Superblock;
use u6fs::sector;
use u6fs::sector::SECTOR_SIZE;
use u6fs::util::reinterpret;
use u6fs::util::reinterpret_mut;

/// Total number of sectors of the scratch images.
pub const NB_SECTORS: usize = 64;
/// First sector of the inode table.
pub const INODE_START: u16 = 2;
/// First data sector.
pub const BLOCK_START: u16 = 4;

/// Contents of `/tmp/coucou.txt`.
pub const COUCOU: &[u8] = b"Coucou le monde !\n";
/// Size in bytes of the large file of [`large_file_image`].
pub const BIG_SIZE: usize = 5000;
/// Indirect sector of the large file.
pub const BIG_INDIRECT: u32 = 20;
/// First data sector of the large file.
pub const BIG_FIRST_DATA: u32 = 21;

/// Returns an inode describing a one-sector directory stored in `sect`.
fn dir_inode(sect: u16, nb_entries: u32) -> Inode {
    let mut inode: Inode = unsafe { mem::zeroed() };
    inode.i_mode = IALLOC | IFDIR | IREAD | IWRITE | IEXEC;
    inode.i_nlink = 1;
    inode.set_size(nb_entries * mem::size_of::<DirEntry>() as u32);
    let mut addr = [0u16; 8];
    addr[0] = sect;
    inode.i_addr = addr;
    inode
}

/// Returns an inode describing a plain file of `size` bytes in `sect`.
fn file_inode(sect: u16, size: u32) -> Inode {
    let mut inode: Inode = unsafe { mem::zeroed() };
    inode.i_mode = IALLOC | IREAD | IWRITE;
    inode.i_nlink = 1;
    inode.set_size(size);
    let mut addr = [0u16; 8];
    addr[0] = sect;
    inode.i_addr = addr;
    inode
}

/// Writes a directory data sector holding the given `(inode, name)` pairs.
fn write_dir(f: &File, sect: u32, entries: &[(u16, &[u8])]) {
    let mut table: [DirEntry; DIRENTRIES_PER_SECTOR] = unsafe { mem::zeroed() };
    for (i, (inr, name)) in entries.iter().enumerate() {
        table[i].d_inumber = *inr;
        let mut d_name = [0u8; DIRENT_MAXLEN];
        d_name[..name.len()].copy_from_slice(name);
        table[i].d_name = d_name;
    }
    sector::write(f, sect, reinterpret(&table)).unwrap();
}

/// Writes a data sector, zero-padded past `data`.
fn write_data(f: &File, sect: u32, data: &[u8]) {
    let mut buf = [0u8; SECTOR_SIZE];
    buf[..data.len()].copy_from_slice(data);
    sector::write(f, sect, &buf).unwrap();
}

/// Builds the reference image: `/` is inode 1, `/tmp` inode 2 and
/// `/tmp/coucou.txt` inode 3, an 18-byte file.
pub fn scratch_image() -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let f = file.as_file();
    f.set_len((NB_SECTORS * SECTOR_SIZE) as u64).unwrap();

    let mut boot = [0u8; SECTOR_SIZE];
    boot[BOOTBLOCK_MAGIC_NUM_OFFSET] = BOOTBLOCK_MAGIC_NUM;
    sector::write(f, BOOTBLOCK_SECTOR, &boot).unwrap();

    let mut sb: Superblock = unsafe { mem::zeroed() };
    sb.s_isize = 2;
    sb.s_fsize = NB_SECTORS as u16;
    sb.s_inode_start = INODE_START;
    sb.s_block_start = BLOCK_START;
    sector::write(f, SUPERBLOCK_SECTOR, reinterpret(&sb)).unwrap();

    let mut inodes: [Inode; INODES_PER_SECTOR] = unsafe { mem::zeroed() };
    inodes[1] = dir_inode(4, 1);
    inodes[2] = dir_inode(5, 1);
    inodes[3] = file_inode(6, COUCOU.len() as u32);
    sector::write(f, INODE_START as u32, reinterpret(&inodes)).unwrap();

    write_dir(f, 4, &[(2, b"tmp")]);
    write_dir(f, 5, &[(3, b"coucou.txt")]);
    write_data(f, 6, COUCOU);

    file
}

/// Number of entries of the `/many` directory of [`wide_dir_image`].
pub const WIDE_DIR_ENTRIES: usize = 40;

/// Returns the name of the `i`th entry of the `/many` directory.
pub fn wide_entry_name(i: usize) -> String {
    format!("f{i:02}")
}

/// Builds the reference image extended with `/many` (inode 4), a directory
/// whose 40 entries span two sectors. Every entry points at the coucou
/// file.
pub fn wide_dir_image() -> NamedTempFile {
    let file = scratch_image();
    let f = file.as_file();

    let mut inodes: [Inode; INODES_PER_SECTOR] = unsafe { mem::zeroed() };
    sector::read(f, INODE_START as u32, reinterpret_mut(&mut inodes)).unwrap();
    inodes[1] = dir_inode(4, 2);
    inodes[4] = dir_inode(7, WIDE_DIR_ENTRIES as u32);
    let mut addr = [0u16; 8];
    addr[0] = 7;
    addr[1] = 8;
    inodes[4].i_addr = addr;
    sector::write(f, INODE_START as u32, reinterpret(&inodes)).unwrap();

    write_dir(f, 4, &[(2, b"tmp"), (4, b"many")]);

    let names: Vec<String> = (0..WIDE_DIR_ENTRIES).map(wide_entry_name).collect();
    let entries: Vec<(u16, &[u8])> = names.iter().map(|name| (3, name.as_bytes())).collect();
    write_dir(f, 7, &entries[..DIRENTRIES_PER_SECTOR]);
    write_dir(f, 8, &entries[DIRENTRIES_PER_SECTOR..]);

    file
}

/// Expected contents of the large file: each logical sector filled with a
/// digit identifying it.
pub fn big_content() -> Vec<u8> {
    (0..BIG_SIZE)
        .map(|i| b'0' + (i / SECTOR_SIZE) as u8)
        .collect()
}

/// Builds the reference image extended with `/big.txt` (inode 4), a
/// 5000-byte file addressed through one indirect sector.
pub fn large_file_image() -> NamedTempFile {
    let file = scratch_image();
    let f = file.as_file();

    let mut inodes: [Inode; INODES_PER_SECTOR] = unsafe { mem::zeroed() };
    sector::read(f, INODE_START as u32, reinterpret_mut(&mut inodes)).unwrap();
    inodes[1] = dir_inode(4, 2);
    inodes[4] = file_inode(0, BIG_SIZE as u32);
    let mut addr = [0u16; 8];
    addr[0] = BIG_INDIRECT as u16;
    inodes[4].i_addr = addr;
    sector::write(f, INODE_START as u32, reinterpret(&inodes)).unwrap();

    write_dir(f, 4, &[(2, b"tmp"), (4, b"big.txt")]);

    let mut indirect = [0u16; ADDRESSES_PER_SECTOR];
    let content = big_content();
    let nb_data = content.len().div_ceil(SECTOR_SIZE);
    for k in 0..nb_data {
        let sect = BIG_FIRST_DATA + k as u32;
        indirect[k] = sect as u16;
        let end = ((k + 1) * SECTOR_SIZE).min(content.len());
        write_data(f, sect, &content[k * SECTOR_SIZE..end]);
    }
    sector::write(f, BIG_INDIRECT, reinterpret(&indirect)).unwrap();

    file
}
