//! The `u6fs` tool inspects and edits UNIX version 6 disk images.

use std::env;
use std::fs;
use std::path::Path;
use std::process::exit;
use u6fs::dirent;
use u6fs::dump;
use u6fs::error::Error;
use u6fs::error::Result;
use u6fs::fuse;
use u6fs::inode;
use u6fs::inode::IEXEC;
use u6fs::inode::IFDIR;
use u6fs::inode::IREAD;
use u6fs::inode::IWRITE;
use u6fs::mount::ROOT_INUMBER;
use u6fs::mount::UnixFs;

/// Maximum size in bytes of a host file accepted by the `add` command.
const ADD_MAX_SIZE: usize = 4000;

/// Prints the command line usage.
fn usage(bin: &str) {
    eprintln!("Available commands:");
    eprintln!("{bin} <disk> sb");
    eprintln!("{bin} <disk> inode");
    eprintln!("{bin} <disk> cat1 <inr>");
    eprintln!("{bin} <disk> shafiles");
    eprintln!("{bin} <disk> tree");
    eprintln!("{bin} <disk> fuse <mountpoint>");
    eprintln!("{bin} <disk> bm");
    eprintln!("{bin} <disk> mkdir </path/to/newdir>");
    eprintln!("{bin} <disk> add <dest> <src>");
}

/// Copies the host file `src` into the image at `dst`.
fn add_from_host(fs: &mut UnixFs, dst: &str, src: &str) -> Result<()> {
    let buf = fs::read(src).map_err(|_| Error::NoSuchFile)?;
    if buf.len() > ADD_MAX_SIZE {
        return Err(Error::FileTooLarge);
    }
    dirent::add_file(fs, dst, IREAD | IWRITE | IEXEC, &buf)
}

/// Runs one command against the mounted image.
fn do_cmd(fs: &mut UnixFs, cmd: &str, args: &[String]) -> Result<()> {
    log::debug!("running `{cmd}`");
    match (cmd, args) {
        ("sb", []) => dump::print_superblock(fs),
        ("inode", []) => inode::scan_print(fs),
        ("cat1", [inr]) => {
            let inr = inr.parse().map_err(|_| Error::BadParameter)?;
            dump::cat_first_sector(fs, inr)
        }
        ("shafiles", []) => dump::print_sha_allfiles(fs),
        ("tree", []) => dirent::print_tree(fs, ROOT_INUMBER, ""),
        ("bm", []) => dump::print_bitmaps(fs),
        ("mkdir", [path]) => dirent::create(fs, path, IFDIR | IREAD | IWRITE | IEXEC).map(|_| ()),
        ("add", [dst, src]) => add_from_host(fs, dst, src),
        ("fuse", [mountpoint]) => fuse::fuse_main(fs, Path::new(mountpoint)),
        _ => Err(Error::InvalidCommand),
    }
}

/// Mounts the disk, runs the command, unmounts.
///
/// The image is unmounted even when the command failed; the command's
/// error wins over the unmount's.
fn run(disk: &str, cmd: &str, args: &[String]) -> Result<()> {
    let mut fs = UnixFs::mount(Path::new(disk))?;
    let res = do_cmd(&mut fs, cmd, args);
    res.and(fs.unmount())
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let bin = args.first().map(String::as_str).unwrap_or("u6fs");
    let ret = match &args[..] {
        [_, disk, cmd, rest @ ..] => run(disk, cmd, rest),
        _ => Err(Error::InvalidCommand),
    };
    if let Err(err) = ret {
        if matches!(err, Error::InvalidCommand) {
            usage(bin);
        } else {
            eprintln!("{bin}: error: {err}");
        }
        // Same convention as the exit status of the C-era tool: the
        // negative code, truncated by the host to its low 8 bits.
        exit(err.code());
    }
}
