//! The interactive command loop.
//!
//! One-letter commands against the open session: `l` list, `e` enter,
//! `d` display, `c` copy out, `i` trace a cluster chain, `h` help,
//! `q` quit.

use std::fs::File;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use dosfs::BlockDevice;
use dosfs::fat::{DirEntry, FatError, Resolved, Session};

use crate::logging::Logger;

pub fn run<D: BlockDevice>(
    logger: &mut Logger,
    mut session: Session<D>,
    disk_name: &str,
) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(" {}{} # ", disk_name, session.display());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        match command {
            "l" => list(&session),
            "e" => enter(logger, &mut session, words.next()),
            "d" => display(logger, &mut session, words.next()),
            "c" => copy(logger, &mut session, words.next(), words.next()),
            "i" => info(logger, &mut session, words.next()),
            "h" => help(),
            "q" => break,
            _ => logger.info("BAD COMMAND"),
        }
    }
    println!();
    Ok(())
}

fn list<D: BlockDevice>(session: &Session<D>) {
    for (entry, long_name) in session.list() {
        let attr = entry.attributes();
        let stamp = entry.modified();
        println!(
            "  {}{}{}{}{}  {:02}/{:02}/{:04}  {:02}:{:02} {:6}  [{:04}] {} {}",
            if attr.is_directory() { 'd' } else { '-' },
            if attr.is_hidden() { '-' } else { 'r' },
            if attr.is_read_only() { '-' } else { 'w' },
            if attr.is_archive() { 'a' } else { '-' },
            if attr.is_system() { 's' } else { '-' },
            stamp.date().month(),
            stamp.date().day(),
            stamp.date().year(),
            stamp.time().hour(),
            stamp.time().min(),
            entry.size(),
            entry.first_cluster(),
            entry.display_name(13),
            long_name.unwrap_or_default(),
        );
    }
}

fn enter<D: BlockDevice>(logger: &mut Logger, session: &mut Session<D>, arg: Option<&str>) {
    let path = arg.unwrap_or("");
    if path == "/" {
        session.enter_root();
        return;
    }
    match session.resolve(path) {
        Err(FatError::NotFound) => logger.info("  ** dir not found"),
        Err(FatError::NonDirectoryInPath) => logger.info("  ** non-dir in path"),
        Err(err) => logger.error(format!("  ** {err}")),
        Ok(target) => {
            if let Resolved::Entry { entry, .. } = &target {
                if !entry.attributes().is_directory() {
                    logger.info("  ** file not a dir");
                    return;
                }
            }
            if let Err(err) = session.enter(target) {
                logger.error(format!("  ** {err}"));
            }
        }
    }
}

fn display<D: BlockDevice>(logger: &mut Logger, session: &mut Session<D>, arg: Option<&str>) {
    let Some(entry) = resolve_file(logger, session, arg.unwrap_or("")) else {
        return;
    };
    match session.read_file(&entry) {
        Ok(bytes) => {
            let _ = io::stdout().write_all(&bytes);
        }
        Err(err) => logger.error(format!("  ** {err}")),
    }
}

fn copy<D: BlockDevice>(
    logger: &mut Logger,
    session: &mut Session<D>,
    src: Option<&str>,
    dst: Option<&str>,
) {
    let Some(dst) = dst else {
        logger.info("  ** no output file given");
        return;
    };
    // The output is opened before the source is resolved, so a bad
    // destination is reported without touching the disk.
    let Ok(mut out) = File::create(dst) else {
        logger.info("  ** bad output file given");
        return;
    };
    let Some(entry) = resolve_file(logger, session, src.unwrap_or("")) else {
        return;
    };
    match session.read_file(&entry) {
        Ok(bytes) => {
            if out.write_all(&bytes).is_err() {
                logger.info("  ** bad output file given");
            }
        }
        Err(err) => logger.error(format!("  ** {err}")),
    }
}

fn info<D: BlockDevice>(logger: &mut Logger, session: &mut Session<D>, arg: Option<&str>) {
    match session.resolve(arg.unwrap_or("")) {
        Err(FatError::NonDirectoryInPath) => logger.info("  ** non-dir in path"),
        Err(FatError::NotFound) => logger.info("  ** file not found"),
        Err(err) => logger.error(format!("  ** {err}")),
        Ok(Resolved::Directory { .. }) => logger.info("  ** file not found"),
        Ok(Resolved::Entry { entry, .. }) => {
            let mut line = format!("  ** {} ", entry.display_name(12));
            for cluster in session.chain_of(&entry) {
                line.push_str(&format!("-> {cluster}"));
            }
            logger.info(line);
        }
    }
}

fn resolve_file<D: BlockDevice>(
    logger: &mut Logger,
    session: &mut Session<D>,
    path: &str,
) -> Option<DirEntry> {
    match session.resolve(path) {
        Err(FatError::NotFound) => {
            logger.info("  ** file not found");
            None
        }
        Err(FatError::NonDirectoryInPath) => {
            logger.info("  ** non-dir in path");
            None
        }
        Err(err) => {
            logger.error(format!("  ** {err}"));
            None
        }
        Ok(Resolved::Directory { .. }) => {
            logger.info("  ** it's a directory");
            None
        }
        Ok(Resolved::Entry { entry, .. }) => {
            if entry.attributes().is_directory() {
                logger.info("  ** it's a directory");
                None
            } else {
                Some(entry)
            }
        }
    }
}

fn help() {
    println!("                     * Commands * ");
    println!("    l               : List the CWD, Unix long type listing");
    println!("    e <dir>         : Enter a directory");
    println!("    d <file>        : Display a file, just like Unix \"cat\"");
    println!("    c <file> <copy> : Copy a file, to your Unix CWD");
    println!("    i <file>        : Trace a file's cluster chain");
    println!("    h               : Print this help");
    println!("    q               : Quit");
}
