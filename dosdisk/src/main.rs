mod device;
mod logging;
mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dosfs::fat::{FatError, Session};

use device::FileDisk;
use logging::Logger;

#[derive(Debug, Parser)]
#[command(name = "dosdisk")]
#[command(about = "Read-only FAT12 floppy image navigator")]
struct Cli {
    /// Disk image file or raw floppy device node
    image: PathBuf,
    /// Continue past a wrong boot sector signature
    #[arg(short = 'o', long)]
    override_boot: bool,
}

fn run(cli: Cli) -> Result<()> {
    let mut logger = Logger::from_env()?;
    let disk_name = cli.image.display().to_string();

    let disk =
        FileDisk::open(&cli.image).with_context(|| format!("bad disk given: {disk_name}"))?;

    logger.info("   * Reading Boot Sector, FATs and Root Dir");
    let session = match Session::open(disk, cli.override_boot) {
        Ok(session) => session,
        Err(FatError::BadBootSignature { found }) => {
            logger.error(format!(
                "  ** Wrong Boot Sector Flag {:#04x} : {:#04x}",
                found[0], found[1]
            ));
            logger.error("  ** Use -o to override !!!");
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("reading the disk layout"),
    };

    shell::run(&mut logger, session, &disk_name)
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
