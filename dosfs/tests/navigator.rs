//! End-to-end navigation over an in-memory floppy image.

use std::cell::RefCell;
use std::rc::Rc;

use dosfs::fat::{
    Attributes, FatError, ROOT_FIRST_SECTOR, ROOT_SECTORS, Resolved, Session,
};
use dosfs::{BlockDevice, DeviceError, SECTOR_SIZE};

const SECTORS: usize = 2880;
const DIR_ENTRY_SIZE: usize = 32;
const CLUSTER_OFFSET: usize = 31;

/// Sector-addressed view of a byte vector, recording every read index.
struct MemDisk {
    image: Vec<u8>,
    reads: Rc<RefCell<Vec<u32>>>,
}

impl BlockDevice for MemDisk {
    fn read_sector(&mut self, index: u32, dst: &mut [u8; SECTOR_SIZE]) -> Result<(), DeviceError> {
        self.reads.borrow_mut().push(index);
        let start = index as usize * SECTOR_SIZE;
        let Some(slice) = self.image.get(start..start + SECTOR_SIZE) else {
            return Err(DeviceError::OutOfBounds);
        };
        dst.copy_from_slice(slice);
        Ok(())
    }
}

/// A blank 1.44M image with a valid boot signature, edited in place.
struct Floppy {
    image: Vec<u8>,
}

impl Floppy {
    fn new() -> Self {
        let mut image = vec![0u8; SECTORS * SECTOR_SIZE];
        image[510] = 0x55;
        image[511] = 0xAA;
        Self { image }
    }

    fn set_fat(&mut self, cluster: u16, value: u16) {
        let base = SECTOR_SIZE; // first FAT copy starts at sector 1
        let index = base + usize::from(cluster) + usize::from(cluster) / 2;
        if cluster % 2 == 1 {
            self.image[index] = (self.image[index] & 0x0F) | (((value & 0x0F) as u8) << 4);
            self.image[index + 1] = (value >> 4) as u8;
        } else {
            self.image[index] = (value & 0xFF) as u8;
            self.image[index + 1] = (self.image[index + 1] & 0xF0) | ((value >> 8) as u8 & 0x0F);
        }
    }

    /// Links `clusters` into a chain ending with an end-of-chain marker.
    fn chain(&mut self, clusters: &[u16]) {
        for pair in clusters.windows(2) {
            self.set_fat(pair[0], pair[1]);
        }
        if let Some(&last) = clusters.last() {
            self.set_fat(last, 0xFFF);
        }
    }

    fn root_record(&mut self, slot: usize, raw: &[u8; DIR_ENTRY_SIZE]) {
        let start = ROOT_FIRST_SECTOR as usize * SECTOR_SIZE + slot * DIR_ENTRY_SIZE;
        self.image[start..start + DIR_ENTRY_SIZE].copy_from_slice(raw);
    }

    fn cluster_record(&mut self, cluster: u16, slot: usize, raw: &[u8; DIR_ENTRY_SIZE]) {
        let start =
            (usize::from(cluster) + CLUSTER_OFFSET) * SECTOR_SIZE + slot * DIR_ENTRY_SIZE;
        self.image[start..start + DIR_ENTRY_SIZE].copy_from_slice(raw);
    }

    fn data(&mut self, cluster: u16, bytes: &[u8]) {
        let start = (usize::from(cluster) + CLUSTER_OFFSET) * SECTOR_SIZE;
        self.image[start..start + bytes.len()].copy_from_slice(bytes);
    }

    fn open(self) -> (Session<MemDisk>, Rc<RefCell<Vec<u32>>>) {
        let reads = Rc::new(RefCell::new(Vec::new()));
        let disk = MemDisk {
            image: self.image,
            reads: Rc::clone(&reads),
        };
        (Session::open(disk, false).unwrap(), reads)
    }
}

fn entry(name: &[u8; 11], attr: u8, cluster: u16, size: u32) -> [u8; DIR_ENTRY_SIZE] {
    let mut raw = [0u8; DIR_ENTRY_SIZE];
    raw[..11].copy_from_slice(name);
    raw[11] = attr;
    raw[26..28].copy_from_slice(&cluster.to_le_bytes());
    raw[28..32].copy_from_slice(&size.to_le_bytes());
    raw
}

/// A VFAT continuation record carrying up to 13 name characters.
fn fragment(sequence: u8, text: &[u8]) -> [u8; DIR_ENTRY_SIZE] {
    let mut raw = [0u8; DIR_ENTRY_SIZE];
    raw[0] = sequence;
    raw[11] = Attributes::LONG_NAME;
    let offsets = (1..11).step_by(2).chain((14..26).step_by(2)).chain((28..32).step_by(2));
    for (slot, offset) in offsets.enumerate() {
        if let Some(&b) = text.get(slot) {
            raw[offset] = b;
        }
    }
    raw
}

/// A root with `DOCS` at cluster 2, holding `README  TXT` (10 bytes at
/// cluster 3) and `SUB` at cluster 4.
fn sample() -> Floppy {
    let mut floppy = Floppy::new();
    floppy.root_record(0, &entry(b"DOCS       ", Attributes::DIRECTORY, 2, 0));
    floppy.chain(&[2]);

    floppy.cluster_record(2, 0, &entry(b".          ", Attributes::DIRECTORY, 2, 0));
    floppy.cluster_record(2, 1, &entry(b"..         ", Attributes::DIRECTORY, 0, 0));
    floppy.cluster_record(2, 2, &entry(b"README  TXT", Attributes::ARCHIVE, 3, 10));
    floppy.cluster_record(2, 3, &entry(b"SUB        ", Attributes::DIRECTORY, 4, 0));
    floppy.chain(&[3]);
    floppy.data(3, b"hello worl + padding the caller must never see");

    floppy.cluster_record(4, 0, &entry(b".          ", Attributes::DIRECTORY, 4, 0));
    floppy.cluster_record(4, 1, &entry(b"..         ", Attributes::DIRECTORY, 2, 0));
    floppy.chain(&[4]);
    floppy
}

#[test]
fn open_reads_boot_fat_root_in_order() {
    let (_session, reads) = sample().open();
    let expected: Vec<u32> = std::iter::once(0)
        .chain(1..ROOT_FIRST_SECTOR)
        .chain(ROOT_FIRST_SECTOR..ROOT_FIRST_SECTOR + ROOT_SECTORS as u32)
        .collect();
    assert_eq!(*reads.borrow(), expected);
}

#[test]
fn bad_boot_signature_is_rejected_unless_overridden() {
    let mut floppy = Floppy::new();
    floppy.image[511] = 0x00;
    let image = floppy.image;

    let disk = MemDisk {
        image: image.clone(),
        reads: Rc::default(),
    };
    assert_eq!(
        Session::open(disk, false).err(),
        Some(FatError::BadBootSignature {
            found: [0x55, 0x00]
        })
    );

    let disk = MemDisk {
        image,
        reads: Rc::default(),
    };
    assert!(Session::open(disk, true).is_ok());
}

#[test]
fn resolve_and_read_nested_file() {
    let (mut session, _) = sample().open();
    let Resolved::Entry { entry, display } = session.resolve("docs/readme.txt").unwrap() else {
        panic!("expected a file entry");
    };
    assert_eq!(entry.size(), 10);
    assert_eq!(display, "/docs/");
    assert_eq!(session.read_file(&entry).unwrap(), b"hello worl");
}

#[test]
fn chain_end_is_authoritative_over_declared_size() {
    let mut floppy = Floppy::new();
    floppy.root_record(0, &entry(b"BIG     BIN", Attributes::ARCHIVE, 5, 2000));
    floppy.chain(&[5]);
    let (mut session, _) = floppy.open();

    let Resolved::Entry { entry, .. } = session.resolve("big.bin").unwrap() else {
        panic!("expected a file entry");
    };
    // One cluster in the chain, so one sector comes back despite size 2000.
    assert_eq!(session.read_file(&entry).unwrap().len(), SECTOR_SIZE);
}

#[test]
fn multi_sector_file_truncates_to_size() {
    let mut floppy = Floppy::new();
    floppy.root_record(0, &entry(b"TWO     BIN", Attributes::ARCHIVE, 6, 700));
    floppy.chain(&[6, 7]);
    floppy.data(6, &[0xAA; SECTOR_SIZE]);
    floppy.data(7, &[0xBB; SECTOR_SIZE]);
    let (mut session, _) = floppy.open();

    let Resolved::Entry { entry, .. } = session.resolve("two.bin").unwrap() else {
        panic!("expected a file entry");
    };
    let bytes = session.read_file(&entry).unwrap();
    assert_eq!(bytes.len(), 700);
    assert_eq!(bytes[..SECTOR_SIZE], [0xAA; SECTOR_SIZE]);
    assert_eq!(bytes[SECTOR_SIZE..], [0xBB; 700 - SECTOR_SIZE]);
}

#[test]
fn not_found_and_non_directory_errors() {
    let (mut session, _) = sample().open();
    assert_eq!(session.resolve("missing.txt").err(), Some(FatError::NotFound));
    assert_eq!(
        session.resolve("docs/readme.txt/deeper").err(),
        Some(FatError::NonDirectoryInPath)
    );
}

#[test]
fn slash_resolves_to_root_from_anywhere() {
    let (mut session, _) = sample().open();
    let docs = session.resolve("docs").unwrap();
    session.enter(docs).unwrap();

    let Resolved::Directory { view, display } = session.resolve("/").unwrap() else {
        panic!("expected the root view");
    };
    assert_eq!(display, "/");
    assert!(view.find(b"DOCS       ").is_some());
}

#[test]
fn dotdot_from_first_level_returns_to_root() {
    let (mut session, _) = sample().open();
    let target = session.resolve("docs/..").unwrap();
    session.enter(target).unwrap();
    assert_eq!(session.display(), "/");
    assert!(session.cwd().find(b"DOCS       ").is_some());
}

#[test]
fn display_path_follows_navigation() {
    let (mut session, _) = sample().open();
    assert_eq!(session.display(), "/");

    let docs = session.resolve("docs").unwrap();
    session.enter(docs).unwrap();
    assert_eq!(session.display(), "/docs/");

    let sub = session.resolve("sub").unwrap();
    session.enter(sub).unwrap();
    assert_eq!(session.display(), "/docs/sub/");

    let up = session.resolve("..").unwrap();
    session.enter(up).unwrap();
    assert_eq!(session.display(), "/docs/");

    session.enter_root();
    assert_eq!(session.display(), "/");
}

#[test]
fn entering_a_file_is_refused() {
    let (mut session, _) = sample().open();
    let target = session.resolve("docs/readme.txt").unwrap();
    assert_eq!(session.enter(target).err(), Some(FatError::NonDirectoryInPath));
    // The session is unchanged after the refused move.
    assert_eq!(session.display(), "/");
}

#[test]
fn listing_carries_long_names() {
    let mut floppy = Floppy::new();
    floppy.root_record(0, &fragment(0x41, b"My Documents"));
    floppy.root_record(1, &entry(b"MYDOCU~1   ", Attributes::DIRECTORY, 2, 0));
    floppy.root_record(2, &entry(b"PLAIN   TXT", Attributes::ARCHIVE, 3, 4));
    floppy.chain(&[2]);
    floppy.chain(&[3]);
    let (session, _) = floppy.open();

    let rows = session.list();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0.unix_name(), "mydocu~1/");
    assert_eq!(rows[0].1.as_deref(), Some("My Documents/"));
    assert_eq!(rows[1].0.unix_name(), "plain.txt");
    assert_eq!(rows[1].1, None);
}

#[test]
fn chain_trace_ends_with_the_marker() {
    let mut floppy = Floppy::new();
    floppy.root_record(0, &entry(b"LOG     TXT", Attributes::ARCHIVE, 5, 600));
    floppy.chain(&[5, 6]);
    let (mut session, _) = floppy.open();

    let Resolved::Entry { entry, .. } = session.resolve("log.txt").unwrap() else {
        panic!("expected a file entry");
    };
    assert_eq!(session.chain_of(&entry), vec![5, 6, 0xFFF]);
}

#[test]
fn truncated_image_surfaces_a_device_error() {
    let mut floppy = sample();
    // Keep the reserved regions but cut the image before the data area.
    floppy.image.truncate((CLUSTER_OFFSET + 2) * SECTOR_SIZE);
    let reads = Rc::new(RefCell::new(Vec::new()));
    let disk = MemDisk {
        image: floppy.image,
        reads,
    };
    let mut session = Session::open(disk, false).unwrap();

    assert_eq!(
        session.resolve("docs/readme.txt").err(),
        Some(FatError::Device(DeviceError::OutOfBounds))
    );
}
