use crate::fat::date::{Date, DateTime};

/// Size of a directory record in bytes (always 32 bytes).
pub const DIR_ENTRY_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Directory entry attributes.
pub struct Attributes(u8);

impl Attributes {
    /// Read-only attribute.
    pub const READ_ONLY: u8 = 0x01;
    /// Hidden attribute.
    pub const HIDDEN: u8 = 0x02;
    /// System attribute.
    pub const SYSTEM: u8 = 0x04;
    /// Volume label attribute.
    pub const VOLUME_LABEL: u8 = 0x08;
    /// Directory attribute.
    pub const DIRECTORY: u8 = 0x10;
    /// Archive attribute.
    pub const ARCHIVE: u8 = 0x20;
    /// A record whose attribute byte equals this exact value is a VFAT
    /// long-name continuation, not a real entry.
    pub const LONG_NAME: u8 = Self::READ_ONLY | Self::HIDDEN | Self::SYSTEM | Self::VOLUME_LABEL;

    #[must_use]
    #[inline]
    /// Creates a new attribute set.
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is read-only.
    pub const fn is_read_only(&self) -> bool {
        self.0 & Self::READ_ONLY != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is hidden.
    pub const fn is_hidden(&self) -> bool {
        self.0 & Self::HIDDEN != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a system file.
    pub const fn is_system(&self) -> bool {
        self.0 & Self::SYSTEM != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a volume label.
    pub const fn is_volume_label(&self) -> bool {
        self.0 & Self::VOLUME_LABEL != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a directory.
    pub const fn is_directory(&self) -> bool {
        self.0 & Self::DIRECTORY != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is archived.
    pub const fn is_archive(&self) -> bool {
        self.0 & Self::ARCHIVE != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the record is a VFAT long-name continuation.
    pub const fn is_long_name(&self) -> bool {
        self.0 == Self::LONG_NAME
    }
}

/// A decoded 32-byte short-name directory entry.
///
/// All multi-byte fields are little-endian on the medium and decoded
/// byte-by-byte.
#[derive(Debug, Clone, Copy)]
pub struct DirEntry {
    name: [u8; 8],
    ext: [u8; 3],
    attributes: Attributes,
    created: DateTime,
    accessed: Date,
    modified: DateTime,
    first_cluster: u16,
    size: u32,
}

impl DirEntry {
    /// Deleted entry marker (first name byte).
    pub const DELETED: u8 = 0xE5;
    /// End of directory marker (first name byte).
    pub const END_OF_ENTRIES: u8 = 0x00;

    fn decode(raw: &[u8; DIR_ENTRY_SIZE]) -> Self {
        let mut name = [0u8; 8];
        name.copy_from_slice(&raw[0..8]);
        let mut ext = [0u8; 3];
        ext.copy_from_slice(&raw[8..11]);
        Self {
            name,
            ext,
            attributes: Attributes::new(raw[11]),
            created: DateTime::decode(le16(raw, 16), le16(raw, 14)),
            accessed: Date::decode(le16(raw, 18)),
            modified: DateTime::decode(le16(raw, 24), le16(raw, 22)),
            first_cluster: le16(raw, 26),
            size: u32::from_le_bytes([raw[28], raw[29], raw[30], raw[31]]),
        }
    }

    #[must_use]
    #[inline]
    /// Returns the space-padded 8-byte name field.
    pub const fn name(&self) -> [u8; 8] {
        self.name
    }

    #[must_use]
    #[inline]
    /// Returns the space-padded 3-byte extension field.
    pub const fn extension(&self) -> [u8; 3] {
        self.ext
    }

    #[must_use]
    #[inline]
    pub const fn attributes(&self) -> Attributes {
        self.attributes
    }

    #[must_use]
    #[inline]
    /// Returns the starting cluster of the entry's data.
    pub const fn first_cluster(&self) -> u16 {
        self.first_cluster
    }

    #[must_use]
    #[inline]
    /// Returns the file size in bytes. Meaningful only for files.
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    #[inline]
    pub const fn created(&self) -> DateTime {
        self.created
    }

    #[must_use]
    #[inline]
    pub const fn accessed(&self) -> Date {
        self.accessed
    }

    #[must_use]
    #[inline]
    pub const fn modified(&self) -> DateTime {
        self.modified
    }

    #[must_use]
    /// Returns the full 11-byte short name, the comparison key for lookups.
    pub fn short_key(&self) -> [u8; 11] {
        let mut key = [0u8; 11];
        key[..8].copy_from_slice(&self.name);
        key[8..].copy_from_slice(&self.ext);
        key
    }

    #[must_use]
    /// Returns the human-readable name: padding trimmed, lower-cased,
    /// `.` inserted only when an extension is present, `/` appended for
    /// directories.
    pub fn unix_name(&self) -> String {
        let mut out = String::new();
        for &b in &self.name {
            if b == b' ' {
                break;
            }
            out.push(char::from(b.to_ascii_lowercase()));
        }
        if self.ext[0] != b' ' {
            out.push('.');
            for &b in &self.ext {
                if b == b' ' {
                    break;
                }
                out.push(char::from(b.to_ascii_lowercase()));
            }
        }
        if self.attributes.is_directory() {
            out.push('/');
        }
        out
    }

    #[must_use]
    /// Returns [`Self::unix_name`] space-padded to `width`.
    pub fn display_name(&self, width: usize) -> String {
        let mut out = self.unix_name();
        while out.len() < width {
            out.push(' ');
        }
        out
    }
}

/// One 32-byte VFAT long-name continuation record.
///
/// Long names are stored in reverse physical order immediately before
/// their short-name record; the fragment with the `0x40` sequence bit set
/// is the last one when walking backward. The checksum ties the fragment
/// to its short name but is not verified here; corruption is best-effort
/// assembled, not repaired.
#[derive(Debug, Clone, Copy)]
pub struct LongNameFragment {
    sequence: u8,
    checksum: u8,
    chars: [u8; Self::CHARS_PER_FRAGMENT],
}

impl LongNameFragment {
    /// Sequence-byte bit marking the final fragment of a backward walk.
    pub const LAST: u8 = 0x40;
    /// Characters carried per fragment (5 + 6 + 2).
    pub const CHARS_PER_FRAGMENT: usize = 13;

    fn decode(raw: &[u8; DIR_ENTRY_SIZE]) -> Self {
        let mut chars = [0u8; Self::CHARS_PER_FRAGMENT];
        let mut n = 0;
        // Three UCS-2 name slices; only the low byte of each pair is kept.
        for i in (1..11).step_by(2) {
            chars[n] = raw[i];
            n += 1;
        }
        for i in (14..26).step_by(2) {
            chars[n] = raw[i];
            n += 1;
        }
        for i in (28..32).step_by(2) {
            chars[n] = raw[i];
            n += 1;
        }
        Self {
            sequence: raw[0],
            checksum: raw[13],
            chars,
        }
    }

    #[must_use]
    #[inline]
    /// Returns true if this is the final fragment of the backward walk.
    pub const fn is_last(&self) -> bool {
        self.sequence & Self::LAST != 0
    }

    #[must_use]
    #[inline]
    /// Returns the sequence number without the last-fragment bit.
    pub const fn sequence(&self) -> u8 {
        self.sequence & !Self::LAST
    }

    #[must_use]
    #[inline]
    /// Returns the short-name checksum carried by the fragment.
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    #[must_use]
    #[inline]
    /// Returns the fragment's name bytes, including any trailing padding.
    pub const fn chars(&self) -> &[u8; Self::CHARS_PER_FRAGMENT] {
        &self.chars
    }
}

/// A 32-byte directory record, discriminated by its leading name byte and
/// attribute byte instead of overlapping-struct reinterpretation.
#[derive(Debug, Clone, Copy)]
pub enum DirRecord {
    /// First name byte `0x00`: no further entries in this directory.
    EndOfEntries,
    /// First name byte `0xE5`: deleted slot, skipped by enumeration.
    Deleted,
    /// Attribute byte `0x0F`: VFAT long-name continuation.
    Continuation(LongNameFragment),
    /// A real short-name entry.
    Entry(DirEntry),
}

impl DirRecord {
    #[must_use]
    pub fn decode(raw: &[u8; DIR_ENTRY_SIZE]) -> Self {
        if raw[0] == DirEntry::END_OF_ENTRIES {
            return Self::EndOfEntries;
        }
        if raw[0] == DirEntry::DELETED {
            return Self::Deleted;
        }
        if Attributes::new(raw[11]).is_long_name() {
            return Self::Continuation(LongNameFragment::decode(raw));
        }
        Self::Entry(DirEntry::decode(raw))
    }
}

/// Encodes a typed name segment into the 11-byte space-padded short-name
/// key used for directory lookups.
///
/// `.` and `..` are taken verbatim. Otherwise leading spaces are trimmed,
/// up to 8 characters before the first `.` are upper-cased into the name
/// field (stopping at a newline), and up to 3 characters after it into the
/// extension field. No long-name matching happens on this path.
#[must_use]
pub fn encode_short_name(input: &str) -> [u8; 11] {
    let mut key = [b' '; 11];
    let bytes = input.as_bytes();

    if bytes.first() == Some(&b'.') {
        key[0] = b'.';
        if bytes.get(1) == Some(&b'.') {
            key[1] = b'.';
        }
        return key;
    }

    let trimmed = input.trim_start_matches(' ');
    let trimmed = match trimmed.find('\n') {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    let (base, ext) = match trimmed.split_once('.') {
        Some((base, ext)) => (base, ext),
        None => (trimmed, ""),
    };
    for (i, b) in base.bytes().take(8).enumerate() {
        key[i] = b.to_ascii_uppercase();
    }
    for (i, b) in ext.bytes().take(3).enumerate() {
        key[8 + i] = b.to_ascii_uppercase();
    }
    key
}

fn le16(raw: &[u8; DIR_ENTRY_SIZE], offset: usize) -> u16 {
    u16::from_le_bytes([raw[offset], raw[offset + 1]])
}
