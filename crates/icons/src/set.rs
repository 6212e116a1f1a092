//! Decoded icon entries and the non-empty set that owns them.

use crate::IconError;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JP2_SIGNATURE: &[u8] = b"\x00\x00\x00\x0cjP  \r\n\x87\n";
const J2K_CODESTREAM: &[u8] = b"\xff\x4f\xff\x51";

/// Payload encoding of a single icon entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    Png,
    Jpeg2000,
    /// Legacy packed bitmaps and masks (`is32`, `s8mk`, ...).
    Raw,
}

impl IconFormat {
    /// Sniffs the payload format from its leading bytes.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(PNG_SIGNATURE) {
            Self::Png
        } else if data.starts_with(JP2_SIGNATURE) || data.starts_with(J2K_CODESTREAM) {
            Self::Jpeg2000
        } else {
            Self::Raw
        }
    }

    /// Short image kind tag as handed to the tray host.
    pub fn kind(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg2000 => "jp2",
            Self::Raw => "raw",
        }
    }
}

/// One image stored in an icon container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    ostype: [u8; 4],
    data: Vec<u8>,
}

impl IconEntry {
    pub fn new(ostype: [u8; 4], data: Vec<u8>) -> Self {
        Self { ostype, data }
    }

    /// Four-character entry type, e.g. `ic10`.
    pub fn ostype(&self) -> String {
        String::from_utf8_lossy(&self.ostype).into_owned()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> IconFormat {
        IconFormat::detect(&self.data)
    }
}

/// Ordered icon entries extracted from one container.
///
/// Never empty: the default icon is always available once a set exists.
#[derive(Debug, Clone)]
pub struct IconSet {
    head: Vec<IconEntry>,
    last: IconEntry,
}

impl IconSet {
    /// Builds a set from entries in container order.
    pub fn new(mut entries: Vec<IconEntry>) -> Result<Self, IconError> {
        let last = entries.pop().ok_or(IconError::Empty)?;
        Ok(Self {
            head: entries,
            last,
        })
    }

    /// The last (highest-fidelity) entry.
    pub fn default_icon(&self) -> &IconEntry {
        &self.last
    }

    pub fn len(&self) -> usize {
        self.head.len() + 1
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates entries in container order.
    pub fn iter(&self) -> impl Iterator<Item = &IconEntry> {
        self.head.iter().chain(std::iter::once(&self.last))
    }
}
