use std::fs;
use std::path::Path;

use crate::{IconEntry, IconError, IconSet};

const ICNS_MAGIC: &[u8; 4] = b"icns";
const HEADER_LEN: usize = 8;

/// Entry types that describe the container rather than hold an image.
const METADATA_TYPES: [&[u8; 4]; 7] = [
    b"TOC ",
    b"icnV",
    b"name",
    b"info",
    b"sbtp",
    b"slct",
    b"\xfd\xd9\x2f\xa8",
];

/// Reads and parses an ICNS file.
pub fn load_icns(path: &Path) -> Result<IconSet, IconError> {
    let data = fs::read(path)?;
    let set = parse_icns(&data)?;
    tracing::debug!(path = %path.display(), entries = set.len(), "icon container loaded");
    Ok(set)
}

/// Parses ICNS bytes into an [`IconSet`], skipping metadata entries.
pub fn parse_icns(data: &[u8]) -> Result<IconSet, IconError> {
    let (magic, declared) = read_header(data, 0)?;
    if &magic != ICNS_MAGIC {
        return Err(IconError::Format(format!(
            "expected 'icns' magic, got {:?}",
            String::from_utf8_lossy(&magic)
        )));
    }

    if declared < HEADER_LEN || declared > data.len() {
        return Err(IconError::Format(format!(
            "declared length {declared} does not fit {} bytes of data",
            data.len()
        )));
    }

    // Bytes past the declared length are not part of the container.
    let data = &data[..declared];
    let mut pos = HEADER_LEN;
    let mut entries = Vec::new();

    while pos < data.len() {
        let (ostype, len) = read_header(data, pos)?;
        let end = pos
            .checked_add(len)
            .filter(|&end| len >= HEADER_LEN && end <= data.len());
        let Some(end) = end else {
            return Err(IconError::Format(format!(
                "entry '{}' at pos {pos} has invalid length {len}",
                String::from_utf8_lossy(&ostype)
            )));
        };

        if METADATA_TYPES.contains(&&ostype) {
            tracing::trace!(ostype = %String::from_utf8_lossy(&ostype), "skipping metadata entry");
        } else {
            entries.push(IconEntry::new(ostype, data[pos + HEADER_LEN..end].to_vec()));
        }

        pos = end;
    }

    IconSet::new(entries)
}

/// Reads a four-byte type code followed by a big-endian u32 length.
fn read_header(data: &[u8], pos: usize) -> Result<([u8; 4], usize), IconError> {
    let Some(bytes) = data.get(pos..pos + HEADER_LEN) else {
        return Err(IconError::Format(format!(
            "unexpected end of data reading header at pos {pos}"
        )));
    };

    let ostype = [bytes[0], bytes[1], bytes[2], bytes[3]];
    let len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    Ok((ostype, len))
}
