//! Box-tree walker for MP4-family containers.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// File extensions treated as MP4-family containers.
pub const MP4_EXTENSIONS: &[&str] = &["mp4", "m4v", "m4a", "mov", "3gp", "3g2"];

/// Boxes whose payload is a sequence of child boxes.
const CONTAINER_BOXES: &[&str] = &[
    "moov", "trak", "mdia", "minf", "stbl", "udta", "meta", "ilst", "edts", "dinf", "sinf",
    "schi", "tref", "gmhd", "wave",
];

/// Boxes worth capturing a payload preview for.
const PREVIEW_BOXES: &[&str] = &["ftyp", "hdlr", "mvhd", "tkhd", "mdhd"];

/// Default recursion limit. Boxes at the limit are recorded, not descended.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

const HEADER_LEN: u64 = 8;
const EXTENDED_HEADER_LEN: u64 = 16;
const PREVIEW_CAP: u64 = 256;
const PREVIEW_HEX_CHARS: usize = 100;

/// One parsed box, flattened out of the tree with its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRecord {
    #[serde(rename = "type")]
    pub box_type: String,
    pub size: u64,
    pub offset: u64,
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_preview: Option<String>,
}

/// Check whether a path's extension marks an MP4-family container.
pub fn is_mp4_family(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MP4_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Parse the box structure of a file.
///
/// An unopenable or unreadable file yields a single error-marker record;
/// this never returns an error.
pub fn parse_file(path: &Path, max_depth: u32) -> Vec<BoxRecord> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return vec![error_record(&e)],
    };
    let len = match file.metadata() {
        Ok(m) => m.len(),
        Err(e) => return vec![error_record(&e)],
    };
    parse_reader(BufReader::new(file), len, max_depth)
}

/// Parse the box structure of an in-memory buffer.
pub fn parse_bytes(data: &[u8], max_depth: u32) -> Vec<BoxRecord> {
    parse_reader(Cursor::new(data), data.len() as u64, max_depth)
}

/// Parse boxes from any seekable byte source spanning `len` bytes.
///
/// Malformed sizes terminate the scan of the enclosing range without error;
/// an I/O failure mid-walk appends one error-marker record after whatever
/// was already parsed.
pub fn parse_reader<R: Read + Seek>(mut reader: R, len: u64, max_depth: u32) -> Vec<BoxRecord> {
    let mut records = Vec::new();
    if let Err(e) = walk(&mut reader, 0, len, 0, max_depth, &mut records) {
        records.push(error_record(&e));
    }
    records
}

fn walk<R: Read + Seek>(
    reader: &mut R,
    start: u64,
    end: u64,
    depth: u32,
    max_depth: u32,
    records: &mut Vec<BoxRecord>,
) -> std::io::Result<()> {
    let mut pos = start;
    while pos.checked_add(HEADER_LEN).map(|p| p <= end).unwrap_or(false) {
        reader.seek(SeekFrom::Start(pos))?;
        let mut header = [0u8; 8];
        reader.read_exact(&mut header)?;
        let size32 = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as u64;
        let box_type = decode_box_type(&header[4..8]);

        let mut header_len = HEADER_LEN;
        let size = match size32 {
            // Box runs to the end of the enclosing range.
            0 => end - pos,
            // 64-bit size follows the type field.
            1 => {
                if pos + EXTENDED_HEADER_LEN > end {
                    break;
                }
                let mut ext = [0u8; 8];
                reader.read_exact(&mut ext)?;
                header_len = EXTENDED_HEADER_LEN;
                u64::from_be_bytes(ext)
            }
            n => n,
        };
        if size < header_len {
            break;
        }
        let box_end = match pos.checked_add(size) {
            Some(e) if e <= end => e,
            _ => break,
        };

        let data_preview = if PREVIEW_BOXES.contains(&box_type.as_str()) {
            Some(read_preview(reader, size - header_len)?)
        } else {
            None
        };
        records.push(BoxRecord {
            box_type: box_type.clone(),
            size,
            offset: pos,
            depth,
            data_preview,
        });

        if depth < max_depth && CONTAINER_BOXES.contains(&box_type.as_str()) {
            let mut child_start = pos + header_len;
            // meta carries a 4-byte version/flags field before its children.
            if box_type == "meta" {
                child_start += 4;
            }
            if child_start < box_end {
                walk(reader, child_start, box_end, depth + 1, max_depth, records)?;
            }
        }

        pos = box_end;
    }
    Ok(())
}

/// Box types are four bytes, nominally ASCII; decode permissively so that
/// odd vendor boxes (e.g. Apple's 0xa9-prefixed tags) still render.
fn decode_box_type(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn read_preview<R: Read>(reader: &mut R, payload_len: u64) -> std::io::Result<String> {
    let take = payload_len.min(PREVIEW_CAP) as usize;
    let mut buf = vec![0u8; take];
    reader.read_exact(&mut buf)?;
    let mut preview = hex::encode(buf);
    preview.truncate(PREVIEW_HEX_CHARS);
    Ok(preview)
}

fn error_record(e: &std::io::Error) -> BoxRecord {
    BoxRecord {
        box_type: "error".to_string(),
        size: 0,
        offset: 0,
        depth: 0,
        data_preview: Some(e.to_string()),
    }
}
