//! ISO BMFF (MP4/MOV) box-structure parsing.
//!
//! Walks the box tree of a container file into a flat, depth-annotated list
//! of records for the evidence record's raw section. The walk is total: any
//! malformed or truncated input terminates the scan cleanly, and I/O
//! failures surface as a single in-band error marker instead of an error
//! return. Nothing here touches external tools.

pub mod parser;
pub mod strings;

pub use parser::{
    is_mp4_family, parse_bytes, parse_file, parse_reader, BoxRecord, DEFAULT_MAX_DEPTH,
    MP4_EXTENSIONS,
};
pub use strings::scan_strings;
