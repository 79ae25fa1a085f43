//! Printable-string extraction from container files.
//!
//! Media files carry provenance breadcrumbs as loose ASCII (XMP packets,
//! manifest labels, encoder banners). This scans for printable runs the way
//! `strings(1)` would; the caller supplies the relevance filter so this
//! crate stays free of lexicon knowledge.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Scan a file for printable-ASCII runs.
///
/// Runs shorter than `min_len` or longer than `max_len` are dropped, the
/// rest are offered to `keep`; scanning stops once `limit` strings were
/// accepted. Overlong runs are discarded, not truncated, so binary noise
/// does not masquerade as text.
pub fn scan_strings<F>(
    path: &Path,
    min_len: usize,
    max_len: usize,
    limit: usize,
    keep: F,
) -> std::io::Result<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut out = Vec::new();
    let mut run = String::new();
    let mut overlong = false;
    let mut buf = [0u8; 65536];

    loop {
        let n = reader.read(&mut buf)?;
        let chunk: &[u8] = &buf[..n];
        for &b in chunk {
            if (0x20..=0x7e).contains(&b) {
                if run.len() <= max_len {
                    run.push(b as char);
                } else {
                    overlong = true;
                }
            } else {
                flush_run(&mut run, &mut overlong, min_len, max_len, &keep, &mut out);
                if out.len() >= limit {
                    return Ok(out);
                }
            }
        }
        if n == 0 {
            break;
        }
    }
    flush_run(&mut run, &mut overlong, min_len, max_len, &keep, &mut out);
    Ok(out)
}

fn flush_run<F>(
    run: &mut String,
    overlong: &mut bool,
    min_len: usize,
    max_len: usize,
    keep: &F,
    out: &mut Vec<String>,
) where
    F: Fn(&str) -> bool,
{
    if !run.is_empty() {
        let within = !*overlong && run.len() >= min_len && run.len() <= max_len;
        if within && keep(run.as_str()) {
            out.push(std::mem::take(run));
        } else {
            run.clear();
        }
    }
    *overlong = false;
}
