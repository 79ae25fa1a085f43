//! Audit-bundle writing and reading.
//!
//! A bundle archives one analysis for handoff: the record, the raw
//! collaborator outputs as separate entries, the run report with timings,
//! and a checksum table. Run identity and wall-clock data live only here;
//! the record itself stays byte-stable across runs.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use synthprobe_common::hash::{sha256_bytes, sha256_file};
use synthprobe_common::Timestamp;
use synthprobe_extractors::Analysis;
use tar::{Archive, Builder};
use tracing::info;
use uuid::Uuid;

/// Top-level manifest entry (`bundle.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    pub bundle_id: String,
    pub created: String,
    pub source_path: String,
    /// Hash of the analyzed media file, when it is still readable at
    /// bundling time.
    pub source_sha256: Option<String>,
    pub entries: Vec<String>,
}

/// Write one analysis as a compressed tar bundle.
pub fn write_bundle(analysis: &Analysis, path: &Path) -> Result<()> {
    let entries = collect_entries(analysis)?;

    let checksums: BTreeMap<&str, String> = entries
        .iter()
        .map(|(name, content)| (name.as_str(), sha256_bytes(content)))
        .collect();

    let source_path = analysis.record.file_info.path.clone();
    let manifest = BundleManifest {
        bundle_id: Uuid::new_v4().to_string(),
        created: Timestamp::now().to_iso8601(),
        source_sha256: sha256_file(Path::new(&source_path)).ok(),
        source_path,
        entries: entries.iter().map(|(name, _)| name.clone()).collect(),
    };

    let file = File::create(path).context("Failed to create bundle file")?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut archive = Builder::new(encoder);

    add_file_to_archive(
        &mut archive,
        "bundle.json",
        &serde_json::to_vec_pretty(&manifest)?,
    )?;
    for (name, content) in &entries {
        add_file_to_archive(&mut archive, name, content)?;
    }
    add_file_to_archive(
        &mut archive,
        "checksums.json",
        &serde_json::to_vec_pretty(&checksums)?,
    )?;

    archive.finish()?;
    info!("Audit bundle written to {}", path.display());

    Ok(())
}

/// Everything that goes into the archive besides the manifest and checksum
/// table. Raw entries are emitted only for collaborators that produced
/// output.
fn collect_entries(analysis: &Analysis) -> Result<Vec<(String, Vec<u8>)>> {
    let mut entries: Vec<(String, Vec<u8>)> = Vec::new();

    entries.push((
        "record.json".to_string(),
        serde_json::to_vec_pretty(&analysis.record)?,
    ));
    entries.push((
        "runs.json".to_string(),
        serde_json::to_vec_pretty(&analysis.runs)?,
    ));

    let raw = &analysis.record.raw;
    if let Some(ffprobe) = &raw.ffprobe {
        entries.push((
            "raw/ffprobe.json".to_string(),
            serde_json::to_vec_pretty(ffprobe)?,
        ));
    }
    if let Some(exiftool) = &raw.exiftool {
        entries.push((
            "raw/exiftool.json".to_string(),
            serde_json::to_vec_pretty(exiftool)?,
        ));
    }
    if let Some(manifest_store) = &raw.c2pa_manifest {
        entries.push((
            "raw/c2pa.json".to_string(),
            serde_json::to_vec_pretty(manifest_store)?,
        ));
    }
    if !raw.box_structure.is_empty() {
        entries.push((
            "boxes.json".to_string(),
            serde_json::to_vec_pretty(&raw.box_structure)?,
        ));
    }
    if !raw.strings.is_empty() {
        entries.push((
            "strings.txt".to_string(),
            raw.strings.join("\n").into_bytes(),
        ));
    }

    Ok(entries)
}

fn add_file_to_archive<W: Write>(
    archive: &mut Builder<W>,
    path: &str,
    content: &[u8],
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();

    archive.append_data(&mut header, path, content)?;
    Ok(())
}

/// Read a bundle back as its named entries.
pub fn read_bundle(path: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
    let file = File::open(path).context("Failed to open bundle file")?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);

    let mut entries = BTreeMap::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().to_string();
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        entries.insert(name, content);
    }
    Ok(entries)
}
