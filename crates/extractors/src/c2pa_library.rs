//! In-process content-credential reader (optional `c2pa-library` feature).

use crate::manifest::apply_manifest_store;
use crate::pipeline::Extractor;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use synthprobe_common::Result;
use synthprobe_record_schema::provenance::CredentialSource;
use synthprobe_record_schema::MediaRecord;
use tracing::debug;

/// Preferred credential reader: no external binary, exact SDK parsing.
pub struct C2paLibraryExtractor;

impl C2paLibraryExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for C2paLibraryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for C2paLibraryExtractor {
    fn name(&self) -> &'static str {
        "c2pa-library"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn is_available(&self) -> bool {
        // Compiled in means usable.
        true
    }

    async fn extract(&self, path: &Path, record: &mut MediaRecord) -> Result<()> {
        let reader = match c2pa::Reader::from_file(path) {
            Ok(reader) => reader,
            Err(c2pa::Error::JumbfNotFound) => return Ok(()),
            Err(e) => {
                // Unreadable or non-credentialed container, not a pipeline
                // failure.
                debug!("credential read failed: {e}");
                return Ok(());
            }
        };
        match serde_json::from_str::<Value>(&reader.json()) {
            Ok(store) => apply_manifest_store(&store, CredentialSource::Library, record),
            Err(e) => debug!("unparseable credential report: {e}"),
        }
        Ok(())
    }
}
