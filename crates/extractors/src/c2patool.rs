//! Content-credential fallback backed by the c2patool CLI.

use crate::config::AnalysisConfig;
use crate::manifest::apply_manifest_store;
use crate::pipeline::Extractor;
use crate::tool;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use synthprobe_common::Result;
use synthprobe_record_schema::provenance::CredentialSource;
use synthprobe_record_schema::MediaRecord;
use tracing::debug;

const C2PATOOL_BIN: &str = "c2patool";

/// Credential reader of last resort. Runs only when the in-process reader
/// has not already recorded a credential; first successful writer wins.
pub struct C2paToolExtractor {
    timeout_seconds: u64,
}

impl C2paToolExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            timeout_seconds: config.c2patool_timeout_seconds,
        }
    }
}

#[async_trait]
impl Extractor for C2paToolExtractor {
    fn name(&self) -> &'static str {
        "c2patool"
    }

    fn priority(&self) -> u32 {
        25
    }

    fn is_available(&self) -> bool {
        tool::binary_available(C2PATOOL_BIN)
    }

    async fn extract(&self, path: &Path, record: &mut MediaRecord) -> Result<()> {
        if record.provenance.credential.has_credential {
            debug!("credential already recorded, skipping CLI reader");
            return Ok(());
        }

        let output =
            tool::run_tool_on_file(C2PATOOL_BIN, &[], path, self.timeout_seconds).await?;

        // c2patool exits non-zero when the file carries no manifest; that is
        // an answer, not a failure.
        if !output.success() || output.stdout.trim().is_empty() {
            debug!("no content credential reported: {}", output.stderr.trim());
            return Ok(());
        }

        match serde_json::from_str::<Value>(&output.stdout) {
            Ok(store) => apply_manifest_store(&store, CredentialSource::Cli, record),
            Err(e) => debug!("unparseable c2patool output: {e}"),
        }
        Ok(())
    }
}
