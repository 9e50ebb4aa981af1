//! Stream handler serving JSON fixtures from disk.
//!
//! Looks up `<fixtures_dir>/<stream type>/<stream id>.json` first and falls
//! back to `<fixtures_dir>/<stream type>.json`. Payloads are served whole;
//! trimming to `limit` is left to the optimizer chain.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use catwalk_core::{
    application::{StreamError, ports::StreamHandler},
    domain::{Context, Parameters, Stream},
};

/// Serves one stream type from fixture files.
#[derive(Debug, Clone)]
pub struct FixtureStreamHandler {
    stream_type: String,
    fixtures_dir: PathBuf,
}

impl FixtureStreamHandler {
    pub fn new(stream_type: impl Into<String>, fixtures_dir: impl Into<PathBuf>) -> Self {
        Self {
            stream_type: stream_type.into(),
            fixtures_dir: fixtures_dir.into(),
        }
    }

    /// One handler per fixture kind found in `fixtures_dir`.
    ///
    /// Both `<type>.json` files and `<type>/` directories register `<type>`.
    pub fn discover(fixtures_dir: &Path) -> std::io::Result<Vec<Self>> {
        let mut stream_types = Vec::new();
        for entry in std::fs::read_dir(fixtures_dir)? {
            let path = entry?.path();
            let stream_type = if path.is_dir() {
                path.file_name()
            } else if path.extension().is_some_and(|ext| ext == "json") {
                path.file_stem()
            } else {
                None
            };
            if let Some(stream_type) = stream_type.and_then(|s| s.to_str()) {
                stream_types.push(stream_type.to_string());
            }
        }
        stream_types.sort();
        stream_types.dedup();

        Ok(stream_types
            .into_iter()
            .map(|stream_type| Self::new(stream_type, fixtures_dir))
            .collect())
    }

    /// Stream ids name a file inside the type directory and must not
    /// leave it.
    async fn fixture_path(&self, stream_id: &str) -> Result<PathBuf, StreamError> {
        if stream_id.is_empty()
            || stream_id.contains(['/', '\\'])
            || stream_id == "."
            || stream_id == ".."
        {
            return Err(StreamError::new(format!(
                "Invalid stream id for fixture lookup: {stream_id:?}"
            )));
        }

        let specific = self
            .fixtures_dir
            .join(&self.stream_type)
            .join(format!("{stream_id}.json"));
        if tokio::fs::try_exists(&specific).await? {
            return Ok(specific);
        }
        Ok(self.fixtures_dir.join(format!("{}.json", self.stream_type)))
    }
}

#[async_trait]
impl StreamHandler for FixtureStreamHandler {
    fn stream_type(&self) -> &str {
        &self.stream_type
    }

    async fn handle(
        &self,
        stream: &Stream,
        _context: &Context,
        _parameters: &Parameters,
    ) -> Result<Value, StreamError> {
        let path = self.fixture_path(&stream.stream_id).await?;
        debug!(path = %path.display(), "Reading stream fixture");

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StreamError::from(e).with_trace(format!("fixture: {}", path.display())))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
