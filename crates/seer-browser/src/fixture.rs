//! Embedded upload fixture
//!
//! The verification scenario always uploads the same tiny image, so the
//! payload is compiled in rather than read from disk. It is materialized
//! into a temporary directory because file inputs are fed a real path.

use seer_core::{Result, SeerError};
use base64::engine::general_purpose;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// File name the analyzer sees for the uploaded fixture
pub const FIXTURE_FILE_NAME: &str = "test.png";

/// Base64-encoded 1x1 transparent PNG
const FIXTURE_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

/// Decode the embedded payload
pub fn fixture_bytes() -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(FIXTURE_BASE64)
        .map_err(|e| SeerError::Fixture(format!("Invalid embedded payload: {}", e)))
}

/// Fixture image written to a temporary location for upload
///
/// The backing directory is removed when the fixture is dropped, so keep it
/// alive until the upload step has completed.
pub struct UploadFixture {
    /// Owns the on-disk location (removed on drop)
    #[allow(dead_code)]
    dir: TempDir,
    path: PathBuf,
}

impl UploadFixture {
    /// Write the embedded payload to a temporary `test.png`
    pub fn materialize() -> Result<Self> {
        let data = fixture_bytes()?;

        let dir = tempfile::tempdir()
            .map_err(|e| SeerError::Fixture(format!("Failed to create fixture dir: {}", e)))?;
        let path = dir.path().join(FIXTURE_FILE_NAME);
        std::fs::write(&path, &data)?;

        debug!("Fixture materialized at {} ({} bytes)", path.display(), data.len());

        Ok(Self { dir, path })
    }

    /// Path of the materialized fixture file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_fixture_bytes_is_valid_png() {
        let data = fixture_bytes().unwrap();
        assert!(data.len() > 8);
        assert_eq!(&data[..8], &PNG_SIGNATURE);
        // Well-formed PNGs end with an IEND chunk
        assert_eq!(&data[data.len() - 8..data.len() - 4], b"IEND");
    }

    #[test]
    fn test_materialize_writes_named_file() {
        let fixture = UploadFixture::materialize().unwrap();

        assert!(fixture.path().exists());
        assert_eq!(
            fixture.path().file_name().and_then(|n| n.to_str()),
            Some(FIXTURE_FILE_NAME)
        );
        assert_eq!(std::fs::read(fixture.path()).unwrap(), fixture_bytes().unwrap());
    }

    #[test]
    fn test_drop_removes_fixture() {
        let fixture = UploadFixture::materialize().unwrap();
        let path = fixture.path().to_path_buf();

        drop(fixture);
        assert!(!path.exists());
    }
}
