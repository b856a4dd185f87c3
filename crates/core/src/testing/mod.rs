//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the external prober and encoder so the whole pipeline
//! can be exercised without `ffprobe` or `ffmpeg` installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use ladderline_core::testing::{MockExecutor, MockProber};
//!
//! let prober = Arc::new(MockProber::returning(SourceResolution::new(1920, 1080)));
//! let executor = Arc::new(MockExecutor::new());
//!
//! // Make the next encode fail
//! executor.set_next_error(EncodeError::failed(Some(1), "boom")).await;
//! ```

mod mock_executor;
mod mock_prober;

pub use mock_executor::{MockExecutor, RecordedExecution};
pub use mock_prober::MockProber;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::ladder::SourceResolution;

    /// A 1920x1080 source, which selects the full standard ladder.
    pub fn full_hd() -> SourceResolution {
        SourceResolution::new(1920, 1080)
    }

    /// A source below the lowest standard rung.
    pub fn too_small() -> SourceResolution {
        SourceResolution::new(200, 100)
    }

    /// Writes a placeholder upload into `dir` and returns its path.
    pub fn write_fake_upload(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, b"\x00\x00\x00\x18ftypmp42")?;
        Ok(path)
    }

    /// A minimal VOD playlist over the given segment file names.
    pub fn hls_manifest(segment_names: &[String], segment_duration_secs: u32) -> String {
        let mut manifest = format!(
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:{}\n#EXT-X-MEDIA-SEQUENCE:0\n#EXT-X-PLAYLIST-TYPE:VOD\n",
            segment_duration_secs
        );
        for name in segment_names {
            manifest.push_str(&format!("#EXTINF:{}.000000,\n{}\n", segment_duration_secs, name));
        }
        manifest.push_str("#EXT-X-ENDLIST\n");
        manifest
    }
}
