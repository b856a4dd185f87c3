//! Types for the encode module.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Encoder settings shared by every rendition of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// Video codec passed to `-c:v`.
    pub video_codec: String,
    /// Audio codec passed to `-c:a`.
    pub audio_codec: String,
    /// Target segment duration in seconds (`-hls_time`).
    pub segment_duration_secs: u32,
    /// HLS playlist type (`vod` or `event`).
    pub playlist_type: String,
    /// FFmpeg log level.
    pub log_level: String,
    /// Extra global arguments inserted before the input.
    pub extra_args: Vec<String>,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            segment_duration_secs: 10,
            playlist_type: "vod".to_string(),
            log_level: "error".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// One decoded-then-scaled rendition of the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub segment_pattern: PathBuf,
}

impl Branch {
    /// Pad name leaving the split filter.
    pub fn split_label(&self) -> &str {
        &self.label
    }

    /// Pad name leaving the scale filter, consumed by `-map`.
    pub fn scaled_label(&self) -> String {
        format!("v{}", self.label)
    }
}

/// `[input]split=N[out1][out2]...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitStage {
    pub input: String,
    pub outputs: Vec<String>,
}

/// `[input]scale=W:H[output]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleStage {
    pub input: String,
    pub width: u32,
    pub height: u32,
    pub output: String,
}

/// One `-map [stream] ... manifest` output section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMap {
    pub stream: String,
    pub manifest_path: PathBuf,
    pub segment_pattern: PathBuf,
}

/// A complete, validated description of one encoder run.
///
/// Split, scale and output stages are all derived from the same ordered
/// branch list, so their labels always agree position by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeSpec {
    input: PathBuf,
    branches: Vec<Branch>,
    settings: EncodeSettings,
}

/// Pad carrying the decoded video of the first input.
const SOURCE_VIDEO_PAD: &str = "0:v";

impl EncodeSpec {
    pub(super) fn new(input: PathBuf, branches: Vec<Branch>, settings: EncodeSettings) -> Self {
        Self {
            input,
            branches,
            settings,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    pub fn labels(&self) -> Vec<&str> {
        self.branches.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn output_dirs(&self) -> impl Iterator<Item = &Path> {
        self.branches.iter().map(|b| b.output_dir.as_path())
    }

    pub fn split_stage(&self) -> SplitStage {
        SplitStage {
            input: SOURCE_VIDEO_PAD.to_string(),
            outputs: self
                .branches
                .iter()
                .map(|b| b.split_label().to_string())
                .collect(),
        }
    }

    pub fn scale_stages(&self) -> Vec<ScaleStage> {
        self.branches
            .iter()
            .map(|b| ScaleStage {
                input: b.split_label().to_string(),
                width: b.width,
                height: b.height,
                output: b.scaled_label(),
            })
            .collect()
    }

    pub fn output_maps(&self) -> Vec<OutputMap> {
        self.branches
            .iter()
            .map(|b| OutputMap {
                stream: b.scaled_label(),
                manifest_path: b.manifest_path.clone(),
                segment_pattern: b.segment_pattern.clone(),
            })
            .collect()
    }

    /// Renders the `-filter_complex` graph.
    pub fn filter_graph(&self) -> String {
        let split = self.split_stage();
        let mut graph = format!("[{}]split={}", split.input, split.outputs.len());
        for output in &split.outputs {
            graph.push_str(&format!("[{}]", output));
        }

        for scale in self.scale_stages() {
            graph.push_str(&format!(
                ";[{}]scale={}:{}[{}]",
                scale.input, scale.width, scale.height, scale.output
            ));
        }

        graph
    }

    /// Renders the full encoder argument vector (without the program name).
    pub fn to_args(&self) -> Vec<OsString> {
        let settings = &self.settings;
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            settings.log_level.clone().into(),
        ];
        args.extend(settings.extra_args.iter().map(OsString::from));
        args.extend([
            "-i".into(),
            self.input.clone().into_os_string(),
            "-filter_complex".into(),
            self.filter_graph().into(),
        ]);

        for output in self.output_maps() {
            args.extend([
                OsString::from("-map"),
                format!("[{}]", output.stream).into(),
                "-map".into(),
                "0:a?".into(),
                "-c:v".into(),
                settings.video_codec.clone().into(),
                "-c:a".into(),
                settings.audio_codec.clone().into(),
                "-f".into(),
                "hls".into(),
                "-hls_time".into(),
                settings.segment_duration_secs.to_string().into(),
                "-hls_playlist_type".into(),
                settings.playlist_type.clone().into(),
                "-hls_segment_filename".into(),
                output.segment_pattern.into_os_string(),
                "-start_number".into(),
                "0".into(),
                output.manifest_path.into_os_string(),
            ]);
        }

        args
    }
}
