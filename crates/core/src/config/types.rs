use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use super::ConfigError;
use crate::encode::EncodeSettings;
use crate::ladder::{Ladder, Resolution};
use crate::planner::LayoutConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    /// Rungs in ascending order; `[[ladder]]` tables in TOML.
    #[serde(default = "default_ladder")]
    pub ladder: Vec<Resolution>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            encoder: EncoderConfig::default(),
            ladder: default_ladder(),
        }
    }
}

impl Config {
    /// Builds the validated ladder.
    pub fn ladder(&self) -> Result<Ladder, ConfigError> {
        Ladder::new(self.ladder.clone())
            .map_err(|e| ConfigError::ValidationError(format!("ladder: {}", e)))
    }

    /// `uploads_dir/output_subdir`
    pub fn output_root(&self) -> PathBuf {
        self.storage.uploads_dir.join(&self.storage.output_subdir)
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            output_root: self.output_root(),
            manifest_extension: self.encoder.manifest_extension.clone(),
            segment_extension: self.encoder.segment_extension.clone(),
        }
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            video_codec: self.encoder.video_codec.clone(),
            audio_codec: self.encoder.audio_codec.clone(),
            segment_duration_secs: self.encoder.segment_duration_secs,
            playlist_type: self.encoder.playlist_type.clone(),
            log_level: self.encoder.log_level.clone(),
            extra_args: self.encoder.extra_args.clone(),
        }
    }

    /// Public URL prefix of job directories: `<public>/uploads/<output_subdir>`.
    pub fn artifact_base_url(&self) -> String {
        format!(
            "{}/uploads/{}",
            self.server.public_base_url(),
            self.storage.output_subdir
        )
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Upper bound on the request body of an upload.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// URL clients use to reach this server (default: `http://localhost:<port>`).
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload_bytes(),
            public_base_url: None,
        }
    }
}

impl ServerConfig {
    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_max_upload_bytes() -> u64 {
    2 * 1024 * 1024 * 1024
}

/// Where uploads and rendition trees live on disk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Received uploads; also the root served under `/uploads`.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Subdirectory of `uploads_dir` holding one directory per job.
    #[serde(default = "default_output_subdir")]
    pub output_subdir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            output_subdir: default_output_subdir(),
        }
    }
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_output_subdir() -> String {
    "courses".to_string()
}

/// External encoder configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    /// HLS segment length in seconds (default: 10)
    #[serde(default = "default_segment_duration")]
    pub segment_duration_secs: u32,
    #[serde(default = "default_playlist_type")]
    pub playlist_type: String,
    #[serde(default = "default_manifest_extension")]
    pub manifest_extension: String,
    #[serde(default = "default_segment_extension")]
    pub segment_extension: String,
    /// FFmpeg `-loglevel`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Extra global FFmpeg arguments, inserted before the input.
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Kill the encoder after this many seconds (default: unbounded)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Encoder processes allowed to run at once (default: 2)
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            segment_duration_secs: default_segment_duration(),
            playlist_type: default_playlist_type(),
            manifest_extension: default_manifest_extension(),
            segment_extension: default_segment_extension(),
            log_level: default_log_level(),
            extra_args: Vec::new(),
            timeout_secs: None,
            max_concurrent_jobs: default_max_concurrent_jobs(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_segment_duration() -> u32 {
    10
}

fn default_playlist_type() -> String {
    "vod".to_string()
}

fn default_manifest_extension() -> String {
    "m3u8".to_string()
}

fn default_segment_extension() -> String {
    "ts".to_string()
}

fn default_log_level() -> String {
    "error".to_string()
}

fn default_max_concurrent_jobs() -> usize {
    2
}

fn default_ladder() -> Vec<Resolution> {
    Ladder::standard().rungs().to_vec()
}
