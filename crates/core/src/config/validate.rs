use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Output subdirectory is a single plain path component
/// - Segment duration and encoder concurrency are positive
/// - Manifest and segment extensions are non-empty alphanumeric
/// - Ladder rungs form a valid ladder
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Storage validation
    let subdir = &config.storage.output_subdir;
    if subdir.is_empty() || subdir == "." || subdir == ".." || subdir.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "storage.output_subdir must be a single directory name, got {:?}",
            subdir
        )));
    }

    // Encoder validation
    if config.encoder.segment_duration_secs == 0 {
        return Err(ConfigError::ValidationError(
            "encoder.segment_duration_secs must be greater than 0".to_string(),
        ));
    }
    if config.encoder.max_concurrent_jobs == 0 {
        return Err(ConfigError::ValidationError(
            "encoder.max_concurrent_jobs must be greater than 0".to_string(),
        ));
    }
    for (key, ext) in [
        ("manifest_extension", &config.encoder.manifest_extension),
        ("segment_extension", &config.encoder.segment_extension),
    ] {
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::ValidationError(format!(
                "encoder.{} must be non-empty and alphanumeric, got {:?}",
                key, ext
            )));
        }
    }

    // Ladder validation
    config.ladder()?;

    Ok(())
}
