//! INI parsing logic for converting `Ini` → `ConfigFile`.

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::texture::CompressionFormat;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [pool] section
    if let Some(section) = ini.section(Some("pool")) {
        if let Some(v) = section.get("threads") {
            config.pool.threads = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "pool".to_string(),
                key: "threads".to_string(),
                value: v.to_string(),
                reason: "must be a non-negative integer (0 = one per core)".to_string(),
            })?;
        }
    }

    // [compression] section
    if let Some(section) = ini.section(Some("compression")) {
        if let Some(v) = section.get("format") {
            config.compression.format =
                v.parse::<CompressionFormat>()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "compression".to_string(),
                        key: "format".to_string(),
                        value: v.to_string(),
                        reason: "must be one of: bc5, bc6h, bc7".to_string(),
                    })?;
        }
        if let Some(v) = section.get("quality") {
            config.compression.quality = parse_quality(v)?;
        }
        if let Some(v) = section.get("alpha") {
            config.compression.alpha = parse_bool(v).ok_or_else(|| ConfigFileError::InvalidValue {
                section: "compression".to_string(),
                key: "alpha".to_string(),
                value: v.to_string(),
                reason: "must be true or false".to_string(),
            })?;
        }
    }

    Ok(config)
}

fn parse_quality(v: &str) -> Result<f32, ConfigFileError> {
    let invalid = || ConfigFileError::InvalidValue {
        section: "compression".to_string(),
        key: "quality".to_string(),
        value: v.to_string(),
        reason: "must be a number between 0.0 and 1.0".to_string(),
    };
    let quality: f32 = v.trim().parse().map_err(|_| invalid())?;
    if !(0.0..=1.0).contains(&quality) {
        return Err(invalid());
    }
    Ok(quality)
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
