//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[pool]
; Worker threads for block compression (0 = one per CPU core)
threads = {}

[compression]
; Block compression format:
;   bc5  - two channels (red/green), e.g. normal maps
;   bc6h - half-float RGB (HDR)
;   bc7  - high-quality RGBA
format = {}
; Encoder quality from 0.0 (fastest) to 1.0 (best)
quality = {}
; Use alpha-aware presets for BC7 (ignored by other formats)
alpha = {}
"#,
        config.pool.threads,
        config.compression.format.as_str(),
        config.compression.quality,
        config.compression.alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_string() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("threads = 0"));
        assert!(content.contains("format = bc7"));
        assert!(content.contains("quality = 0.5"));
        assert!(content.contains("alpha = false"));
    }
}
