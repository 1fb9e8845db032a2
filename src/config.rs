use crate::error::{Result, VttError};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Files searched, in order, by [`Config::load`].
const CONFIG_PATHS: [&str; 2] = ["./vttio.toml", "./config.toml"];

/// Settings for the caption track produced by the WebVTT pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Track id announced in the stream info.
    pub track_id: u32,
    /// Ticks per second of cue timestamps. WebVTT times are milliseconds.
    pub time_scale: u32,
    /// BCP-47 language tag of the caption track.
    pub language: String,
    /// Bytes requested per read by the demuxer.
    pub read_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            track_id: 1,
            time_scale: 1000,
            language: String::from("und"),
            read_chunk_size: 4096,
        }
    }
}

impl Config {
    /// Builds a config from defaults, the first config file found in the
    /// working directory, and `VTTIO_*` environment overrides, in that order.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        for path in &CONFIG_PATHS {
            if let Ok(content) = std::fs::read_to_string(path) {
                log::debug!("Loading config from {}", path);
                config = Config::from_toml_str(&content)?;
                break;
            }
        }

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing keys keep their default values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = env::var("VTTIO_TRACK_ID") {
            self.track_id = v.trim().parse()?;
        }
        if let Ok(v) = env::var("VTTIO_TIME_SCALE") {
            self.time_scale = v.trim().parse()?;
        }
        if let Ok(v) = env::var("VTTIO_LANGUAGE") {
            let v = v.trim();
            if !v.is_empty() {
                self.language = v.to_string();
            }
        }
        if let Ok(v) = env::var("VTTIO_READ_CHUNK_SIZE") {
            self.read_chunk_size = v.trim().parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.time_scale == 0 {
            return Err(VttError::Config("time_scale must be non-zero".into()));
        }
        if self.read_chunk_size == 0 {
            return Err(VttError::Config("read_chunk_size must be non-zero".into()));
        }
        Ok(())
    }
}

/// Creates a default config template file if it doesn't exist
pub fn create_default_config_template<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    if !path.as_ref().exists() {
        let template = r#"# vttio configuration

# Track id announced for the caption stream
track_id = 1

# Cue timestamps are milliseconds
time_scale = 1000

# Caption language
language = "und"

# Bytes read per demuxer read call
read_chunk_size = 4096
"#;
        std::fs::write(path, template)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("language = \"en\"\n").unwrap();
        assert_eq!(
            config,
            Config {
                language: "en".into(),
                ..Config::default()
            }
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("track_id = \"one\""),
            Err(VttError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("read_chunk_size = 0"),
            Err(VttError::Config(_))
        ));
    }

    #[test]
    fn test_template_parses() {
        let dir = std::env::temp_dir().join(format!("vttio-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vttio.toml");
        let _ = std::fs::remove_file(&path);

        create_default_config_template(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Config::from_toml_str(&content).unwrap(), Config::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
