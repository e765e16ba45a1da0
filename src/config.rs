use std::path::Path;

use serde::Deserialize;

use chacharng::Error;

const DEFAULT_CONFIG_PATH: &str = "/etc/chacharng.toml";

/// Upper bound on values drawn per invocation.
pub const MAX_COUNT: usize = 1 << 20;

/// Size of each drawn value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Width {
    /// 32-bit words
    U32,
    /// 64-bit words
    U64,
    /// Raw keystream bytes
    Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Decimal, one word per line (bytes: space separated)
    Decimal,
    /// Zero-padded lowercase hexadecimal
    Hex,
    /// Zero-padded uppercase hexadecimal
    HexUpper,
    /// Base64 (standard, with padding) of the little-endian bytes
    Base64,
    /// Base64 URL-safe (no padding) of the little-endian bytes
    Base64url,
    /// Little-endian bytes, unencoded
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: i64,
    pub count: usize,
    pub width: Width,
    pub format: OutputFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            count: 16,
            width: Width::U32,
            format: OutputFormat::Decimal,
        }
    }
}

impl GeneratorConfig {
    /// Clamp fields to valid ranges.
    pub fn validate(&mut self) {
        self.count = self.count.clamp(1, MAX_COUNT);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
}

/// Load configuration from a TOML file.
///
/// - If `explicit_path` is `Some` and the file is missing, returns an error.
/// - If `explicit_path` is `None`, tries `/etc/chacharng.toml`; if missing, returns defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, Error> {
    let path = match explicit_path {
        Some(p) => {
            if !p.exists() {
                return Err(Error::InvalidArgs(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok(Config::default());
            }
            default.to_path_buf()
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        Error::InvalidArgs(format!("failed to read config {}: {}", path.display(), e))
    })?;

    parse_config(&contents)
        .map_err(|e| Error::InvalidArgs(format!("failed to parse config {}: {}", path.display(), e)))
}

fn parse_config(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.seed, 0);
        assert_eq!(cfg.count, 16);
        assert_eq!(cfg.width, Width::U32);
        assert_eq!(cfg.format, OutputFormat::Decimal);
    }

    #[test]
    fn test_validate_clamps() {
        let mut cfg = GeneratorConfig {
            count: 0,
            ..Default::default()
        };
        cfg.validate();
        assert_eq!(cfg.count, 1);

        cfg.count = usize::MAX;
        cfg.validate();
        assert_eq!(cfg.count, MAX_COUNT);
    }

    #[test]
    fn test_parse_kebab_case_enums() {
        let config = parse_config(
            r#"
[generator]
seed = -12
width = "u64"
format = "hex-upper"
"#,
        )
        .unwrap();
        assert_eq!(config.generator.seed, -12);
        assert_eq!(config.generator.width, Width::U64);
        assert_eq!(config.generator.format, OutputFormat::HexUpper);
        assert_eq!(config.generator.count, 16);
    }

    #[test]
    fn test_parse_rejects_unknown_width() {
        assert!(parse_config("[generator]\nwidth = \"u16\"\n").is_err());
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.generator.count, 16);
    }

    #[test]
    fn test_toml_file_loading() {
        let path = std::env::temp_dir().join("chacharng_test_config.toml");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(
                f,
                r#"
[generator]
seed = 42
count = 4
format = "base64url"
"#
            )
            .unwrap();
        }
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.count, 4);
        assert_eq!(config.generator.format, OutputFormat::Base64url);
        // Unset fields should get defaults
        assert_eq!(config.generator.width, Width::U32);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_config_errors() {
        let path = Path::new("/tmp/chacharng_nonexistent_config.toml");
        assert!(matches!(load_config(Some(path)), Err(Error::InvalidArgs(_))));
    }
}
