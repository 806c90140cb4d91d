use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

/// Settings file read when none is given on the command line.
pub static DEFAULT_SETTINGS_PATH: &str = "atomtools.toml";

fn default_format() -> String {
    "tsv".into()
}

fn default_buffer_size() -> usize {
    8192 * 1024
}

/// Configuration for extracted output.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Output {
    /// One of `tsv`, `jsonl` or `xml`.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            format: default_format(),
            buffer_size: default_buffer_size(),
        }
    }
}

/// Configuration for feed sources.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Input {
    #[serde(default)]
    pub feeds: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub input: Input,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let mut settings = Config::new();
        settings.merge(File::with_name(path).required(false))?;
        settings.try_into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("absent.toml");
        let settings = Settings::new(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.output.format, "tsv");
        assert_eq!(settings.output.buffer_size, 8192 * 1024);
        assert!(settings.input.feeds.is_empty());
    }

    #[test]
    fn test_reads_toml_file() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("atomtools.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[output]\nformat = \"jsonl\"\n\n[input]\nfeeds = [\"a.xml\", \"b.xml.bz2\"]"
        )
        .unwrap();
        drop(file);

        let settings = Settings::new(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.output.format, "jsonl");
        assert_eq!(settings.output.buffer_size, 8192 * 1024);
        assert_eq!(
            settings.input.feeds,
            vec![PathBuf::from("a.xml"), PathBuf::from("b.xml.bz2")]
        );
    }
}
