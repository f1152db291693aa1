//! Code view configuration, read from TOML.
//!
//! ```toml
//! sign_group = "DapCode"
//! toolbar = true
//!
//! [program_counter]
//! name = "DapPC"
//! text = ">"
//! double_text = ">"
//! texthl = "Search"
//! linehl = "CursorLine"
//! ```
//!
//! Missing top-level keys take their defaults. A sign table, when present, must be complete.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use eyre::WrapErr;
use serde::{Deserialize, Serialize};

use crate::signs::SignDefinition;

const DEFAULT_SIGN_GROUP: &str = "DapCode";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Prefix of the sign group the program counter is placed in; the viewport id is appended
    pub sign_group: String,
    /// Install the session toolbar in the code window when the host supports one
    pub toolbar: bool,
    pub program_counter: SignDefinition,
    pub program_counter_on_breakpoint: SignDefinition,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sign_group: DEFAULT_SIGN_GROUP.to_string(),
            toolbar: true,
            program_counter: SignDefinition::program_counter(),
            program_counter_on_breakpoint: SignDefinition::program_counter_on_breakpoint(),
        }
    }
}

impl FromStr for Config {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config = toml::from_str(s).wrap_err("parsing code view configuration")?;
        Ok(config)
    }
}

impl Config {
    /// `<config dir>/dap-framesync/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dap-framesync").join("config.toml"))
    }

    pub fn load_from(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading configuration {}", path.display()))?;
        contents.parse()
    }

    /// Load `path` (or the default location), falling back to defaults if there is no file
    pub fn load_or_default(path: Option<&Path>) -> eyre::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    tracing::debug!("no configuration directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(path = %path.display(), "loading configuration");
        Self::load_from(&path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::signs::PROGRAM_COUNTER_ON_BREAKPOINT;

    #[test]
    fn empty_is_default() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_override() {
        let config: Config = r#"
            toolbar = false

            [program_counter]
            name = "Pc"
            text = ">"
            double_text = ">"
            texthl = "Search"
            linehl = "Visual"
        "#
        .parse()
        .unwrap();

        assert!(!config.toolbar);
        assert_eq!(config.sign_group, "DapCode");
        assert_eq!(config.program_counter.name, "Pc");
        assert_eq!(config.program_counter.linehl, "Visual");
        assert_eq!(
            config.program_counter_on_breakpoint.name,
            PROGRAM_COUNTER_ON_BREAKPOINT
        );
    }

    #[test]
    fn incomplete_sign_table_is_rejected() {
        let result: eyre::Result<Config> = "[program_counter]\ntext = \">\"\n".parse();
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sign_group = \"Mine\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.sign_group, "Mine");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }
}
