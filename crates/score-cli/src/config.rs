use analysis_core::SectorMedians;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One compact JSON object per line
    Json,
    Pretty,
    Text,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            "text" => Ok(OutputFormat::Text),
            other => bail!("unknown output format '{}' (expected json, pretty or text)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    // Request bundles; stdin when empty
    pub inputs: Vec<PathBuf>,

    // Sector used when a request names none
    pub default_sector: Option<String>,

    // JSON SectorMedians that replaces the sector table for every request
    pub medians_file: Option<PathBuf>,

    pub output: OutputFormat,

    // Fixed scoring timestamp, for reproducible output
    pub at: Option<DateTime<Utc>>,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            inputs: Vec::new(),
            default_sector: non_empty("LICIAN_DEFAULT_SECTOR"),
            medians_file: non_empty("LICIAN_MEDIANS_FILE").map(PathBuf::from),
            output: non_empty("LICIAN_OUTPUT")
                .unwrap_or_else(|| "json".to_string())
                .parse()
                .context("invalid LICIAN_OUTPUT")?,
            at: None,
        })
    }

    /// Apply command-line flags on top of the environment values.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut iter = args.iter();
        while let Some(flag) = iter.next() {
            let mut value = || {
                iter.next()
                    .cloned()
                    .with_context(|| format!("{} requires a value", flag))
            };
            match flag.as_str() {
                "--input" => self.inputs.push(PathBuf::from(value()?)),
                "--sector" => self.default_sector = Some(value()?),
                "--medians" => self.medians_file = Some(PathBuf::from(value()?)),
                "--output" => self.output = value()?.parse()?,
                "--at" => {
                    let raw = value()?;
                    let at = DateTime::parse_from_rfc3339(&raw)
                        .with_context(|| format!("--at expects an RFC 3339 timestamp, got '{}'", raw))?;
                    self.at = Some(at.with_timezone(&Utc));
                }
                other => bail!("unknown argument '{}'", other),
            }
        }
        Ok(())
    }

    /// Read and validate the benchmark override, if one is configured.
    pub fn load_medians(&self) -> Result<Option<SectorMedians>> {
        let Some(path) = &self.medians_file else {
            return Ok(None);
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read medians file {}", path.display()))?;
        let medians: SectorMedians = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse medians file {}", path.display()))?;
        medians.validate()?;
        Ok(Some(medians))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<CliConfig> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert!(config.default_sector.is_none());
        assert!(config.medians_file.is_none());
        assert!(config.inputs.is_empty());
    }

    #[test]
    fn test_env_values() {
        let config = config_from(&[
            ("LICIAN_DEFAULT_SECTOR", "Energy"),
            ("LICIAN_OUTPUT", "Text"),
            ("LICIAN_MEDIANS_FILE", ""),
        ])
        .unwrap();
        assert_eq!(config.default_sector.as_deref(), Some("Energy"));
        assert_eq!(config.output, OutputFormat::Text);
        assert!(config.medians_file.is_none());
    }

    #[test]
    fn test_invalid_output_env() {
        assert!(config_from(&[("LICIAN_OUTPUT", "xml")]).is_err());
    }

    #[test]
    fn test_args_override_env() {
        let mut config = config_from(&[("LICIAN_DEFAULT_SECTOR", "Energy")]).unwrap();
        config
            .apply_args(&args(&[
                "--input", "a.json", "--input", "b.json", "--sector", "Utilities", "--output", "pretty", "--at",
                "2025-01-15T16:00:00Z",
            ]))
            .unwrap();

        assert_eq!(config.inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(config.default_sector.as_deref(), Some("Utilities"));
        assert_eq!(config.output, OutputFormat::Pretty);
        assert_eq!(config.at.unwrap().to_rfc3339(), "2025-01-15T16:00:00+00:00");
    }

    #[test]
    fn test_bad_args() {
        let mut config = config_from(&[]).unwrap();
        assert!(config.apply_args(&args(&["--input"])).is_err());
        assert!(config.apply_args(&args(&["--at", "yesterday"])).is_err());
        assert!(config.apply_args(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_missing_medians_file() {
        let mut config = config_from(&[]).unwrap();
        assert!(config.load_medians().unwrap().is_none());

        config.medians_file = Some(PathBuf::from("/nonexistent/medians.json"));
        assert!(config.load_medians().is_err());
    }
}
