// Mon Oct 19 2026 - Alex

use crate::memory::Address;
use crate::pattern::{NamedPattern, PatternCompiler, PatternError, DEFAULT_DELIMITER, DEFAULT_WILDCARD};
use crate::scan::Strategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub pattern: String,
}

impl Signature {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub delimiter: char,
    pub wildcard: char,
    pub strategy: Strategy,
    pub parallel: bool,
    pub max_threads: usize,
    pub base_address: Option<Address>,
    pub signatures: Vec<Signature>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            wildcard: DEFAULT_WILDCARD,
            strategy: Strategy::Auto,
            parallel: true,
            max_threads: num_cpus::get(),
            base_address: None,
            signatures: Vec::new(),
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_wildcard(mut self, wildcard: char) -> Self {
        self.wildcard = wildcard;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }

    pub fn with_base_address(mut self, base: Address) -> Self {
        self.base_address = Some(base);
        self
    }

    pub fn with_signature(mut self, name: &str, pattern: &str) -> Self {
        self.signatures.push(Signature::new(name, pattern));
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compiler()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.max_threads == 0 {
            return Err(ConfigError::Invalid("max_threads must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn compiler(&self) -> PatternCompiler {
        PatternCompiler::new().delimiter(self.delimiter).wildcard(self.wildcard)
    }

    pub fn compile_signatures(&self) -> Result<Vec<NamedPattern>, Vec<(Signature, PatternError)>> {
        let compiler = self.compiler();
        let mut compiled = Vec::with_capacity(self.signatures.len());
        let mut failures = Vec::new();

        for signature in &self.signatures {
            match compiler.compile(&signature.pattern) {
                Ok(pattern) => compiled.push(NamedPattern::new(&signature.name, pattern)),
                Err(e) => failures.push((signature.clone(), e)),
            }
        }

        if failures.is_empty() {
            Ok(compiled)
        } else {
            Err(failures)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScanConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.delimiter, ' ');
        assert_eq!(config.wildcard, '?');
        assert_eq!(config.strategy, Strategy::Auto);
        assert!(config.max_threads > 0);
    }

    #[test]
    fn test_parse_json() {
        let config = ScanConfig::from_json(
            r#"{
                "strategy": "sse2",
                "parallel": false,
                "base_address": "0x140000000",
                "signatures": [
                    { "name": "prologue", "pattern": "55 8B EC" },
                    { "name": "call", "pattern": "E8 ? ? ? ?" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.strategy, Strategy::Sse2);
        assert!(!config.parallel);
        assert_eq!(config.base_address, Some(Address::new(0x1_4000_0000)));
        assert_eq!(config.delimiter, ' ');

        let patterns = config.compile_signatures().unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[1].name, "call");
        assert_eq!(patterns[1].pattern.wildcard_byte_count(), 4);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(ScanConfig::from_json("{ not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            ScanConfig::from_json(r#"{ "strategy": "neon" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ScanConfig::load(Path::new("/nonexistent/scan.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(ScanConfig::new().with_wildcard(' ').validate().is_err());
        assert!(ScanConfig::new().with_delimiter('a').validate().is_err());
        assert!(ScanConfig::new().with_wildcard('F').validate().is_err());
        assert!(ScanConfig::new().with_max_threads(0).validate().is_err());
        assert!(ScanConfig::new().with_delimiter('@').with_wildcard('*').validate().is_ok());
        assert!(matches!(
            ScanConfig::from_json(r#"{ "delimiter": "?" }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_compile_with_custom_grammar() {
        let config = ScanConfig::new()
            .with_delimiter('@')
            .with_wildcard('*')
            .with_signature("a", "48@*@8B");
        let patterns = config.compile_signatures().unwrap();
        assert_eq!(patterns[0].pattern.as_slice(), &[Some(0x48), None, Some(0x8B)]);
    }

    #[test]
    fn test_compile_collects_failures() {
        let config = ScanConfig::new()
            .with_signature("ok", "55 8B")
            .with_signature("anchor", "? 8B")
            .with_signature("nibble", "00 ?1");

        let failures = config.compile_signatures().unwrap_err();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].0.name, "anchor");
        assert_eq!(failures[0].1, PatternError::Anchor);
        assert!(failures[1].1.is_syntax());
    }
}
