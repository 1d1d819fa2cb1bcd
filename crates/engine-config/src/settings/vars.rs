use crate::error::ConfigError;
use std::{collections::HashMap, str::FromStr};

/// Reads keys out of a merged environment, collecting every missing
/// required key instead of stopping at the first one.
pub struct VarReader<'a> {
    vars: &'a HashMap<String, String>,
    missing: Vec<String>,
}

impl<'a> VarReader<'a> {
    pub fn new(vars: &'a HashMap<String, String>) -> Self {
        VarReader {
            vars,
            missing: Vec::new(),
        }
    }

    /// Blank values count as absent.
    pub fn optional(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required(&mut self, key: &str) -> String {
        match self.optional(key) {
            Some(value) => value,
            None => {
                self.missing.push(key.to_string());
                String::new()
            }
        }
    }

    pub fn parsed_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
            None => Ok(default),
        }
    }

    /// Fails with every key that `required` could not find.
    pub fn finish(self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingVars(self.missing))
        }
    }
}
