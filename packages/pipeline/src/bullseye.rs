//! Bullseye command-line options built from `key=value` configuration text.

use pipeline_core::layout::{
    BULLSEYE_MATCHES_FILE, BULLSEYE_NO_MATCHES_FILE, BULLSEYE_RESULTS_FILE, HARDKLOR_RESULTS_FILE,
    MS2_FILE,
};

use crate::PipelineError;

/// Positional arguments that follow the flags, in order.
pub const POSITIONAL_ARGS: [&str; 5] = [
    BULLSEYE_RESULTS_FILE,
    HARDKLOR_RESULTS_FILE,
    MS2_FILE,
    BULLSEYE_MATCHES_FILE,
    BULLSEYE_NO_MATCHES_FILE,
];

/// Ordered Bullseye options.
///
/// A key seen twice keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BullseyeOptions {
    entries: Vec<(String, String)>,
}

impl BullseyeOptions {
    /// Parse newline-delimited `key=value` text. `\r\n` and bare `\r` count
    /// as line breaks.
    ///
    /// Blank lines and lines starting with `#` are ignored. Lines that do not
    /// split into exactly one key and one value are skipped.
    pub fn parse(text: &str) -> Result<Self, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyBullseyeConfig);
        }

        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut options = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('=').collect();
            let [key, value] = fields.as_slice() else {
                tracing::debug!("Skipping malformed Bullseye option line: {}", line);
                continue;
            };
            options.insert(key.trim(), value.trim())?;
        }
        Ok(options)
    }

    fn insert(&mut self, key: &str, value: &str) -> Result<(), PipelineError> {
        let reason = if key.is_empty() {
            Some("empty key")
        } else if key.starts_with('-') {
            Some("keys must not start with '-'")
        } else if POSITIONAL_ARGS.contains(&key) {
            Some("collides with a positional argument")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(PipelineError::InvalidBullseyeOption {
                key: key.to_string(),
                reason,
            });
        }

        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full argument list: `-key value` pairs followed by the positional files.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2 + POSITIONAL_ARGS.len());
        for (key, value) in &self.entries {
            args.push(format!("-{key}"));
            args.push(value.clone());
        }
        args.extend(POSITIONAL_ARGS.iter().map(|s| s.to_string()));
        args
    }
}
