//! Service configuration read from the environment at startup.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const BATCH_SIZE_VAR: &str = "SPECTR_BATCH_SIZE";
pub const PORT_VAR: &str = "WEBAPP_PORT";
pub const HOST_VAR: &str = "APP_LISTEN_HOST";
pub const SCAN_NUMBERS_URL_VAR: &str = "SPECTR_GET_SCAN_NUMBERS_URL";
pub const SCAN_DATA_URL_VAR: &str = "SPECTR_GET_SCAN_DATA_URL";
pub const WORKDIR_VAR: &str = "APP_WORKDIR";
pub const FINAL_DIR_VAR: &str = "FINAL_DIR";
pub const HARDKLOR_EXEC_VAR: &str = "HARDKLOR_EXEC_PATH";
pub const BULLSEYE_EXEC_VAR: &str = "BULLSEYE_EXEC_PATH";
pub const CLEAN_WORKDIR_VAR: &str = "APP_CLEAN_WORKDIR";
pub const ALLOW_EMPTY_MS1_VAR: &str = "APP_ALLOW_EMPTY_MS1";
pub const POLL_INTERVAL_VAR: &str = "APP_POLL_INTERVAL_SECS";

/// Default idle poll interval of the worker.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// When the per-job working directory is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    #[default]
    Always,
    Never,
    OnSuccess,
}

impl CleanupPolicy {
    /// Parse the `APP_CLEAN_WORKDIR` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "always" => Some(CleanupPolicy::Always),
            "no" | "never" => Some(CleanupPolicy::Never),
            "on success" | "on-success" | "on_success" => Some(CleanupPolicy::OnSuccess),
            _ => None,
        }
    }

    /// Whether a job's working directory should be removed for this outcome.
    pub fn should_clean(self, succeeded: bool) -> bool {
        match self {
            CleanupPolicy::Always => true,
            CleanupPolicy::Never => false,
            CleanupPolicy::OnSuccess => succeeded,
        }
    }
}

/// Settings for the remote scan export service.
#[derive(Debug, Clone)]
pub struct SpectrSettings {
    pub scan_numbers_url: Url,
    pub scan_data_url: Url,
    /// Number of scans requested per batch.
    pub batch_size: usize,
}

/// Settings consumed by the pipeline executor.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Root under which per-job working directories are created.
    pub work_root: PathBuf,
    /// Root of the per-project final storage.
    pub final_root: PathBuf,
    pub hardklor_exec: PathBuf,
    pub bullseye_exec: PathBuf,
    pub batch_size: usize,
    pub cleanup: CleanupPolicy,
    /// Accept spectral files that contain no MS1 scans.
    pub allow_empty_ms1: bool,
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub spectr: SpectrSettings,
    pub pipeline: PipelineSettings,
    pub poll_interval: Duration,
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).and_then(non_empty);
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let batch_size: usize = parse(BATCH_SIZE_VAR, &require(BATCH_SIZE_VAR)?)?;
        if batch_size == 0 {
            return Err(ConfigError::Invalid {
                var: BATCH_SIZE_VAR,
                reason: "must be greater than zero".into(),
            });
        }

        let port: u16 = parse(PORT_VAR, &require(PORT_VAR)?)?;
        let scan_numbers_url = parse_url(SCAN_NUMBERS_URL_VAR, &require(SCAN_NUMBERS_URL_VAR)?)?;
        let scan_data_url = parse_url(SCAN_DATA_URL_VAR, &require(SCAN_DATA_URL_VAR)?)?;
        let work_root = PathBuf::from(require(WORKDIR_VAR)?);
        let final_root = PathBuf::from(require(FINAL_DIR_VAR)?);
        let hardklor_exec = PathBuf::from(require(HARDKLOR_EXEC_VAR)?);
        let bullseye_exec = PathBuf::from(require(BULLSEYE_EXEC_VAR)?);

        let cleanup = match get(CLEAN_WORKDIR_VAR) {
            Some(value) => CleanupPolicy::parse(&value).ok_or_else(|| ConfigError::Invalid {
                var: CLEAN_WORKDIR_VAR,
                reason: format!("{value} (expected yes|no|on success)"),
            })?,
            None => CleanupPolicy::default(),
        };

        let allow_empty_ms1 = match get(ALLOW_EMPTY_MS1_VAR) {
            Some(value) => parse_bool(ALLOW_EMPTY_MS1_VAR, &value)?,
            None => false,
        };

        let poll_interval = match get(POLL_INTERVAL_VAR) {
            Some(value) => Duration::from_secs(parse(POLL_INTERVAL_VAR, &value)?),
            None => DEFAULT_POLL_INTERVAL,
        };

        let host = get(HOST_VAR).unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Self {
            host,
            port,
            spectr: SpectrSettings {
                scan_numbers_url,
                scan_data_url,
                batch_size,
            },
            pipeline: PipelineSettings {
                work_root,
                final_root,
                hardklor_exec,
                bullseye_exec,
                batch_size,
                cleanup,
                allow_empty_ms1,
            },
            poll_interval,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: format!("{value}: {e}"),
    })
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Invalid {
        var,
        reason: format!("{value}: {e}"),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("{value} (expected true/false)"),
        }),
    }
}
