//! Analyzer connection configuration.

use crate::core::{ClientError, ClientResult};

use ini::Ini;
use std::path::Path;
use std::time::Duration;

/// INI section holding the analyzer address.
pub const CONFIG_SECTION: &str = "chaser";

/// Key for the analyzer host.
pub const HOST_KEY: &str = "CHASER_HOST";

/// Key for the analyzer port.
pub const PORT_KEY: &str = "CHASER_PORT";

/// Where to reach the hybrid analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Host name or address.
    pub host: String,

    /// Port, kept as written in the configuration file.
    pub port: String,

    /// Timeout for the whole request. Zero disables it.
    pub timeout: Duration,
}

impl AnalyzerConfig {
    /// Creates a configuration with the default 10 second timeout.
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Loads the `[chaser]` section of an INI file.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the file cannot be read or parsed, or if
    /// the host or port is missing or empty.
    pub fn from_ini_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let ini = Ini::load_from_file(path).map_err(|e| {
            ClientError::configuration(format!("cannot load {}: {}", path.display(), e))
        })?;
        Self::from_ini(&ini)
    }

    /// Parses the `[chaser]` section from INI text.
    ///
    /// # Errors
    ///
    /// Same as [`from_ini_file`](Self::from_ini_file).
    pub fn from_ini_str(text: &str) -> ClientResult<Self> {
        let ini = Ini::load_from_str(text)
            .map_err(|e| ClientError::configuration(format!("invalid INI: {}", e)))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> ClientResult<Self> {
        let section = ini.section(Some(CONFIG_SECTION)).ok_or_else(|| {
            ClientError::configuration(format!("missing [{}] section", CONFIG_SECTION))
        })?;

        let value = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ClientError::configuration(format!("missing {}", key)))
        };

        Ok(Self::new(value(HOST_KEY)?, value(PORT_KEY)?))
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the timeout to apply to requests. Zero means no timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    /// Returns the analyze endpoint, without the query string.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/analyze", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_ini_str() {
        let config = AnalyzerConfig::from_ini_str(
            "[general]\nFOO = bar\n\n[chaser]\nCHASER_HOST = 10.0.0.5\nCHASER_PORT = 8081\n",
        )
        .unwrap();

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, "8081");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.endpoint(), "http://10.0.0.5:8081/analyze");
    }

    #[test]
    fn test_missing_values_are_rejected() {
        let err = AnalyzerConfig::from_ini_str("[chaser]\nCHASER_HOST = h\n").unwrap_err();
        assert!(err.to_string().contains("CHASER_PORT"));
        assert_eq!(err.verdict_reason(), "ConfigLoadError");

        assert!(AnalyzerConfig::from_ini_str("[other]\nCHASER_HOST = h\n").is_err());
        let empty_host = "[chaser]\nCHASER_HOST =\nCHASER_PORT = 1\n";
        assert!(AnalyzerConfig::from_ini_str(empty_host).is_err());
    }

    #[test]
    fn test_zero_timeout_disables_request_timeout() {
        let config = AnalyzerConfig::new("h", "1");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));

        let config = config.with_timeout(Duration::ZERO);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_from_ini_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chaser]\nCHASER_HOST=analyzer\nCHASER_PORT=9000").unwrap();

        let config = AnalyzerConfig::from_ini_file(file.path())
            .unwrap()
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.host, "analyzer");
        assert_eq!(config.timeout, Duration::from_secs(3));

        let err = AnalyzerConfig::from_ini_file("/nonexistent/varistav.conf").unwrap_err();
        assert!(matches!(err, ClientError::Configuration { .. }));
    }
}
