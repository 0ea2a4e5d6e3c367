//! Connection options handed to a [`Driver`](crate::Driver).
//!
//! Options can be assembled with [`MysqlConfigBuilder`] or deserialized from a
//! JSON record with camelCase keys:
//! ```rust
//! use mysql_middleware::prelude::*;
//!
//! let cfg = MysqlConfig::from_json(serde_json::json!({
//!     "host": "db.internal",
//!     "user": "app",
//!     "database": "shop",
//!     "flags": ["-FOUND_ROWS"],
//!     "bigNumberStrings": true
//! }))?;
//! assert_eq!(cfg.port, 3306);
//! # Ok::<(), MysqlMiddlewareError>(())
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::driver::Driver;
use crate::error::MysqlMiddlewareError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_CHARSET: &str = "UTF8MB4_UNICODE_CI";

/// Client capability that can be switched on or off through `flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientFlag {
    /// Report matched rather than changed rows for UPDATE. On by default.
    FoundRows,
    /// Compress traffic between client and server.
    Compress,
}

impl ClientFlag {
    fn name(self) -> &'static str {
        match self {
            ClientFlag::FoundRows => "FOUND_ROWS",
            ClientFlag::Compress => "COMPRESS",
        }
    }
}

/// One entry of the `flags` option, e.g. `"COMPRESS"` or `"-FOUND_ROWS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ConnectionFlag {
    Enable(ClientFlag),
    Disable(ClientFlag),
}

impl FromStr for ConnectionFlag {
    type Err = MysqlMiddlewareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negated, name) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let flag = match name.to_ascii_uppercase().as_str() {
            "FOUND_ROWS" => ClientFlag::FoundRows,
            "COMPRESS" => ClientFlag::Compress,
            _ => {
                return Err(MysqlMiddlewareError::ConfigError(format!(
                    "unsupported connection flag: {s}"
                )));
            }
        };
        Ok(if negated {
            ConnectionFlag::Disable(flag)
        } else {
            ConnectionFlag::Enable(flag)
        })
    }
}

impl TryFrom<String> for ConnectionFlag {
    type Error = MysqlMiddlewareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ConnectionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionFlag::Enable(flag) => f.write_str(flag.name()),
            ConnectionFlag::Disable(flag) => write!(f, "-{}", flag.name()),
        }
    }
}

/// Detailed TLS settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsOptions {
    /// PEM file with the CA certificate(s) used to verify the server.
    pub ca: Option<PathBuf>,
    /// PKCS#12 archive holding the client certificate and key.
    pub pfx: Option<PathBuf>,
    /// Password for `pfx`.
    pub passphrase: Option<String>,
    /// Verify the server certificate chain and host name.
    pub reject_unauthorized: bool,
    pub ciphers: Option<String>,
    pub min_version: Option<String>,
    pub max_version: Option<String>,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            ca: None,
            pfx: None,
            passphrase: None,
            reject_unauthorized: true,
            ciphers: None,
            min_version: None,
            max_version: None,
        }
    }
}

/// `ssl` option: a named profile or explicit settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SslConfig {
    /// Named profile (e.g. `"Amazon RDS"`); verified against the system trust store.
    Profile(String),
    Options(TlsOptions),
}

/// How values read back from the server are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueOptions {
    pub support_big_numbers: bool,
    pub big_number_strings: bool,
    pub date_strings: bool,
    pub decimal_numbers: bool,
}

/// Connection parameters for one MySQL server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Alias of `password` (first authentication factor).
    pub password1: Option<String>,
    pub password2: Option<String>,
    pub password3: Option<String>,
    pub database: Option<String>,
    /// Character set or collation name, e.g. `utf8mb4` or `UTF8MB4_UNICODE_CI`.
    pub charset: String,
    pub local_address: Option<String>,
    /// Unix socket path; takes priority over `host`/`port`.
    pub socket_path: Option<String>,
    pub flags: Vec<ConnectionFlag>,
    pub ssl: Option<SslConfig>,
    /// Return BIGINT values as text.
    pub big_number_strings: bool,
    #[serde(skip)]
    support_big_numbers: bool,
    #[serde(skip)]
    date_strings: bool,
    #[serde(skip)]
    decimal_numbers: bool,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: None,
            password: None,
            password1: None,
            password2: None,
            password3: None,
            database: None,
            charset: DEFAULT_CHARSET.to_string(),
            local_address: None,
            socket_path: None,
            flags: Vec::new(),
            ssl: None,
            big_number_strings: false,
            support_big_numbers: false,
            date_strings: false,
            decimal_numbers: false,
        }
    }
}

impl MysqlConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> MysqlConfigBuilder {
        MysqlConfigBuilder::new()
    }

    /// Build options from a JSON record.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::ConfigError` if `value` is not a JSON
    /// object (null, arrays and scalars are rejected) or a field has the wrong type.
    pub fn from_json(value: JsonValue) -> Result<Self, MysqlMiddlewareError> {
        if !value.is_object() {
            return Err(MysqlMiddlewareError::ConfigError(format!(
                "connection options must be an object, got {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Check the charset, which is spliced into the `SET NAMES` statement run
    /// on every new connection. Host and port are left to the client, so a bad
    /// address surfaces from `create()` rather than here.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::ConfigError` for a charset that is not a
    /// plain identifier.
    pub fn validate(&self) -> Result<(), MysqlMiddlewareError> {
        if self.charset.is_empty()
            || !self
                .charset
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(MysqlMiddlewareError::ConfigError(format!(
                "invalid charset: {:?}",
                self.charset
            )));
        }
        Ok(())
    }

    /// Force on the value handling every driver relies on: big numbers
    /// supported, dates returned as strings, decimals returned as numbers.
    #[must_use]
    pub(crate) fn with_derived_flags(mut self) -> Self {
        self.support_big_numbers = true;
        self.date_strings = true;
        self.decimal_numbers = true;
        self
    }

    #[must_use]
    pub fn value_options(&self) -> ValueOptions {
        ValueOptions {
            support_big_numbers: self.support_big_numbers,
            big_number_strings: self.big_number_strings,
            date_strings: self.date_strings,
            decimal_numbers: self.decimal_numbers,
        }
    }

    /// `password`, falling back to `password1`.
    #[must_use]
    pub fn effective_password(&self) -> Option<&str> {
        self.password.as_deref().or(self.password1.as_deref())
    }

    /// Whether a flag is on once defaults and the `flags` list are applied.
    /// Later entries override earlier ones.
    #[must_use]
    pub fn flag_enabled(&self, flag: ClientFlag) -> bool {
        let default = matches!(flag, ClientFlag::FoundRows);
        self.flags.iter().fold(default, |acc, entry| match entry {
            ConnectionFlag::Enable(f) if *f == flag => true,
            ConnectionFlag::Disable(f) if *f == flag => false,
            _ => acc,
        })
    }

    /// Statement run after connecting to select the configured charset.
    #[must_use]
    pub fn charset_statement(&self) -> String {
        let name = self.charset.to_ascii_lowercase();
        match name.split_once('_') {
            Some((charset, _)) => format!("SET NAMES {charset} COLLATE {name}"),
            None => format!("SET NAMES {name}"),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Fluent builder for [`MysqlConfig`].
#[derive(Debug, Clone, Default)]
pub struct MysqlConfigBuilder {
    config: MysqlConfig,
}

impl MysqlConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.config.charset = charset.into();
        self
    }

    #[must_use]
    pub fn socket_path(mut self, socket_path: impl Into<String>) -> Self {
        self.config.socket_path = Some(socket_path.into());
        self
    }

    #[must_use]
    pub fn local_address(mut self, local_address: impl Into<String>) -> Self {
        self.config.local_address = Some(local_address.into());
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: ConnectionFlag) -> Self {
        self.config.flags.push(flag);
        self
    }

    #[must_use]
    pub fn ssl(mut self, ssl: SslConfig) -> Self {
        self.config.ssl = Some(ssl);
        self
    }

    #[must_use]
    pub fn big_number_strings(mut self, enabled: bool) -> Self {
        self.config.big_number_strings = enabled;
        self
    }

    #[must_use]
    pub fn finish(self) -> MysqlConfig {
        self.config
    }

    /// Build a [`Driver`] backed by `mysql_async`.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::ConfigError` if the options fail validation.
    pub fn build(self) -> Result<Driver, MysqlMiddlewareError> {
        Driver::new(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_records_are_rejected() {
        for bad in [json!(null), json!([]), json!([{"host": "x"}]), json!("host"), json!(3306), json!(true)] {
            let err = MysqlConfig::from_json(bad).unwrap_err();
            assert!(matches!(err, MysqlMiddlewareError::ConfigError(_)), "{err}");
        }
    }

    #[test]
    fn empty_object_gets_defaults() {
        let cfg = MysqlConfig::from_json(json!({})).unwrap();
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.charset, DEFAULT_CHARSET);
        assert_eq!(cfg.value_options(), ValueOptions::default());
    }

    #[test]
    fn camel_case_keys_and_ssl_forms() {
        let cfg = MysqlConfig::from_json(json!({
            "socketPath": "/var/run/mysqld/mysqld.sock",
            "localAddress": "10.0.0.2",
            "bigNumberStrings": true,
            "ssl": "Amazon RDS"
        }))
        .unwrap();
        assert_eq!(cfg.socket_path.as_deref(), Some("/var/run/mysqld/mysqld.sock"));
        assert!(cfg.big_number_strings);
        assert_eq!(cfg.ssl, Some(SslConfig::Profile("Amazon RDS".into())));

        let cfg = MysqlConfig::from_json(json!({
            "ssl": {"ca": "/etc/ca.pem", "rejectUnauthorized": false}
        }))
        .unwrap();
        let Some(SslConfig::Options(tls)) = cfg.ssl else {
            panic!("expected detailed ssl options");
        };
        assert_eq!(tls.ca, Some(PathBuf::from("/etc/ca.pem")));
        assert!(!tls.reject_unauthorized);
    }

    #[test]
    fn wrong_field_type_is_config_error() {
        let err = MysqlConfig::from_json(json!({"port": "not a port"})).unwrap_err();
        assert!(matches!(err, MysqlMiddlewareError::ConfigError(_)));
        let err = MysqlConfig::from_json(json!({"flags": ["NO_SUCH_FLAG"]})).unwrap_err();
        assert!(matches!(err, MysqlMiddlewareError::ConfigError(_)));
    }

    #[test]
    fn flags_parse_and_override_defaults() {
        assert_eq!(
            "-found_rows".parse::<ConnectionFlag>().unwrap(),
            ConnectionFlag::Disable(ClientFlag::FoundRows)
        );
        assert_eq!(ConnectionFlag::Enable(ClientFlag::Compress).to_string(), "COMPRESS");

        let cfg = MysqlConfig::from_json(json!({"flags": ["-FOUND_ROWS", "COMPRESS"]})).unwrap();
        assert!(!cfg.flag_enabled(ClientFlag::FoundRows));
        assert!(cfg.flag_enabled(ClientFlag::Compress));
        assert!(MysqlConfig::default().flag_enabled(ClientFlag::FoundRows));
        assert!(!MysqlConfig::default().flag_enabled(ClientFlag::Compress));
    }

    #[test]
    fn charset_statement_handles_collations() {
        let cfg = MysqlConfig::default();
        assert_eq!(
            cfg.charset_statement(),
            "SET NAMES utf8mb4 COLLATE utf8mb4_unicode_ci"
        );
        let cfg = MysqlConfig::builder().charset("latin1").finish();
        assert_eq!(cfg.charset_statement(), "SET NAMES latin1");
    }

    #[test]
    fn validate_only_checks_charset() {
        let cfg = MysqlConfig::builder().charset("utf8'; DROP").finish();
        assert!(cfg.validate().is_err());
        let cfg = MysqlConfig::builder().host("").port(0).finish();
        assert!(cfg.validate().is_ok());
        assert!(MysqlConfig::default().validate().is_ok());
    }

    #[test]
    fn password1_is_an_alias() {
        let cfg = MysqlConfig::from_json(json!({"password1": "s3cret"})).unwrap();
        assert_eq!(cfg.effective_password(), Some("s3cret"));
    }
}
