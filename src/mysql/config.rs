use mysql_async::{ClientIdentity, Compression, OptsBuilder, SslOpts};
use tracing::{debug, warn};

use crate::config::{ClientFlag, MysqlConfig, SslConfig, TlsOptions};

/// Translate adapter options into `mysql_async` options.
#[must_use]
pub fn build_opts(config: &MysqlConfig) -> OptsBuilder {
    let mut builder = OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(config.user.clone())
        .pass(config.effective_password().map(str::to_string))
        .db_name(config.database.clone())
        .socket(config.socket_path.clone())
        .init(vec![config.charset_statement()])
        .client_found_rows(config.flag_enabled(ClientFlag::FoundRows));

    if config.flag_enabled(ClientFlag::Compress) {
        builder = builder.compression(Compression::default());
    }

    if let Some(ssl) = &config.ssl {
        builder = builder.ssl_opts(build_ssl_opts(ssl));
    }

    builder
}

fn build_ssl_opts(ssl: &SslConfig) -> SslOpts {
    match ssl {
        SslConfig::Profile(profile) => {
            debug!(profile = %profile, "ssl profile verified against system trust store");
            SslOpts::default()
        }
        SslConfig::Options(tls) => build_tls_opts(tls),
    }
}

fn build_tls_opts(tls: &TlsOptions) -> SslOpts {
    let mut opts = SslOpts::default()
        .with_danger_accept_invalid_certs(!tls.reject_unauthorized)
        .with_danger_skip_domain_validation(!tls.reject_unauthorized);

    if let Some(ca) = &tls.ca {
        opts = opts.with_root_certs(vec![ca.clone().into()]);
    }

    if let Some(pfx) = &tls.pfx {
        let mut identity = ClientIdentity::new(pfx.clone().into());
        if let Some(passphrase) = &tls.passphrase {
            identity = identity.with_password(passphrase.clone());
        }
        opts = opts.with_client_identity(Some(identity));
    }

    opts
}

/// Log the options `mysql_async` has no knob for. They are kept in the
/// config so callers can still inspect them.
pub(crate) fn warn_unsupported(config: &MysqlConfig) {
    if let Some(addr) = &config.local_address {
        warn!(local_address = %addr, "localAddress is not supported by the MySQL client and is ignored");
    }
    if let Some(SslConfig::Options(tls)) = &config.ssl {
        for (name, value) in [
            ("ciphers", &tls.ciphers),
            ("minVersion", &tls.min_version),
            ("maxVersion", &tls.max_version),
        ] {
            if let Some(value) = value {
                warn!(option = name, value = %value, "TLS option is not supported by the MySQL client and is ignored");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysql_async::Opts;

    #[test]
    fn opts_carry_connection_fields() {
        let cfg = MysqlConfig::builder()
            .host("db.internal")
            .port(3307)
            .user("app")
            .password("pw")
            .database("shop")
            .finish();
        let opts = Opts::from(build_opts(&cfg));
        assert_eq!(opts.ip_or_hostname(), "db.internal");
        assert_eq!(opts.tcp_port(), 3307);
        assert_eq!(opts.user(), Some("app"));
        assert_eq!(opts.pass(), Some("pw"));
        assert_eq!(opts.db_name(), Some("shop"));
        assert!(opts.client_found_rows());
        assert_eq!(opts.init(), ["SET NAMES utf8mb4 COLLATE utf8mb4_unicode_ci".to_string()]);
        assert!(opts.ssl_opts().is_none());
    }

    #[test]
    fn socket_and_flags_reach_the_client() {
        let cfg = MysqlConfig::from_json(serde_json::json!({
            "socketPath": "/tmp/mysql.sock",
            "password1": "factor-one",
            "flags": ["-FOUND_ROWS"],
            "ssl": {"rejectUnauthorized": false}
        }))
        .unwrap();
        let opts = Opts::from(build_opts(&cfg));
        assert_eq!(opts.socket(), Some("/tmp/mysql.sock"));
        assert_eq!(opts.pass(), Some("factor-one"));
        assert!(!opts.client_found_rows());
        let ssl = opts.ssl_opts().unwrap();
        assert!(ssl.accept_invalid_certs());
        assert!(ssl.skip_domain_validation());
    }
}
