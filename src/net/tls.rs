//! TLS configuration and certificate loading.

use std::path::Path;
use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;
use crate::error::ConfigurationError;

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, std::io::Error> {
    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Load the TLS material a secure connector needs.
pub async fn load_for_connector(
    connector: &str,
    tls: Option<&TlsConfig>,
) -> Result<RustlsConfig, ConfigurationError> {
    let tls = tls.ok_or_else(|| ConfigurationError::MissingTls(connector.to_string()))?;
    load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path))
        .await
        .map_err(ConfigurationError::Tls)
}
