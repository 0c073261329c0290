use crate::error::{AppError, Result};
use hyper_util::client::legacy::connect::HttpConnector;
use std::path::Path;
use tracing::{debug, instrument};
use yup_oauth2::{
    ServiceAccountAuthenticator, authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

/// Read/write access to spreadsheets, plus Drive for lookup by name and sharing.
pub const AUTH_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

pub(super) type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Create a service account authenticator and verify it by fetching a token
#[instrument(name = "Authenticating service account", skip_all)]
pub(super) async fn create_and_verify_authenticator(credentials_path: &Path) -> Result<AuthType> {
    let auth = from_service_account_key(credentials_path).await?;

    let _token = auth
        .token(&AUTH_SCOPES)
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;
    debug!("Service account token acquired");

    Ok(auth)
}

async fn from_service_account_key(credentials_path: &Path) -> Result<AuthType> {
    let key = yup_oauth2::read_service_account_key(credentials_path)
        .await
        .map_err(|e| {
            AppError::Config(format!(
                "Failed to read service account key {}: {}",
                credentials_path.display(),
                e
            ))
        })?;
    debug!(client_email = %key.client_email, "Loaded service account key");

    ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))
}
