use mongodb::options::{ClientOptions, ServerAddress};

use docdb_interface::errors::{AppError, Result};

pub type DatabaseConnection = mongodb::Client;

const APP_NAME: &str = "docdb_sample";

pub struct DatabaseManager;

impl DatabaseManager {
    /// Build a client for the endpoint, authenticating with the authorization key.
    ///
    /// The driver connects lazily, so no remote call happens here.
    pub async fn new_client(
        endpoint_url: &str,
        authorization_key: &str,
        account_name: Option<&str>,
    ) -> Result<DatabaseConnection> {
        let mut options = ClientOptions::parse(endpoint_url)
            .await
            .map_err(|e| AppError::ConfigurationError {
                msg: format!("EndPointUrl could not be parsed: {}", e.kind),
            })?;

        let mut credential = options.credential.take().unwrap_or_default();
        if let Some(account_name) = account_name {
            credential.username = Some(account_name.to_string());
        } else if credential.username.is_none() {
            credential.username = account_from_hosts(&options.hosts);
        }
        credential.password = Some(authorization_key.to_string());

        options.credential = Some(credential);
        options.app_name = Some(APP_NAME.to_string());

        mongodb::Client::with_options(options)
            .map_err(|e| AppError::ConfigurationError { msg: e.kind.to_string() })
    }
}

// Hosted accounts are addressed as <account>.<service domain>.
fn account_from_hosts(hosts: &[ServerAddress]) -> Option<String> {
    hosts.iter().find_map(|address| match address {
        ServerAddress::Tcp { host, .. } => host
            .split('.')
            .next()
            .filter(|label| !label.is_empty())
            .map(str::to_string),
        #[allow(unreachable_patterns)]
        _ => None,
    })
}
