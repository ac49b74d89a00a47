use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use veritrail_core::{AppError, ChannelName};

/// Where committed world state is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerBackendConfig {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub backend: LedgerBackendConfig,
    pub channel: ChannelName,
    pub permission_service_name: String,
    pub rumor_service_name: String,
    pub init_on_start: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(env::args().nth(1).as_deref() == Some("migrate"), |name| {
            env::var(name).ok()
        })
    }

    fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Argument(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };

        // Migrations only make sense against a database, whatever the backend.
        let backend = match lookup("LEDGER_BACKEND")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" if !migrate_only => LedgerBackendConfig::Memory,
            "memory" | "postgres" => LedgerBackendConfig::Postgres {
                database_url: required_non_empty(&lookup, "DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Argument(format!(
                    "LEDGER_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let channel = ChannelName::new(
            lookup("LEDGER_CHANNEL").unwrap_or_else(|| "rumor-channel".to_owned()),
        )?;
        let permission_service_name =
            non_empty_or(&lookup, "PERMISSION_SERVICE_NAME", "permission")?;
        let rumor_service_name = non_empty_or(&lookup, "RUMOR_SERVICE_NAME", "rumor")?;
        if permission_service_name == rumor_service_name {
            return Err(AppError::Argument(
                "PERMISSION_SERVICE_NAME and RUMOR_SERVICE_NAME must differ".to_owned(),
            ));
        }

        let init_on_start = match lookup("LEDGER_INIT_ON_START") {
            None => true,
            Some(value) if value.eq_ignore_ascii_case("true") => true,
            Some(value) if value.eq_ignore_ascii_case("false") => false,
            Some(other) => {
                return Err(AppError::Argument(format!(
                    "LEDGER_INIT_ON_START must be either 'true' or 'false', got '{other}'"
                )));
            }
        };

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            backend,
            channel,
            permission_service_name,
            rumor_service_name,
            init_on_start,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Argument(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Argument(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Argument(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn non_empty_or(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> Result<String, AppError> {
    match lookup(name) {
        Some(value) if value.trim().is_empty() => {
            Err(AppError::Argument(format!("{name} must not be empty")))
        }
        Some(value) => Ok(value),
        None => Ok(default.to_owned()),
    }
}
