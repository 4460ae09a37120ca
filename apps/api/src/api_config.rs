use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vireo_application::{
    DEFAULT_DEPARTMENT_CACHE_TTL, DEFAULT_PERMISSION_CACHE_TTL, DEFAULT_SUPER_ADMIN_ROLE,
    DataScopeConfig,
};
use vireo_core::AppError;
use vireo_domain::DEFAULT_MAX_HIERARCHY_DEPTH;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub data_scope: DataScopeConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = optional_number_env::<u16>("API_PORT")?.unwrap_or(3001);

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let super_admin_role = env::var("RBAC_SUPER_ADMIN_ROLE")
            .unwrap_or_else(|_| DEFAULT_SUPER_ADMIN_ROLE.to_owned());
        let max_hierarchy_depth =
            optional_number_env("DEPT_TREE_MAX_DEPTH")?.unwrap_or(DEFAULT_MAX_HIERARCHY_DEPTH);
        let department_cache_ttl = optional_number_env("DEPT_CACHE_TTL_SECONDS")?
            .map_or(DEFAULT_DEPARTMENT_CACHE_TTL, Duration::from_secs);
        let permission_cache_ttl = optional_number_env("PERMISSION_CACHE_TTL_SECONDS")?
            .map_or(DEFAULT_PERMISSION_CACHE_TTL, Duration::from_secs);

        let data_scope = DataScopeConfig::new(
            super_admin_role,
            max_hierarchy_depth,
            department_cache_ttl,
            permission_cache_ttl,
        )?;

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            data_scope,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
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

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn optional_number_env<T: FromStr>(name: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    parse_optional_number(name, env::var(name).ok().as_deref())
}

/// Parses an optional numeric setting. Unset or blank means "use the default";
/// anything else must parse.
fn parse_optional_number<T: FromStr>(
    name: &str,
    value: Option<&str>,
) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    value
        .parse::<T>()
        .map(Some)
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}
