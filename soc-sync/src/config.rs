//! Sync job configuration

use crate::error::{SyncError, SyncResult};

const DEFAULT_SOC_API_URL: &str = "https://ws1.soc.com.br/WebSoc";
const DEFAULT_RATE_LIMIT: u32 = 3;

/// Credentials of one configured SOC export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCredentials {
    /// Tenant enterprise code (company export only)
    pub empresa: Option<String>,
    pub codigo: String,
    pub chave: String,
}

/// Sync job configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL (env: DATABASE_URL, fallback EXTERNAL_URL_DB)
    pub database_url: String,
    /// SOC web service base URL
    pub soc_api_url: String,
    /// Tenant enterprise code for the company export
    pub soc_empresa: Option<String>,
    pub soc_codigo: Option<String>,
    pub soc_chave: Option<String>,
    /// Employee export credentials, fall back to `soc_codigo` / `soc_chave`
    pub soc_employee_codigo: Option<String>,
    pub soc_employee_chave: Option<String>,
    /// Employee fetch ceiling (calls per second)
    pub rate_limit: u32,
}

/// Logging settings, read before [`Config`] so configuration errors get logged
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub dir: String,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            level: env_opt("LOG_LEVEL")
                .or_else(|| env_opt("RUST_LOG"))
                .unwrap_or_else(|| "info".into()),
            json: env_opt("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            dir: env_opt("LOG_DIR").unwrap_or_else(|| "log".into()),
        }
    }
}

/// Non-empty env var
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(env_opt)
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> SyncResult<Self> {
        let database_url = get("DATABASE_URL")
            .or_else(|| get("EXTERNAL_URL_DB"))
            .ok_or_else(|| SyncError::config("DATABASE_URL or EXTERNAL_URL_DB must be set"))?;

        let rate_limit = match get("SOC_RATE_LIMIT") {
            Some(v) => v
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| SyncError::config(format!("Invalid SOC_RATE_LIMIT: {v}")))?,
            None => DEFAULT_RATE_LIMIT,
        };

        Ok(Self {
            database_url,
            soc_api_url: get("SOC_API_URL").unwrap_or_else(|| DEFAULT_SOC_API_URL.into()),
            soc_empresa: get("SOC_EMPRESA"),
            soc_codigo: get("SOC_CODIGO"),
            soc_chave: get("SOC_CHAVE"),
            soc_employee_codigo: get("SOC_EMPLOYEE_CODIGO"),
            soc_employee_chave: get("SOC_EMPLOYEE_CHAVE"),
            rate_limit,
        })
    }

    /// Credentials for the company export (enterprise code required)
    pub fn company_export(&self) -> SyncResult<ExportCredentials> {
        let empresa = self
            .soc_empresa
            .clone()
            .ok_or_else(|| SyncError::config("SOC_EMPRESA must be set"))?;
        Ok(ExportCredentials {
            empresa: Some(empresa),
            codigo: Self::require(&self.soc_codigo, "SOC_CODIGO")?,
            chave: Self::require(&self.soc_chave, "SOC_CHAVE")?,
        })
    }

    /// Credentials for the employee export
    pub fn employee_export(&self) -> SyncResult<ExportCredentials> {
        let codigo = self.soc_employee_codigo.as_ref().or(self.soc_codigo.as_ref());
        let chave = self.soc_employee_chave.as_ref().or(self.soc_chave.as_ref());
        Ok(ExportCredentials {
            empresa: None,
            codigo: Self::require(&codigo.cloned(), "SOC_EMPLOYEE_CODIGO or SOC_CODIGO")?,
            chave: Self::require(&chave.cloned(), "SOC_EMPLOYEE_CHAVE or SOC_CHAVE")?,
        })
    }

    fn require(value: &Option<String>, name: &str) -> SyncResult<String> {
        value
            .clone()
            .ok_or_else(|| SyncError::config(format!("{name} must be set")))
    }

    /// Database URL safe for logs
    pub fn masked_database_url(&self) -> String {
        mask_database_url(&self.database_url)
    }
}

/// Replace the userinfo part of a connection URL with `***:***`
///
/// `postgres://user:secret@db:5432/portal` → `postgres://***:***@db:5432/portal`.
/// URLs without a scheme are returned unchanged. The userinfo ends at the
/// last `@`, so passwords holding `/`, `?` or `@` never leak.
pub fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let host_part = match rest.rfind('@') {
        Some(at) => &rest[at + 1..],
        None => rest,
    };
    format!("{scheme}://***:***@{host_part}")
}
