//! Environment-driven configuration.
//!
//! Every task reads its credentials from process environment variables. A
//! `.env` file is loaded by the binary before any of these are consulted, so
//! the lookups here only ever see the merged environment.
//!
//! Each config type has a `from_lookup` constructor taking a closure so tests
//! can supply variables without touching the real environment.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

pub const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_BUCKET_NAME: &str = "sss-blog-images";
pub const DEFAULT_PUBLIC_URL: &str = "https://images.sssstudy.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Read a variable, treating empty values as unset.
fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Collects required variables so one error can report all of them.
struct Required<'a, F> {
    lookup: &'a F,
    missing: Vec<&'static str>,
}

impl<'a, F> Required<'a, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: &'a F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    fn get(&mut self, var: &'static str) -> String {
        match non_empty(self.lookup, var) {
            Some(value) => value,
            None => {
                self.missing.push(var);
                String::new()
            }
        }
    }

    fn finish(self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(self.missing))
        }
    }
}

/// Lookup over the process environment.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

fn validate_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid {
            var,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// First eight characters of an id, for diagnostics.
pub fn mask_id(id: &str) -> String {
    let prefix: String = id.trim().chars().take(8).collect();
    format!("{}...", prefix)
}

/// Credentials and endpoint for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_secret: String,
    pub database_id: String,
    pub api_base: String,
    pub version: String,
}

impl NotionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut required = Required::new(&lookup);
        let api_secret = required.get("NOTION_API_SECRET");
        let database_id = required.get("DATABASE_ID");
        required.finish()?;

        let api_base = non_empty(&lookup, "NOTION_API_BASE")
            .unwrap_or_else(|| DEFAULT_NOTION_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        validate_url("NOTION_API_BASE", &api_base)?;

        let version = non_empty(&lookup, "NOTION_VERSION")
            .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string());

        Ok(Self {
            api_secret,
            database_id,
            api_base,
            version,
        })
    }

    pub fn masked_database_id(&self) -> String {
        mask_id(&self.database_id)
    }
}

/// Public base URL of the bucket (`R2_PUBLIC_URL`), without a trailing slash.
/// Needs no credentials.
pub fn public_base_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = non_empty(lookup, "R2_PUBLIC_URL")
        .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string())
        .trim_end_matches('/')
        .to_string();
    validate_url("R2_PUBLIC_URL", &url)?;
    Ok(url)
}

/// Credentials and addressing for the R2 bucket.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub public_base_url: String,
    endpoint_override: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut required = Required::new(&lookup);
        let account_id = required.get("R2_ACCOUNT_ID");
        let access_key_id = required.get("R2_ACCESS_KEY_ID");
        let secret_access_key = required.get("R2_SECRET_ACCESS_KEY");
        required.finish()?;

        let bucket =
            non_empty(&lookup, "R2_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string());

        let public_base_url = public_base_url(&lookup)?;

        let endpoint_override = non_empty(&lookup, "R2_ENDPOINT");
        if let Some(endpoint) = &endpoint_override {
            validate_url("R2_ENDPOINT", endpoint)?;
        }

        Ok(Self {
            account_id,
            access_key_id,
            secret_access_key,
            bucket,
            public_base_url,
            endpoint_override,
        })
    }

    /// S3 API endpoint for the account.
    pub fn endpoint(&self) -> String {
        self.endpoint_override
            .clone()
            .unwrap_or_else(|| format!("https://{}.r2.cloudflarestorage.com", self.account_id))
    }

    /// Publicly addressable URL of an object.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// Directories used by `migrate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    pub source_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl MigrationConfig {
    pub fn from_env(source_arg: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve(source_arg, env_lookup)
    }

    /// The positional source argument wins over `MIGRATION_SOURCE_DIR`. The
    /// public directory defaults to `public/` next to the source directory.
    pub fn resolve<F>(source_arg: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_dir = match source_arg {
            Some(path) => expand(&path.to_string_lossy()),
            None => non_empty(&lookup, "MIGRATION_SOURCE_DIR")
                .map(|v| expand(&v))
                .ok_or(ConfigError::Missing(vec!["MIGRATION_SOURCE_DIR"]))?,
        };

        let public_dir = match non_empty(&lookup, "MIGRATION_PUBLIC_DIR") {
            Some(v) => expand(&v),
            None => source_dir
                .parent()
                .map(|p| p.join("public"))
                .unwrap_or_else(|| PathBuf::from("public")),
        };

        Ok(Self {
            source_dir,
            public_dir,
        })
    }
}

fn expand(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_notion_config_defaults() {
        let config = NotionConfig::from_lookup(lookup_from(&[
            ("NOTION_API_SECRET", "secret_abc"),
            ("DATABASE_ID", "2d82403f-bc5c-819f-a7f6-f1caee97d49f"),
        ]))
        .unwrap();

        assert_eq!(config.api_base, DEFAULT_NOTION_API_BASE);
        assert_eq!(config.version, DEFAULT_NOTION_VERSION);
        assert_eq!(config.masked_database_id(), "2d82403f...");
    }

    #[test]
    fn test_notion_config_reports_all_missing() {
        let err = NotionConfig::from_lookup(lookup_from(&[("DATABASE_ID", "  ")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["NOTION_API_SECRET", "DATABASE_ID"])
        );
        assert_eq!(
            err.to_string(),
            "missing required environment variables: NOTION_API_SECRET, DATABASE_ID"
        );
    }

    #[test]
    fn test_notion_config_rejects_bad_base() {
        let err = NotionConfig::from_lookup(lookup_from(&[
            ("NOTION_API_SECRET", "s"),
            ("DATABASE_ID", "d"),
            ("NOTION_API_BASE", "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "NOTION_API_BASE",
                ..
            }
        ));
    }

    #[test]
    fn test_storage_config_defaults_and_urls() {
        let config = StorageConfig::from_lookup(lookup_from(&[
            ("R2_ACCOUNT_ID", "acct"),
            ("R2_ACCESS_KEY_ID", "key"),
            ("R2_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bucket, DEFAULT_BUCKET_NAME);
        assert_eq!(config.endpoint(), "https://acct.r2.cloudflarestorage.com");
        assert_eq!(
            config.public_url("migration/cover.png"),
            "https://images.sssstudy.com/migration/cover.png"
        );
    }

    #[test]
    fn test_storage_config_trims_public_url_and_honors_endpoint() {
        let config = StorageConfig::from_lookup(lookup_from(&[
            ("R2_ACCOUNT_ID", "acct"),
            ("R2_ACCESS_KEY_ID", "key"),
            ("R2_SECRET_ACCESS_KEY", "secret"),
            ("R2_PUBLIC_URL", "https://cdn.example.com/"),
            ("R2_ENDPOINT", "http://127.0.0.1:9000"),
        ]))
        .unwrap();

        assert_eq!(config.public_url("a.png"), "https://cdn.example.com/a.png");
        assert_eq!(config.endpoint(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_storage_config_missing_credentials() {
        let err = StorageConfig::from_lookup(lookup_from(&[("R2_ACCOUNT_ID", "acct")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["R2_ACCESS_KEY_ID", "R2_SECRET_ACCESS_KEY"])
        );
    }

    #[test]
    fn test_migration_config_argument_wins() {
        let config = MigrationConfig::resolve(
            Some(Path::new("/srv/site/content")),
            lookup_from(&[("MIGRATION_SOURCE_DIR", "/elsewhere")]),
        )
        .unwrap();

        assert_eq!(config.source_dir, PathBuf::from("/srv/site/content"));
        assert_eq!(config.public_dir, PathBuf::from("/srv/site/public"));
    }

    #[test]
    fn test_migration_config_from_env_vars() {
        let config = MigrationConfig::resolve(
            None,
            lookup_from(&[
                ("MIGRATION_SOURCE_DIR", "/srv/site/content"),
                ("MIGRATION_PUBLIC_DIR", "/srv/assets"),
            ]),
        )
        .unwrap();

        assert_eq!(config.public_dir, PathBuf::from("/srv/assets"));
    }

    #[test]
    fn test_migration_config_requires_source() {
        let err = MigrationConfig::resolve(None, lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec!["MIGRATION_SOURCE_DIR"]));
    }

    #[test]
    #[serial_test::serial]
    fn test_notion_config_from_process_env() {
        std::env::set_var("NOTION_API_SECRET", "secret_from_env");
        std::env::set_var("DATABASE_ID", "abcdef0123456789");
        std::env::remove_var("NOTION_API_BASE");

        let config = NotionConfig::from_env().unwrap();
        assert_eq!(config.api_secret, "secret_from_env");
        assert_eq!(config.masked_database_id(), "abcdef01...");

        std::env::remove_var("NOTION_API_SECRET");
        std::env::remove_var("DATABASE_ID");
    }
}
