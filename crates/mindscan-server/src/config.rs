use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_RETENTION_DAYS: u32 = 365;
const DEVELOPMENT_SECRET: &str = "mindscan-development-secret";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub bind_addr: String,
    pub database_path: PathBuf,
    /// Directory of declarative instrument definitions loaded at startup.
    #[serde(default)]
    pub instruments_dir: Option<PathBuf>,
    /// Added in v1. 0 keeps assessments indefinitely.
    pub retention_days: u32,
    /// Salt for key derivation and subject hashing. Changing it orphans
    /// every stored record.
    pub encryption_salt: String,
}

impl ServerConfig {
    pub fn with_defaults(database_path: PathBuf) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            bind_addr: "127.0.0.1:8080".to_string(),
            database_path,
            instruments_dir: None,
            retention_days: DEFAULT_RETENTION_DAYS,
            encryption_salt: mindscan_storage::crypto::generate_salt(),
        }
    }

    pub fn retention(&self) -> Option<jiff::SignedDuration> {
        (self.retention_days > 0).then(|| jiff::SignedDuration::from_hours(i64::from(self.retention_days) * 24))
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("mindscan"))
}

/// `MINDSCAN_CONFIG` if set, otherwise `config.json` under the platform config dir.
pub fn config_path() -> eyre::Result<PathBuf> {
    match std::env::var_os("MINDSCAN_CONFIG") {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(config_dir()?.join("config.json")),
    }
}

/// Load the config at `path`. A missing file yields defaults, which are
/// written back so the generated salt survives restarts.
pub fn load_or_init(path: &Path) -> eyre::Result<ServerConfig> {
    if !path.exists() {
        let database_path = path
            .parent()
            .map(|dir| dir.join("mindscan.db"))
            .unwrap_or_else(|| PathBuf::from("mindscan.db"));
        let config = ServerConfig::with_defaults(database_path);
        match save_config(&config, path) {
            Ok(()) => tracing::info!(path = %path.display(), "wrote default config"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not persist default config"),
        }
        return Ok(config);
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> eyre::Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ServerConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: add retention_days
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("retention_days")
            .or_insert(serde_json::Value::Number(DEFAULT_RETENTION_DAYS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added retention_days)");
    }

    Ok(json)
}

pub fn save_config(config: &ServerConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// `MINDSCAN_ENCRYPTION_SECRET`, or a fixed development secret.
pub fn encryption_secret() -> String {
    match std::env::var("MINDSCAN_ENCRYPTION_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::warn!("MINDSCAN_ENCRYPTION_SECRET not set; using the development secret");
            DEVELOPMENT_SECRET.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v0_config_gains_retention_days() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"bind_addr":"0.0.0.0:9000","database_path":"/var/lib/mindscan.db","encryption_salt":"abc"}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.config_version, 1);
        assert_eq!(config.retention_days, DEFAULT_RETENTION_DAYS);
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.instruments_dir, None);
    }

    #[test]
    fn newer_versions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"config_version":99}"#).unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("newer than this build supports"));
    }

    #[test]
    fn missing_file_is_initialised_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let first = load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(first.database_path, dir.path().join("nested").join("mindscan.db"));

        let second = load_or_init(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_retention_keeps_forever() {
        let mut config = ServerConfig::with_defaults(PathBuf::from("db"));
        assert_eq!(config.retention(), Some(jiff::SignedDuration::from_hours(365 * 24)));
        config.retention_days = 0;
        assert_eq!(config.retention(), None);
    }
}
