//! Infrastructure implementation of the `ConfigStore` port.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bootstrap_common::BundleCredentials;

use crate::application::ports::ConfigStore;
use crate::domain::config::BootstrapConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "BOOTSTRAP_CONFIG";

/// Prefix of the environment variables that supply bundle credentials,
/// e.g. `BOOTSTRAP_BUNDLE_ACCESS_KEY_ID`.
pub const BUNDLE_ENV_PREFIX: &str = "BOOTSTRAP_BUNDLE_";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store at `$BOOTSTRAP_CONFIG` or `~/.gentoo-bootstrap/config.yaml`.
    #[must_use]
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Store at an arbitrary path (for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl Default for YamlConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<BootstrapConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(BootstrapConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &BootstrapConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".gentoo-bootstrap").join("config.yaml"))
    }
}

/// Reads bundle credentials from `BOOTSTRAP_BUNDLE_*` variables in `vars`.
///
/// Returns `Ok(None)` when no such variable is present. Once any is present,
/// all eight are required.
///
/// # Errors
///
/// Returns an error if some but not all bundle variables are set.
pub fn bundle_from_vars<I>(vars: I) -> Result<Option<BundleCredentials>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(k, _)| k.starts_with(BUNDLE_ENV_PREFIX))
        .collect();
    if vars.is_empty() {
        return Ok(None);
    }
    let bundle = envy::prefixed(BUNDLE_ENV_PREFIX)
        .from_iter(vars)
        .with_context(|| format!("incomplete bundle credentials in {BUNDLE_ENV_PREFIX}* variables"))?;
    Ok(Some(bundle))
}

/// Collects the `BOOTSTRAP_BUNDLE_*` entries of an OS environment listing.
///
/// Unrelated variables are skipped whatever their encoding.
///
/// # Errors
///
/// Returns an error if a bundle variable's value is not valid UTF-8.
pub fn bundle_env_vars<I>(vars: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(k, v)| {
            let key = k.into_string().ok()?;
            key.starts_with(BUNDLE_ENV_PREFIX).then_some((key, v))
        })
        .map(|(key, value)| {
            let value = value
                .into_string()
                .map_err(|_| anyhow::anyhow!("value is not valid UTF-8"))
                .with_context(|| format!("cannot read {key}"))?;
            Ok((key, value))
        })
        .collect()
}

/// Loads the config file and fills in bundle credentials from the process
/// environment when the file has none.
///
/// The environment never overrides a `bundle:` section in the file, and the
/// merged result is never written back.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the bundle
/// environment variables are incomplete.
pub fn load_effective(store: &impl ConfigStore) -> Result<BootstrapConfig> {
    let mut config = store.load()?;
    if config.bundle.is_none() {
        config.bundle = bundle_from_vars(bundle_env_vars(std::env::vars_os())?)?;
    }
    Ok(config)
}
