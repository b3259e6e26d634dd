use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

use crate::error::AnalyzerError;

pub const ENDPOINT_KEY: &str = "AZURE_OPENAI_ENDPOINT";
pub const API_KEY_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const API_VERSION_KEY: &str = "API_VERSION";
pub const DEPLOYMENT_KEY: &str = "DEPLOYMENT_NAME";
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o-mini";

pub const SECRET_KEYS: &[&str] = &[ENDPOINT_KEY, API_KEY_KEY, API_VERSION_KEY, DEPLOYMENT_KEY];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub home_dir: PathBuf,
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
    pub secrets_file: PathBuf,
}

pub fn resolve_runtime_paths(
    home_dir: &Path,
    cwd: &Path,
    out_dir_override: Option<&Path>,
    secrets_override: Option<&Path>,
) -> Result<RuntimePaths> {
    if !home_dir.is_absolute() {
        bail!("home_dir must be absolute: {}", home_dir.display());
    }
    if !cwd.is_absolute() {
        bail!("cwd must be absolute: {}", cwd.display());
    }

    let home_dir = normalize_lexical(home_dir);
    let cwd = normalize_lexical(cwd);
    let out_dir = match out_dir_override {
        Some(path) => resolve_user_path(path, &home_dir, &cwd)?,
        None => cwd.clone(),
    };
    let secrets_file = match secrets_override {
        Some(path) => resolve_user_path(path, &home_dir, &cwd)?,
        None => home_dir.join(".sqlopt").join("secrets.toml"),
    };

    Ok(RuntimePaths {
        home_dir,
        cwd,
        out_dir: normalize_lexical(&out_dir),
        secrets_file: normalize_lexical(&secrets_file),
    })
}

/// Credentials for the hosted completion endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
}

impl Debug for ServiceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .finish()
    }
}

impl ServiceConfig {
    /// Resolves credentials from `lookup` (normally the process environment)
    /// layered over the flat key/value pairs of a secrets file. Lookup wins;
    /// blank values count as absent.
    pub fn resolve<F>(lookup: F, secrets: &BTreeMap<String, String>) -> Result<Self, AnalyzerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_for = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| {
                    secrets
                        .get(key)
                        .filter(|value| !value.trim().is_empty())
                        .cloned()
                })
                .map(|value| value.trim().to_string())
        };

        let endpoint = value_for(ENDPOINT_KEY);
        let api_key = value_for(API_KEY_KEY);
        let api_version = value_for(API_VERSION_KEY);

        let missing = [
            (ENDPOINT_KEY, endpoint.is_none()),
            (API_KEY_KEY, api_key.is_none()),
            (API_VERSION_KEY, api_version.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key.to_string())
        .collect::<Vec<_>>();

        match (endpoint, api_key, api_version) {
            (Some(endpoint), Some(api_key), Some(api_version)) => {
                if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                    return Err(AnalyzerError::InvalidConfig(format!(
                        "{ENDPOINT_KEY} must be an http(s) URL: {endpoint}"
                    )));
                }
                Ok(Self {
                    endpoint,
                    api_key,
                    api_version,
                    deployment: value_for(DEPLOYMENT_KEY)
                        .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string()),
                })
            }
            _ => Err(AnalyzerError::MissingConfig { missing }),
        }
    }

    pub fn from_environment(secrets_file: &Path) -> Result<Self, AnalyzerError> {
        let secrets = load_secrets_file(secrets_file)?;
        Self::resolve(|key| std::env::var(key).ok(), &secrets)
    }
}

/// Reads a flat TOML secrets file. A missing file yields no secrets; keys
/// with non-string values are ignored.
pub fn load_secrets_file(path: &Path) -> Result<BTreeMap<String, String>, AnalyzerError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(BTreeMap::new());
        }
        Err(error) => {
            return Err(AnalyzerError::InvalidConfig(format!(
                "failed to read secrets file {}: {error}",
                path.display()
            )));
        }
    };
    parse_secrets(&content).map_err(|error| {
        AnalyzerError::InvalidConfig(format!(
            "secrets file {} is not valid TOML: {error}",
            path.display()
        ))
    })
}

fn parse_secrets(content: &str) -> Result<BTreeMap<String, String>, toml::de::Error> {
    let table = content.parse::<toml::Table>()?;
    Ok(table
        .into_iter()
        .filter(|(key, _)| SECRET_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| match value {
            toml::Value::String(text) => Some((key, text)),
            _ => None,
        })
        .collect())
}

fn resolve_user_path(path: &Path, home_dir: &Path, cwd: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path, home_dir)?;
    let resolved = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    Ok(normalize_lexical(&resolved))
}

fn expand_tilde(path: &Path, home_dir: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let mut expanded = home_dir.to_path_buf();
            for component in components {
                expanded.push(component.as_os_str());
            }
            Ok(expanded)
        }
        Some(Component::Normal(first))
            if first
                .to_str()
                .is_some_and(|segment| segment.starts_with('~')) =>
        {
            bail!(
                "unsupported home expansion syntax (only `~` and `~/...` are supported): {}",
                path.display()
            )
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            _ => normalized.push(component.as_os_str()),
        }
    }

    normalized
}
