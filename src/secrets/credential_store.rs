use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::dns::Credentials;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    secrets: BTreeMap<String, StoredCredentials>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredentials {
    api_key: String,
    api_secret: String,
}

/// Named Websupport API key pairs kept in a TOML file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CredentialsFile> {
        if !self.path.exists() {
            return Ok(CredentialsFile::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials file: {}", self.path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials file: {}", self.path.display()))
    }

    fn save(&self, creds: &CredentialsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(creds).context("Failed to serialize credentials")?;

        write_private(&self.path, content.as_bytes())
            .with_context(|| format!("Failed to write credentials file: {}", self.path.display()))
    }

    pub fn store(&self, name: &str, api_key: &str, api_secret: &str) -> Result<()> {
        let mut creds_file = self.load()?;

        creds_file.secrets.insert(
            name.to_string(),
            StoredCredentials {
                api_key: api_key.to_string(),
                api_secret: api_secret.to_string(),
            },
        );

        self.save(&creds_file)
    }

    pub fn get(&self, name: &str) -> Result<Credentials> {
        let creds_file = self.load()?;

        let stored = creds_file.secrets.get(name).ok_or_else(|| {
            anyhow!(
                "Credentials not found: {}. Use 'websupport-solver set-key {}' to store them.",
                name,
                name
            )
        })?;

        Ok(Credentials {
            api_key: stored.api_key.clone(),
            api_secret: stored.api_secret.clone(),
        })
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let mut creds_file = self.load()?;

        if creds_file.secrets.remove(name).is_none() {
            return Err(anyhow!("No credentials found: {}", name));
        }

        self.save(&creds_file)
    }
}

/// Writes `content` to `path` with owner-only permissions on unix, set at
/// creation time.
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;

    // mode() only applies on creation; tighten a pre-existing file too.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(path, content)
}
