use std::path::Path;

use ciphr_crypto::{Cipher, Credentials, CryptoError, KdfParams, DEFAULT_CHUNK_SIZE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CiphrError, CiphrResult};

/// Top-level configuration (loaded from ciphr.toml)
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CiphrConfig {
    /// Warn if the config file is group/world-readable (default: true)
    pub config_file_mode_check: bool,
    pub credentials: CredentialsConfig,
    pub kdf: KdfConfig,
    pub stream: StreamConfig,
    pub log: LogConfig,
}

impl Default for CiphrConfig {
    fn default() -> Self {
        Self {
            config_file_mode_check: true,
            credentials: CredentialsConfig::default(),
            kdf: KdfConfig::default(),
            stream: StreamConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Password/salt source. Inline values win over environment variables.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Inline password (never serialized back out)
    #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,
    /// Inline salt (never serialized back out)
    #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
    pub salt: Option<SecretString>,
    /// Environment variable holding the password (default: CIPHER_PASSWORD)
    pub password_env: String,
    /// Environment variable holding the salt (default: CIPHER_SALT)
    pub salt_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            password: None,
            salt: None,
            password_env: "CIPHER_PASSWORD".into(),
            salt_env: "CIPHER_SALT".into(),
        }
    }
}

/// scrypt cost parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    /// log2(N) (default: 15, N = 32768)
    pub log_n: u8,
    /// Block size factor (default: 8)
    pub r: u32,
    /// Parallelization (default: 1)
    pub p: u32,
}

impl Default for KdfConfig {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            log_n: params.log_n,
            r: params.r,
            p: params.p,
        }
    }
}

impl From<&KdfConfig> for KdfParams {
    fn from(config: &KdfConfig) -> Self {
        Self {
            log_n: config.log_n,
            r: config.r,
            p: config.p,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// File read buffer in bytes; must be a multiple of 16 (default: 1024)
    pub chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Load configuration from `path`, falling back to defaults if it does not exist.
pub fn load_config(path: &Path) -> CiphrResult<CiphrConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(CiphrConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| CiphrError::Config(format!("reading {}: {e}", path.display())))?;
    toml::from_str(&content)
        .map_err(|e| CiphrError::Config(format!("parsing {}: {e}", path.display())))
}

/// Warn when a config file that may hold a password is group/world accessible.
///
/// Returns true if a warning was emitted.
#[cfg(unix)]
pub fn check_file_mode(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    let mode = meta.permissions().mode();
    if mode & 0o077 == 0 {
        return false;
    }
    tracing::warn!(
        path = %path.display(),
        mode = %format!("{:o}", mode & 0o777),
        "config file is accessible by group/others; consider chmod 600"
    );
    true
}

#[cfg(not(unix))]
pub fn check_file_mode(_path: &Path) -> bool {
    false
}

impl CiphrConfig {
    /// Resolve credentials from inline values or the process environment.
    pub fn resolve_credentials(&self) -> CiphrResult<Credentials> {
        self.resolve_credentials_with(|name| std::env::var(name).ok())
    }

    /// Resolve credentials using `lookup` for environment variables.
    ///
    /// Missing or empty values fail before any key derivation runs.
    pub fn resolve_credentials_with<F>(&self, lookup: F) -> CiphrResult<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let creds = &self.credentials;
        let password = pick(&creds.password, &creds.password_env, &lookup)
            .ok_or_else(|| missing("password", &creds.password_env))?;
        let salt = pick(&creds.salt, &creds.salt_env, &lookup)
            .ok_or_else(|| missing("salt", &creds.salt_env))?;

        Ok(Credentials::new(password, salt))
    }

    /// Build a [`Cipher`] from the resolved credentials and configured costs.
    pub fn cipher(&self) -> CiphrResult<Cipher> {
        Ok(Cipher::new(self.resolve_credentials()?)
            .with_kdf_params(KdfParams::from(&self.kdf))
            .with_chunk_size(self.stream.chunk_size))
    }
}

fn pick<F>(inline: &Option<SecretString>, env_name: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    inline
        .as_ref()
        .map(|s| s.expose_secret().to_owned())
        .or_else(|| lookup(env_name))
        .filter(|v| !v.is_empty())
}

fn missing(what: &str, env_name: &str) -> CiphrError {
    CiphrError::Crypto(CryptoError::Configuration(format!(
        "{what} not set (config [credentials].{what} or ${env_name})"
    )))
}
