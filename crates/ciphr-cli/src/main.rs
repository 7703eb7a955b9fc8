//! ciphr: password-based encryption for text and files
//!
//! Commands:
//!   encrypt-text <text>        - print a base64 AES-GCM envelope
//!   decrypt-text <base64>      - print the decrypted text
//!   encrypt-file <src> <dst>   - AES-CTR encrypt a file (IV appended)
//!   decrypt-file <src> <dst>   - decrypt a file produced by encrypt-file
//!   config show                - display the effective configuration
//!
//! Credentials come from --password/--salt, the config file, or
//! CIPHER_PASSWORD/CIPHER_SALT (a `.env` file in the working directory is
//! loaded first).

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use tracing::info;

use ciphr_core::config::{check_file_mode, load_config, CiphrConfig};
use ciphr_crypto::{Cipher, CryptoResult};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "ciphr",
    version,
    about = "Password-based text and file encryption",
    long_about = "ciphr: scrypt-derived AES-256 keys, GCM envelopes for text, CTR streams for files"
)]
struct Cli {
    /// Path to ciphr.toml configuration file
    #[arg(long, short = 'c', env = "CIPHR_CONFIG", default_value = "ciphr.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides [log].level
    #[arg(long, env = "CIPHR_LOG")]
    log: Option<String>,

    /// Log format; overrides [log].format
    #[arg(long, env = "CIPHR_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Password (overrides config and environment)
    #[arg(long, global = true)]
    password: Option<String>,

    /// Salt (overrides config and environment)
    #[arg(long, global = true)]
    salt: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum, PartialEq)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a string and print the envelope as base64
    #[command(name = "encrypt-text")]
    EncryptText {
        /// Plaintext to encrypt
        text: String,
    },

    /// Decrypt a base64 envelope and print the text
    #[command(name = "decrypt-text")]
    DecryptText {
        /// Base64 envelope from encrypt-text
        envelope: String,
    },

    /// Encrypt a file; the output is the ciphertext followed by a 16-byte IV
    ///
    /// Output is written to a temporary file next to the destination and
    /// renamed into place only on success.
    #[command(name = "encrypt-file")]
    EncryptFile { src: PathBuf, dst: PathBuf },

    /// Decrypt a file produced by encrypt-file
    ///
    /// No integrity check exists for files: a wrong password or tampered
    /// input yields garbage, not an error.
    #[command(name = "decrypt-file")]
    DecryptFile { src: PathBuf, dst: PathBuf },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (defaults merged with the config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Missing .env is the common case
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = match cli.log_format.clone() {
        Some(format) => format,
        None => LogFormat::from_str(&config.log.format, true)
            .map_err(|e| anyhow::anyhow!("invalid [log].format: {e}"))?,
    };
    init_logging(&level, &format);

    if cli.config.exists() && config.config_file_mode_check {
        check_file_mode(&cli.config);
    }

    if let Some(password) = cli.password {
        config.credentials.password = Some(SecretString::from(password));
    }
    if let Some(salt) = cli.salt {
        config.credentials.salt = Some(SecretString::from(salt));
    }

    match cli.command {
        Commands::EncryptText { text } => cmd_encrypt_text(&config, &text),
        Commands::DecryptText { envelope } => cmd_decrypt_text(&config, &envelope),
        Commands::EncryptFile { src, dst } => cmd_encrypt_file(&config, &src, &dst),
        Commands::DecryptFile { src, dst } => cmd_decrypt_file(&config, &src, &dst),
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config),
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stderr only: stdout carries envelopes and plaintext
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn cipher_from(config: &CiphrConfig) -> Result<Cipher> {
    config.cipher().context("resolving credentials")
}

// ── `ciphr encrypt-text` / `decrypt-text` ─────────────────────────────────────

fn cmd_encrypt_text(config: &CiphrConfig, text: &str) -> Result<()> {
    let envelope = cipher_from(config)?
        .encrypt_text(text)
        .context("encrypting text")?;
    println!("{}", base64::engine::general_purpose::STANDARD.encode(envelope));
    Ok(())
}

fn cmd_decrypt_text(config: &CiphrConfig, envelope_b64: &str) -> Result<()> {
    let envelope = base64::engine::general_purpose::STANDARD
        .decode(envelope_b64.trim())
        .context("envelope is not valid base64")?;
    let text = cipher_from(config)?
        .decrypt_text(&envelope)
        .context("decrypting text")?;
    println!("{text}");
    Ok(())
}

// ── `ciphr encrypt-file` / `decrypt-file` ─────────────────────────────────────

fn cmd_encrypt_file(config: &CiphrConfig, src: &Path, dst: &Path) -> Result<()> {
    let cipher = cipher_from(config)?;
    let bytes = write_atomically(dst, |tmp| cipher.encrypt_file(src, tmp))
        .with_context(|| format!("encrypting {} -> {}", src.display(), dst.display()))?;
    report(dst, bytes)
}

fn cmd_decrypt_file(config: &CiphrConfig, src: &Path, dst: &Path) -> Result<()> {
    let cipher = cipher_from(config)?;
    let bytes = write_atomically(dst, |tmp| cipher.decrypt_file(src, tmp))
        .with_context(|| format!("decrypting {} -> {}", src.display(), dst.display()))?;
    report(dst, bytes)
}

/// Run `op` against a temp file in `dst`'s directory, then rename it over `dst`.
///
/// On failure the temp file is removed and `dst` is left untouched.
fn write_atomically<F>(dst: &Path, op: F) -> Result<u64>
where
    F: FnOnce(&Path) -> CryptoResult<u64>,
{
    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::Builder::new()
        .prefix(".ciphr-")
        .tempfile_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;

    let bytes = op(tmp.path())?;

    tmp.persist(dst)
        .map_err(|e| e.error)
        .with_context(|| format!("renaming temp file to {}", dst.display()))?;
    Ok(bytes)
}

fn report(dst: &Path, bytes: u64) -> Result<()> {
    let digest = file_digest(dst)?;
    info!(path = %dst.display(), bytes, blake3 = %digest, "wrote output");
    println!("{bytes} bytes -> {} (blake3 {digest})", dst.display());
    Ok(())
}

fn file_digest(path: &Path) -> Result<blake3::Hash> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("hashing {}", path.display()))?;
    Ok(hasher.finalize())
}

// ── `ciphr config show` ───────────────────────────────────────────────────────

fn cmd_config_show(config: &CiphrConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!("# Inline credentials are never printed");
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciphr_crypto::{CryptoError, Credentials, KdfParams};
    use clap::CommandFactory;

    fn fast_cipher() -> Cipher {
        Cipher::new(Credentials::new("cli-password", "cli-salt")).with_kdf_params(KdfParams {
            log_n: 4,
            r: 8,
            p: 1,
        })
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encrypt_file() {
        let cli = Cli::try_parse_from([
            "ciphr",
            "encrypt-file",
            "in.txt",
            "out.enc",
            "--password",
            "pw",
        ])
        .unwrap();

        assert_eq!(cli.password.as_deref(), Some("pw"));
        assert!(matches!(cli.command, Commands::EncryptFile { .. }));
    }

    #[test]
    fn test_write_atomically_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("plain.txt");
        let enc = tmp.path().join("plain.enc");
        let dec = tmp.path().join("plain.dec");
        std::fs::write(&src, b"atomic contents").unwrap();

        let cipher = fast_cipher();
        write_atomically(&enc, |t| cipher.encrypt_file(&src, t)).unwrap();
        write_atomically(&dec, |t| cipher.decrypt_file(&enc, t)).unwrap();

        assert_eq!(file_digest(&src).unwrap(), file_digest(&dec).unwrap());
    }

    #[test]
    fn test_write_atomically_leaves_destination_on_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let short = tmp.path().join("short.enc");
        let dst = tmp.path().join("keep.txt");
        std::fs::write(&short, b"tiny").unwrap();
        std::fs::write(&dst, b"previous").unwrap();

        let cipher = fast_cipher();
        let err = write_atomically(&dst, |t| cipher.decrypt_file(&short, t)).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CryptoError>(),
            Some(CryptoError::TruncatedInput { .. })
        ));
        assert_eq!(std::fs::read(&dst).unwrap(), b"previous");
        let leftovers = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with(".ciphr-")
            })
            .count();
        assert_eq!(leftovers, 0, "temp file must be cleaned up");
    }
}
