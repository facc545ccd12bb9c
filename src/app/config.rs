//! Console configuration: parse/write `console.conf` and locate config files.
//!
//! The file uses the same `key = value` layout as `theme.conf` and
//! `keybinds.conf`. Lists are comma separated, scope sets are space separated.
//! Unknown keys are skipped so older binaries keep reading newer files.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{Context, Result};

pub const CONFIG_FILE: &str = "console.conf";

/// Directory holding the console's config files.
///
/// `$XDG_CONFIG_HOME/iam-console`, then `$HOME/.config/iam-console`, then the
/// current directory.
pub fn config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .map(|p| p.join("iam-console"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Existing file named `name`, looked up in the config dir then the current dir.
pub fn config_file_read_path(name: &str) -> Option<String> {
    [config_dir().join(name), PathBuf::from(name)]
        .into_iter()
        .find(|p| p.is_file())
        .map(|p| p.to_string_lossy().to_string())
}

/// Where a new `name` should be written; creates the config dir if it can.
pub fn config_file_write_path(name: &str) -> String {
    let dir = config_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return name.to_string();
    }
    dir.join(name).to_string_lossy().to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    /// Scopes granted to the operator, space separated.
    pub allowed_scopes: String,
    pub application_update_scopes: Vec<String>,
    pub application_delete_scopes: Vec<String>,
    pub do_not_delete_identity_providers: Vec<String>,
    pub deleting_forbidden_applications: Vec<String>,
    pub user_store_domains: Vec<String>,
    pub list_item_limit: usize,
    pub request_timeout_secs: u64,
    pub log_file: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:9443".to_string(),
            access_token: None,
            allowed_scopes: String::new(),
            application_update_scopes: Vec::new(),
            application_delete_scopes: Vec::new(),
            do_not_delete_identity_providers: Vec::new(),
            deleting_forbidden_applications: vec!["Console".to_string(), "My Account".to_string()],
            user_store_domains: vec![crate::scim::PRIMARY_DOMAIN.to_string()],
            list_item_limit: 10,
            request_timeout_secs: 30,
            log_file: None,
        }
    }
}

impl ConsoleConfig {
    /// Parse `key = value` lines over the defaults.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() {
                continue;
            }
            match key {
                "base_url" if !val.is_empty() => cfg.base_url = val.to_string(),
                "access_token" => {
                    cfg.access_token = (!val.is_empty()).then(|| val.to_string());
                }
                "allowed_scopes" => cfg.allowed_scopes = split_words(val).join(" "),
                "application_update_scopes" => cfg.application_update_scopes = split_words(val),
                "application_delete_scopes" => cfg.application_delete_scopes = split_words(val),
                "do_not_delete_identity_providers" => {
                    cfg.do_not_delete_identity_providers = split_list(val)
                }
                "deleting_forbidden_applications" => {
                    cfg.deleting_forbidden_applications = split_list(val)
                }
                "user_store_domains" => {
                    let domains = split_list(val);
                    if !domains.is_empty() {
                        cfg.user_store_domains = domains;
                    }
                }
                "list_item_limit" => match val.parse::<usize>() {
                    Ok(n) if n > 0 => cfg.list_item_limit = n,
                    _ => warn!(value = val, "ignoring invalid list_item_limit"),
                },
                "request_timeout_secs" => match val.parse::<u64>() {
                    Ok(n) if n > 0 => cfg.request_timeout_secs = n,
                    _ => warn!(value = val, "ignoring invalid request_timeout_secs"),
                },
                "log_file" => cfg.log_file = (!val.is_empty()).then(|| val.to_string()),
                other => debug!(key = other, "unknown config key"),
            }
        }
        cfg
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Read a file the operator named explicitly; a missing file is an error here.
    pub fn load_explicit(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).with_ctx(|| format!("read config {path}"))?;
        Ok(Self::parse(&contents))
    }

    /// Load from `path`, or from the usual locations, or write a commented default.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = config_file_read_path(CONFIG_FILE) {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            warn!(%path, error = %e, "could not write default console.conf");
        }
        cfg
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# iam-console configuration\n");
        buf.push_str("# Lists are comma separated; scope sets are space separated.\n\n");
        let _ = writeln!(&mut buf, "base_url = {}", self.base_url);
        buf.push_str("# Bearer token; prefer IAM_CONSOLE_TOKEN over storing it here.\n");
        let _ = writeln!(
            &mut buf,
            "access_token = {}",
            self.access_token.as_deref().unwrap_or_default()
        );
        let _ = writeln!(&mut buf, "allowed_scopes = {}", self.allowed_scopes);
        let _ = writeln!(
            &mut buf,
            "application_update_scopes = {}",
            self.application_update_scopes.join(" ")
        );
        let _ = writeln!(
            &mut buf,
            "application_delete_scopes = {}",
            self.application_delete_scopes.join(" ")
        );
        let _ = writeln!(
            &mut buf,
            "do_not_delete_identity_providers = {}",
            self.do_not_delete_identity_providers.join(", ")
        );
        let _ = writeln!(
            &mut buf,
            "deleting_forbidden_applications = {}",
            self.deleting_forbidden_applications.join(", ")
        );
        let _ = writeln!(&mut buf, "user_store_domains = {}", self.user_store_domains.join(", "));
        let _ = writeln!(&mut buf, "list_item_limit = {}", self.list_item_limit);
        let _ = writeln!(&mut buf, "request_timeout_secs = {}", self.request_timeout_secs);
        let _ = writeln!(
            &mut buf,
            "log_file = {}",
            self.log_file.as_deref().unwrap_or_default()
        );
        std::fs::write(path, buf)
    }
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_words(val: &str) -> Vec<String> {
    val.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_defaults_and_skips_noise() {
        let cfg = ConsoleConfig::parse(
            "\
# comment
base_url = https://iam.example.com
allowed_scopes = a   b c
application_delete_scopes = internal_application_mgt_delete
do_not_delete_identity_providers = SSO, ,Corporate AD
user_store_domains =
list_item_limit = zero
mystery = 1
",
        );
        assert_eq!(cfg.base_url, "https://iam.example.com");
        assert_eq!(cfg.allowed_scopes, "a b c");
        assert_eq!(cfg.application_delete_scopes, ["internal_application_mgt_delete"]);
        assert_eq!(cfg.do_not_delete_identity_providers, ["SSO", "Corporate AD"]);
        assert_eq!(cfg.user_store_domains, ["primary"]);
        assert_eq!(cfg.list_item_limit, 10);
        assert_eq!(cfg.access_token, None);
    }

    #[test]
    fn write_then_parse_keeps_values() {
        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("iamc_conf_{}_{}.conf", std::process::id(), nonce));
        let path = path.to_string_lossy().to_string();

        let cfg = ConsoleConfig {
            access_token: Some("tok".into()),
            user_store_domains: vec!["primary".into(), "CORP".into()],
            list_item_limit: 25,
            ..ConsoleConfig::default()
        };
        cfg.write_file(&path).unwrap();
        let back = ConsoleConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, cfg);
    }

    #[test]
    fn explicit_missing_file_is_an_error_with_context() {
        let err = ConsoleConfig::load_explicit("/nonexistent/iam-console/console.conf").unwrap_err();
        assert!(err.to_string().starts_with("read config /nonexistent"));
    }
}
