use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Longest consent cookie lifetime accepted from flags, in days.
pub const MAX_CONSENT_DAYS: i64 = 36_500;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub debug: bool,
    pub consent_cookie: Option<String>,
    pub consent_days: Option<i64>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            debug: self.debug || other.debug,
            consent_cookie: other
                .consent_cookie
                .clone()
                .or_else(|| self.consent_cookie.clone()),
            consent_days: other.consent_days.or(self.consent_days),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpen").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpen")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpen").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("markpen").join("config");
        }
    }

    PathBuf::from(".markpenrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpenrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# markpen defaults (saved with --save)".to_string());
    if flags.debug {
        lines.push("--debug".to_string());
    }
    if let Some(cookie) = &flags.consent_cookie {
        lines.push(format!("--consent-cookie {cookie}"));
    }
    if let Some(days) = flags.consent_days {
        lines.push(format!("--consent-days {days}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Apply `--clear` and `--save` to the global file, then merge the saved
/// defaults with the command-line flags.
///
/// Clearing happens before saving. After a clear, neither file contributes,
/// so only `cli` takes effect for this run.
pub fn resolve_config_flags(
    global: &Path,
    local: &Path,
    cli: &ConfigFlags,
    save: bool,
    clear: bool,
) -> Result<ConfigFlags> {
    if clear {
        clear_config_flags(global)?;
    }
    if save {
        save_config_flags(global, cli)?;
    }
    let file_flags = if clear {
        ConfigFlags::default()
    } else {
        load_config_flags(global)?.union(&load_config_flags(local)?)
    };
    Ok(file_flags.union(cli))
}

fn parse_days(value: &str) -> Option<i64> {
    value
        .parse()
        .ok()
        .filter(|days| (0..=MAX_CONSENT_DAYS).contains(days))
}

/// Pick the known flags out of a token list, ignoring everything else.
///
/// Valued flags accept both `--flag value` and `--flag=value`.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--debug" {
            flags.debug = true;
            i += 1;
            continue;
        }
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token, None),
        };
        if !matches!(name, "--consent-cookie" | "--consent-days") {
            i += 1;
            continue;
        }
        let value = match inline {
            Some(value) => Some(value),
            None => {
                i += 1;
                tokens.get(i).cloned()
            }
        };
        if let Some(value) = value {
            match name {
                "--consent-cookie" => flags.consent_cookie = Some(value),
                _ => flags.consent_days = parse_days(&value),
            }
        }
        i += 1;
    }
    flags
}
