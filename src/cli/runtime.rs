use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub const ENV_FILE: &str = "config/local.env";
const LOCAL_CONFIG: &str = "config/hopwatch.yaml";

/// Load `KEY=VALUE` lines from `path` into the process environment.
/// Variables that are already set win. Returns how many were applied.
pub fn load_env_file(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let contents = stdfs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut applied = 0;
    for (key, value) in parse_env_lines(&contents) {
        if env::var(&key).is_ok() {
            continue;
        }
        env::set_var(&key, value);
        applied += 1;
    }
    Ok(applied)
}

fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unescape_value(value.trim())))
        })
        .collect()
}

fn unescape_value(value: &str) -> String {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        let inner = &value[1..value.len() - 1];
        inner
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\r", "\r")
            .replace("\\t", "\t")
    } else {
        value.to_string()
    }
}

/// Where log lines go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

/// Install the global subscriber. Keep the returned guard alive for as long
/// as file logging should keep flushing.
pub fn init_logging(level: &str, debug: bool, sink: &LogSink) -> Result<Option<WorkerGuard>> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    match sink {
        LogSink::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
        LogSink::File(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            stdfs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .context("Log file path has no file name")?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Ok(Some(guard))
        }
    }
}

pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("hopwatch")
        .join("hopwatch.log")
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub found: bool,
}

/// Priority: `--config` > ./config/hopwatch.yaml > ~/.config/hopwatch/config.yaml.
/// A missing file yields defaults; a present but invalid file is an error.
pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => path.clone(),
        None => {
            let local_config = PathBuf::from(LOCAL_CONFIG);
            if local_config.exists() {
                local_config
            } else {
                let mut path = dirs::config_dir().context("Failed to get config directory")?;
                path.push("hopwatch");
                path.push("config.yaml");
                path
            }
        }
    };

    if !path.exists() {
        return Ok(LoadedConfig {
            config: Config::default(),
            path,
            found: false,
        });
    }

    let content = fs::read_to_string(&path)
        .await
        .context("Failed to read config file")?;
    let config = Config::from_yaml_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(LoadedConfig {
        config,
        path,
        found: true,
    })
}
