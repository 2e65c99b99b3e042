/// External configuration loader.
///
/// Reads `bridgeworks.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::domain::lever::DEFAULT_LEFT_GID;

pub const CONFIG_FILE: &str = "bridgeworks.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub tick_rate_ms: u64,
    pub maps_dir: PathBuf,
    pub lever: LeverConfig,
    pub gate: GateConfig,
    pub player: PlayerConfig,
}

#[derive(Clone, Debug)]
pub struct LeverConfig {
    pub home_map: String,
    pub peer_map: String,
    pub left_gid: u32,   // center and right are the next two gids
}

#[derive(Clone, Debug)]
pub struct GateConfig {
    pub item: String,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub name: String,
    pub start_map: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    server: TomlServer,
    #[serde(default)]
    lever: TomlLever,
    #[serde(default)]
    gate: TomlGate,
    #[serde(default)]
    player: TomlPlayer,
}

#[derive(Deserialize, Debug)]
struct TomlServer {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_maps_dir")]
    maps_dir: String,
}

#[derive(Deserialize, Debug)]
struct TomlLever {
    #[serde(default = "default_home_map")]
    home_map: String,
    #[serde(default = "default_peer_map")]
    peer_map: String,
    #[serde(default = "default_left_gid")]
    left_gid: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGate {
    #[serde(default = "default_gate_item")]
    item: String,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_player_name")]
    name: String,
    #[serde(default = "default_start_map")]
    start_map: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 100 }
fn default_maps_dir() -> String { "maps".into() }
fn default_home_map() -> String { "end".into() }
fn default_peer_map() -> String { "start".into() }
fn default_left_gid() -> u32 { DEFAULT_LEFT_GID }
fn default_gate_item() -> String { "magic wand".into() }
fn default_player_name() -> String { "player".into() }
fn default_start_map() -> String { "end".into() }

impl Default for TomlServer {
    fn default() -> Self {
        TomlServer {
            tick_rate_ms: default_tick_rate(),
            maps_dir: default_maps_dir(),
        }
    }
}

impl Default for TomlLever {
    fn default() -> Self {
        TomlLever {
            home_map: default_home_map(),
            peer_map: default_peer_map(),
            left_gid: default_left_gid(),
        }
    }
}

impl Default for TomlGate {
    fn default() -> Self {
        TomlGate { item: default_gate_item() }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            name: default_player_name(),
            start_map: default_start_map(),
        }
    }
}

// ── Loading ──

impl ServerConfig {
    /// Load config from `bridgeworks.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::resolve(toml_cfg, &search_dirs)
    }

    /// Parse a config document directly. Used by tests and embedders.
    #[allow(dead_code)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::resolve(cfg, &[]))
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve maps directory against the search dirs, like the config itself
        let maps_dir_str = &toml_cfg.server.maps_dir;
        let maps_dir = if PathBuf::from(maps_dir_str).is_absolute() {
            PathBuf::from(maps_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(maps_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(maps_dir_str))
        };

        ServerConfig {
            tick_rate_ms: toml_cfg.server.tick_rate_ms,
            maps_dir,
            lever: LeverConfig {
                home_map: toml_cfg.lever.home_map,
                peer_map: toml_cfg.lever.peer_map,
                left_gid: toml_cfg.lever.left_gid,
            },
            gate: GateConfig { item: toml_cfg.gate.item },
            player: PlayerConfig {
                name: toml_cfg.player.name,
                start_map: toml_cfg.player.start_map,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::resolve(TomlConfig::default(), &[])
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for the config file in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        info!(path = %path.display(), "config loaded");
                        return cfg;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "config parse error, using defaults");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read config");
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.tick_rate_ms, 100);
        assert_eq!(cfg.lever.home_map, "end");
        assert_eq!(cfg.lever.peer_map, "start");
        assert_eq!(cfg.lever.left_gid, 381);
        assert_eq!(cfg.gate.item, "magic wand");
        assert_eq!(cfg.maps_dir, PathBuf::from("maps"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = ServerConfig::from_toml_str(
            "[lever]\npeer_map = \"north\"\n[player]\nname = \"ana\"\n",
        ).unwrap();
        assert_eq!(cfg.lever.peer_map, "north");
        assert_eq!(cfg.lever.home_map, "end");
        assert_eq!(cfg.player.name, "ana");
        assert_eq!(cfg.player.start_map, "end");
    }

    #[test]
    fn bad_types_are_errors() {
        assert!(ServerConfig::from_toml_str("[server]\ntick_rate_ms = \"fast\"\n").is_err());
    }
}
