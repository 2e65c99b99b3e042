/// Map loader and world assembly.
///
/// ## Sources (priority order):
///   1. `<maps_dir>/<name>.toml` from the config
///   2. Built-in embedded maps (`start`, `end`)
///
/// ## Map format (TOML):
///   ```toml
///   name = "end"
///   width = 24
///   height = 10
///   spawn = [2, 5]
///
///   [[layers]]
///   name = "bridge1"
///   visible = true
///
///   [[objects]]
///   name = "bridge1InBounds"
///   type = "area"
///   groups = ["reference", "inBounds"]
///   x = 10
///   y = 2
///   w = 4
///   h = 1
///   gid = 381        # optional
///   ```
///
/// Groups: `props`, `reference`, `triggers`, `inBounds`, `outOfBounds`.
/// An object listed in several groups is one object shared by all of them.
/// Objects in triggers/inBounds/outOfBounds get rect collision on load.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::config::ServerConfig;
use crate::domain::geometry::{CollisionType, Rect};
use crate::domain::group::ObjectGroup;
use crate::domain::object::ObjectKind;
use crate::error::WorldError;

use super::dispatch::install_holdables;
use super::gate::MagicGate;
use super::lever::LeverMechanic;
use super::map::MapInstance;
use super::world::World;

const EMBEDDED_START: &str = include_str!("../../maps/start.toml");
const EMBEDDED_END: &str = include_str!("../../maps/end.toml");

// ── TOML Schema ──

#[derive(Deserialize, Debug)]
struct MapFile {
    name: String,
    width: usize,
    height: usize,
    #[serde(default)]
    spawn: [usize; 2],
    #[serde(default)]
    layers: Vec<LayerDef>,
    #[serde(default)]
    objects: Vec<ObjectDef>,
}

#[derive(Deserialize, Debug)]
struct LayerDef {
    name: String,
    #[serde(default = "default_visible")]
    visible: bool,
}

#[derive(Deserialize, Debug)]
struct ObjectDef {
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    groups: Vec<String>,
    x: usize,
    y: usize,
    #[serde(default = "default_size")]
    w: usize,
    #[serde(default = "default_size")]
    h: usize,
    gid: Option<u32>,
}

fn default_visible() -> bool { true }
fn default_size() -> usize { 1 }

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Parse one map document. `source` names it in errors.
pub fn parse_map(source: &str, text: &str) -> Result<MapInstance, WorldError> {
    let file: MapFile = toml::from_str(text).map_err(|e| WorldError::Parse {
        map: source.to_string(),
        source: e,
    })?;

    let mut map = MapInstance::new(&file.name, file.width, file.height, (file.spawn[0], file.spawn[1]));
    for layer in &file.layers {
        map.add_layer(&layer.name, layer.visible);
    }

    for def in &file.objects {
        let groups = def.groups.iter()
            .map(|g| ObjectGroup::from_name(g).ok_or_else(|| WorldError::UnknownGroup {
                map: file.name.clone(),
                object: def.name.clone(),
                group: g.clone(),
            }))
            .collect::<Result<Vec<_>, _>>()?;

        let id = map.spawn_object(
            &def.name,
            ObjectKind::from_type(&def.kind),
            Rect::new(def.x, def.y, def.w, def.h),
            def.gid,
        );
        for group in groups {
            if map.find_object(&def.name, group).is_some() {
                return Err(WorldError::DuplicateObject {
                    map: file.name.clone(),
                    object: def.name.clone(),
                    group: group.name().to_string(),
                });
            }
            map.add_object(id, group);
            if group.auto_collision() {
                map.set_collision(id, CollisionType::Rect);
            }
        }
    }

    Ok(map)
}

/// Load a map by name from `maps_dir`, falling back to the embedded maps.
pub fn load_map(name: &str, maps_dir: &Path) -> Result<MapInstance, WorldError> {
    let path = maps_dir.join(format!("{name}.toml"));
    if path.is_file() {
        let text = std::fs::read_to_string(&path).map_err(|e| WorldError::Io { path: path.clone(), source: e })?;
        let map = parse_map(&path.display().to_string(), &text)?;
        info!(map = %map.name, path = %path.display(), "map loaded");
        return Ok(map);
    }

    let text = embedded_map(name).ok_or_else(|| WorldError::MissingMap(name.to_string()))?;
    let map = parse_map(name, text)?;
    info!(map = %map.name, "embedded map loaded");
    Ok(map)
}

/// Load both maps of the crossing, install the mechanics, place the player.
pub fn build_world(config: &ServerConfig) -> Result<World, WorldError> {
    let mut world = World::new();
    let lever = &config.lever;

    for name in [&lever.peer_map, &lever.home_map] {
        let map = load_map(name, &config.maps_dir)?;
        world.add_map(map);
    }

    LeverMechanic::install(&mut world, &lever.home_map, &lever.peer_map, lever.left_gid)?;
    MagicGate::install(&mut world, &lever.home_map, &config.gate.item)?;
    install_holdables(&mut world, &lever.home_map)?;
    install_holdables(&mut world, &lever.peer_map)?;

    let start = &config.player.start_map;
    let spawn = world.map(start)
        .map(|m| m.spawn)
        .ok_or_else(|| WorldError::MissingMap(start.clone()))?;
    world.add_sprite(&config.player.name, start, spawn.0, spawn.1);

    Ok(world)
}

// ══════════════════════════════════════════════════════════════
// Embedded maps
// ══════════════════════════════════════════════════════════════

fn embedded_map(name: &str) -> Option<&'static str> {
    match name {
        "start" => Some(EMBEDDED_START),
        "end" => Some(EMBEDDED_END),
        _ => None,
    }
}
