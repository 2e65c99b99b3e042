/// World: the map registry and everything that outlives a single tick.
///
/// ## Ownership
///
///   - `maps`     : every loaded `MapInstance`, looked up by name.
///   - `levers`   : the only owner of lever state. Map objects carry a
///                   `LeverId`, so two maps showing the same lever share it.
///   - `sprites`  : actors; each names the map it currently stands on.
///   - `mechanics`: per-map trigger handlers, indexed like `maps`.
///
/// Mechanics need mutable access to two maps, the lever registry and a
/// sprite at once. `parts_mut()` hands out those disjoint borrows together.

use crate::domain::lever::{LeverId, LeverPosition, LeverRegistry};
use crate::domain::sprite::{Sprite, SpriteId};
use crate::error::WorldError;

use super::dispatch::MapMechanics;
use super::map::MapInstance;

pub struct World {
    maps: Vec<MapInstance>,
    pub levers: LeverRegistry,
    pub sprites: Vec<Sprite>,
    pub mechanics: Vec<MapMechanics>,
    pub tick: u64,
}

/// Disjoint mutable views of a world, for mechanics.
pub struct WorldParts<'a> {
    pub maps: &'a mut [MapInstance],
    pub levers: &'a mut LeverRegistry,
    pub sprites: &'a mut [Sprite],
    pub mechanics: &'a [MapMechanics],
}

// ── Construction ──

impl World {
    pub fn new() -> Self {
        World {
            maps: vec![],
            levers: LeverRegistry::new(),
            sprites: vec![],
            mechanics: vec![],
            tick: 0,
        }
    }

    /// Register a map. A map with the same name is replaced, mechanics reset.
    pub fn add_map(&mut self, map: MapInstance) -> usize {
        if let Some(idx) = self.map_index(&map.name) {
            self.maps[idx] = map;
            self.mechanics[idx] = MapMechanics::default();
            return idx;
        }
        self.maps.push(map);
        self.mechanics.push(MapMechanics::default());
        self.maps.len() - 1
    }

    pub fn add_sprite(&mut self, name: &str, map: &str, x: usize, y: usize) -> SpriteId {
        let id = SpriteId(self.sprites.len());
        self.sprites.push(Sprite::new(id, name, map, x, y));
        id
    }
}

// ── Registry lookups ──

impl World {
    pub fn map_index(&self, name: &str) -> Option<usize> {
        self.maps.iter().position(|m| m.name == name)
    }

    /// Like `map_index`, for load-time wiring where a missing map is an error.
    pub fn require_map(&self, name: &str) -> Result<usize, WorldError> {
        self.map_index(name).ok_or_else(|| WorldError::MissingMap(name.to_string()))
    }

    pub fn map(&self, name: &str) -> Option<&MapInstance> {
        self.maps.iter().find(|m| m.name == name)
    }

    #[cfg(test)]
    pub fn map_mut(&mut self, name: &str) -> Option<&mut MapInstance> {
        self.maps.iter_mut().find(|m| m.name == name)
    }

    pub fn map_at(&self, idx: usize) -> &MapInstance {
        &self.maps[idx]
    }

    pub fn maps(&self) -> &[MapInstance] {
        &self.maps
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.0)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id.0)
    }

    pub fn lever_position(&self, id: LeverId) -> Option<LeverPosition> {
        self.levers.get(id).map(|l| l.position())
    }

    pub fn parts_mut(&mut self) -> WorldParts<'_> {
        WorldParts {
            maps: &mut self.maps,
            levers: &mut self.levers,
            sprites: &mut self.sprites,
            mechanics: &self.mechanics,
        }
    }
}

/// Two distinct maps, both mutable. `None` if `a == b` or either is missing.
pub fn pair_mut(maps: &mut [MapInstance], a: usize, b: usize) -> Option<(&mut MapInstance, &mut MapInstance)> {
    if a == b || a >= maps.len() || b >= maps.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = maps.split_at_mut(b);
        Some((&mut lo[a], &mut hi[0]))
    } else {
        let (lo, hi) = maps.split_at_mut(a);
        Some((&mut hi[0], &mut lo[b]))
    }
}
