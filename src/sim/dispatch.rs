/// Trigger dispatch: routes a sprite standing on a trigger object to the
/// mechanic registered for that object's kind on that map.
///
///   Lever     → LeverMechanic::trigger
///   MagicArea → MagicGate::check, then the same map's lever on Forward
///   Holdable  → holdable::trigger (if holdables are enabled on the map)
///   anything else, or no mechanic registered → ignored

use tracing::info;

use crate::domain::object::{ObjectId, ObjectKind};
use crate::error::WorldError;

use super::event::MapEvent;
use super::gate::{GateOutcome, MagicGate};
use super::holdable;
use super::lever::LeverMechanic;
use super::world::{World, WorldParts};

/// Mechanics attached to one map.
#[derive(Clone, Debug, Default)]
pub struct MapMechanics {
    pub lever: Option<LeverMechanic>,
    pub gate: Option<MagicGate>,
    pub holdables: bool,
}

pub fn install_holdables(world: &mut World, map: &str) -> Result<(), WorldError> {
    let idx = world.require_map(map)?;
    world.mechanics[idx].holdables = true;
    info!(map, "holdables enabled");
    Ok(())
}

/// Dispatch one trigger object on map `map_idx` for sprite `sprite_idx`.
pub fn dispatch(
    parts: &mut WorldParts<'_>,
    map_idx: usize,
    trigger: ObjectId,
    sprite_idx: usize,
    events: &mut Vec<MapEvent>,
) {
    let Some(mechanics) = parts.mechanics.get(map_idx) else { return };
    let Some(kind) = parts.maps.get(map_idx).and_then(|m| m.object(trigger)).map(|o| o.kind.clone()) else {
        return;
    };
    let Some(sprite) = parts.sprites.get_mut(sprite_idx) else { return };

    match kind {
        ObjectKind::Lever => {
            if let Some(lever) = &mechanics.lever {
                lever.trigger(parts.maps, parts.levers, trigger, sprite, events);
            }
        }
        ObjectKind::MagicArea => {
            let Some(gate) = &mechanics.gate else { return };
            if let GateOutcome::Forward(lever_object) = gate.check(sprite, events) {
                if let Some(lever) = &mechanics.lever {
                    lever.trigger(parts.maps, parts.levers, lever_object, sprite, events);
                }
            }
        }
        ObjectKind::Holdable => {
            if mechanics.holdables {
                holdable::trigger(&mut parts.maps[map_idx], trigger, sprite, events);
            }
        }
        ObjectKind::Other(_) => {}
    }
}
