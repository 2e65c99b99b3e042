/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Clear last tick's sprite texts
///   2. Map travel
///   3. Movement (onto walkable tiles only)
///   4. Action intents recorded
///   5. Drops
///   6. Trigger dispatch (every sprite, every trigger it stands on)
///   7. Unconsumed action intents expire
///
/// Each tick is handled to completion before the next begins, so two
/// triggers never run against the same lever at once.

use tracing::{debug, info};

use crate::domain::sprite::{ActionIntent, MoveDir, SpriteId};
use super::dispatch::dispatch;
use super::event::MapEvent;
use super::holdable;
use super::world::World;

/// One sprite's input for one tick.
#[derive(Clone, Debug)]
pub struct SpriteInput {
    pub sprite: SpriteId,
    pub movement: Option<MoveDir>,
    pub action: bool,
    pub drop: bool,
    pub travel_to: Option<String>,
}

impl SpriteInput {
    pub fn idle(sprite: SpriteId) -> Self {
        SpriteInput { sprite, movement: None, action: false, drop: false, travel_to: None }
    }
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut World, inputs: &[SpriteInput]) -> Vec<MapEvent> {
    let mut events: Vec<MapEvent> = Vec::new();
    world.tick += 1;

    for sprite in &mut world.sprites {
        sprite.clear_texts();
    }

    resolve_travel(world, inputs, &mut events);
    resolve_movement(world, inputs);
    resolve_intents(world, inputs);
    resolve_drops(world, inputs, &mut events);
    resolve_triggers(world, &mut events);
    expire_intents(world);

    events
}

// ══════════════════════════════════════════════════════════════
// Input phases
// ══════════════════════════════════════════════════════════════

fn resolve_travel(world: &mut World, inputs: &[SpriteInput], events: &mut Vec<MapEvent>) {
    for input in inputs {
        let Some(dest) = input.travel_to.as_deref() else { continue };
        let Some(spawn) = world.map(dest).map(|m| m.spawn) else {
            debug!(dest, "travel to unknown map ignored");
            continue;
        };
        let Some(sprite) = world.sprite_mut(input.sprite) else { continue };
        if sprite.map == dest {
            continue;
        }
        let from = std::mem::replace(&mut sprite.map, dest.to_string());
        (sprite.x, sprite.y) = spawn;
        info!(sprite = %sprite.name, from = %from, to = dest, "sprite travelled");
        events.push(MapEvent::SpriteTravelled { sprite: sprite.id, from, to: dest.to_string() });
    }
}

fn resolve_movement(world: &mut World, inputs: &[SpriteInput]) {
    for input in inputs {
        let Some(dir) = input.movement else { continue };
        let Some(sprite) = world.sprite(input.sprite) else { continue };
        let Some((nx, ny)) = dir.apply(sprite.x, sprite.y) else { continue };
        let walkable = world.map(&sprite.map).map_or(false, |m| m.is_walkable(nx, ny));
        if !walkable {
            continue;
        }
        if let Some(sprite) = world.sprite_mut(input.sprite) {
            sprite.x = nx;
            sprite.y = ny;
        }
    }
}

fn resolve_intents(world: &mut World, inputs: &[SpriteInput]) {
    let tick = world.tick;
    for input in inputs.iter().filter(|i| i.action) {
        if let Some(sprite) = world.sprite_mut(input.sprite) {
            sprite.action = Some(ActionIntent { tick });
        }
    }
}

fn resolve_drops(world: &mut World, inputs: &[SpriteInput], events: &mut Vec<MapEvent>) {
    for input in inputs.iter().filter(|i| i.drop) {
        let Some(map_idx) = world.sprite(input.sprite).and_then(|s| world.map_index(&s.map)) else {
            continue;
        };
        let parts = world.parts_mut();
        if let Some(sprite) = parts.sprites.get_mut(input.sprite.0) {
            holdable::drop_item(&mut parts.maps[map_idx], sprite, events);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Triggers
// ══════════════════════════════════════════════════════════════

fn resolve_triggers(world: &mut World, events: &mut Vec<MapEvent>) {
    for sprite_idx in 0..world.sprites.len() {
        let sprite = &world.sprites[sprite_idx];
        let Some(map_idx) = world.map_index(&sprite.map) else { continue };
        let hits = world.map_at(map_idx).triggers_at(sprite.x, sprite.y);

        let mut parts = world.parts_mut();
        for trigger in hits {
            dispatch(&mut parts, map_idx, trigger, sprite_idx, events);
        }
    }
}

/// Action intent is per tick: anything not consumed by a trigger is dropped.
fn expire_intents(world: &mut World) {
    for sprite in &mut world.sprites {
        sprite.action = None;
    }
}
