/// Holdable items: picked up from a map's triggers, carried by a sprite,
/// dropped back onto whatever map the sprite stands on.

use tracing::info;

use crate::domain::geometry::{CollisionType, Rect};
use crate::domain::group::ObjectGroup;
use crate::domain::object::{ObjectId, ObjectKind};
use crate::domain::sprite::{Holdable, Sprite};

use super::event::MapEvent;
use super::map::MapInstance;

/// Sprite is standing on a holdable. Empty hands only.
pub fn trigger(map: &mut MapInstance, item: ObjectId, sprite: &mut Sprite, events: &mut Vec<MapEvent>) {
    if sprite.holding.is_some() {
        return;
    }
    let Some(name) = map.object(item).map(|o| o.name.clone()) else { return };

    let text = format!("Available Action: Pick Up {name}");
    sprite.set_action_text(text.clone());
    events.push(MapEvent::ActionText { sprite: sprite.id, text });

    if !sprite.take_action() {
        return;
    }

    map.remove_object(item, ObjectGroup::Triggers);
    map.remove_object(item, ObjectGroup::Props);
    info!(map = %map.name, sprite = %sprite.name, item = %name, "item picked up");
    sprite.holding = Some(Holdable {
        name: name.clone(),
        origin_map: map.name.clone(),
        origin_object: item,
    });
    events.push(MapEvent::ItemPickedUp { sprite: sprite.id, item: name });
}

/// Put the held item down at the sprite's tile on `map`, which must be the
/// map the sprite stands on. Returns whether anything was dropped.
pub fn drop_item(map: &mut MapInstance, sprite: &mut Sprite, events: &mut Vec<MapEvent>) -> bool {
    let Some(held) = sprite.holding.take() else { return false };
    let rect = Rect::new(sprite.x, sprite.y, 1, 1);

    // Reuse the origin object, else one left detached by an earlier pickup
    // on this map. Spawn only when neither exists.
    let reusable = if held.origin_map == map.name && map.object(held.origin_object).is_some() {
        Some(held.origin_object)
    } else {
        map.find_detached(&held.name, &ObjectKind::Holdable)
    };
    let id = match reusable {
        Some(id) => {
            if let Some(obj) = map.object_mut(id) {
                obj.rect = rect;
            }
            id
        }
        None => map.spawn_object(&held.name, ObjectKind::Holdable, rect, None),
    };
    map.set_collision(id, CollisionType::Rect);
    map.add_object(id, ObjectGroup::Props);
    map.add_object(id, ObjectGroup::Triggers);

    info!(map = %map.name, sprite = %sprite.name, item = %held.name, "item dropped");
    events.push(MapEvent::ItemDropped { sprite: sprite.id, item: held.name, map: map.name.clone() });
    true
}
