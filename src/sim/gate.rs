/// Magic area: a trigger that heaves the lever from a distance, but only for
/// a sprite holding the right item.

use tracing::{debug, info};

use crate::domain::group::ObjectGroup;
use crate::domain::object::ObjectId;
use crate::domain::sprite::Sprite;
use crate::error::WorldError;

use super::event::MapEvent;
use super::lever::LEVER_NAME;
use super::world::World;

pub const SPEECH_NEED_ITEM: &str =
    "This place seems magical but I feel like I need something to help cast a spell.";

#[derive(Clone, Debug)]
pub struct MagicGate {
    pub item: String,
    /// The map's own lever trigger, resolved at install.
    pub lever_object: ObjectId,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GateOutcome {
    /// Holding the item and asked to act: heave this lever object.
    Forward(ObjectId),
    /// Holding the item, no action this tick.
    Ready,
    /// Not holding the item. Nothing happens.
    Blocked,
}

impl MagicGate {
    /// Register a gate on `map`. The lever must already be installed there.
    pub fn install(world: &mut World, map: &str, item: &str) -> Result<(), WorldError> {
        let idx = world.require_map(map)?;
        let lever_object = world
            .map_at(idx)
            .find_object(LEVER_NAME, ObjectGroup::Triggers)
            .ok_or_else(|| WorldError::MissingObject {
                map: map.to_string(),
                object: LEVER_NAME.to_string(),
                group: ObjectGroup::Triggers.name().to_string(),
            })?;
        info!(map, item, "magic gate installed");
        world.mechanics[idx].gate = Some(MagicGate { item: item.to_string(), lever_object });
        Ok(())
    }

    pub fn check(&self, sprite: &mut Sprite, events: &mut Vec<MapEvent>) -> GateOutcome {
        if !sprite.is_holding(&self.item) {
            debug!(sprite = %sprite.name, item = %self.item, "magic area without item");
            let text = SPEECH_NEED_ITEM.to_string();
            sprite.set_speech_text(text.clone());
            events.push(MapEvent::SpeechText { sprite: sprite.id, text });
            return GateOutcome::Blocked;
        }

        let text = format!("Available Action: Cast spell with {}.", self.item);
        sprite.set_action_text(text.clone());
        events.push(MapEvent::ActionText { sprite: sprite.id, text });

        if sprite.has_action() {
            GateOutcome::Forward(self.lever_object)
        } else {
            GateOutcome::Ready
        }
    }
}
