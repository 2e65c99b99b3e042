/// Events emitted during a simulation step.
/// The presentation layer consumes these for its event log.

use crate::domain::lever::LeverPosition;
use crate::domain::object::ObjectId;
use crate::domain::sprite::SpriteId;

#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    LeverMoved { map: String, from: LeverPosition, to: LeverPosition },
    LayerVisibility { map: String, layer: String, visible: bool },
    InBoundsAdded { map: String, object: ObjectId },
    InBoundsRemoved { map: String, object: ObjectId },
    ActionText { sprite: SpriteId, text: String },
    SpeechText { sprite: SpriteId, text: String },
    ItemPickedUp { sprite: SpriteId, item: String },
    ItemDropped { sprite: SpriteId, item: String, map: String },
    SpriteTravelled { sprite: SpriteId, from: String, to: String },
}

impl MapEvent {
    /// One-line summary for the event log.
    pub fn describe(&self) -> String {
        match self {
            MapEvent::LeverMoved { map, from, to } => {
                format!("{map}: lever {} -> {}", from.label(), to.label())
            }
            MapEvent::LayerVisibility { map, layer, visible } => {
                format!("{map}: {layer} {}", if *visible { "shown" } else { "hidden" })
            }
            MapEvent::InBoundsAdded { map, object } => format!("{map}: inBounds +#{}", object.0),
            MapEvent::InBoundsRemoved { map, object } => format!("{map}: inBounds -#{}", object.0),
            MapEvent::ActionText { text, .. } => text.clone(),
            MapEvent::SpeechText { text, .. } => format!("\"{text}\""),
            MapEvent::ItemPickedUp { item, .. } => format!("picked up {item}"),
            MapEvent::ItemDropped { item, map, .. } => format!("dropped {item} on {map}"),
            MapEvent::SpriteTravelled { from, to, .. } => format!("travelled {from} -> {to}"),
        }
    }

    /// Per-tick prompt events repeat every tick and are not worth logging.
    pub fn is_prompt(&self) -> bool {
        matches!(self, MapEvent::ActionText { .. } | MapEvent::SpeechText { .. })
    }
}
