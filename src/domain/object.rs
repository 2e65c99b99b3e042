/// Map objects and the handles that address them.

use super::geometry::{CollisionType, Rect};
use super::lever::LeverId;

/// Stable handle of an object within one map. Group membership stores these,
/// so adding an object to a group shares it rather than copying it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// What an object is, resolved once from the map file's `type` field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ObjectKind {
    Lever,
    MagicArea,
    Holdable,
    Other(String),
}

impl ObjectKind {
    pub fn from_type(ty: &str) -> Self {
        match ty {
            "lever" => ObjectKind::Lever,
            "magicArea" => ObjectKind::MagicArea,
            "holdable" => ObjectKind::Holdable,
            other => ObjectKind::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MapObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub gid: Option<u32>,
    pub rect: Rect,
    pub collision: CollisionType,
    /// Shared lever record this object displays; set when a lever is installed.
    pub lever: Option<LeverId>,
}

impl MapObject {
    pub fn new(id: ObjectId, name: &str, kind: ObjectKind, rect: Rect) -> Self {
        MapObject {
            id,
            name: name.to_string(),
            kind,
            gid: None,
            rect,
            collision: CollisionType::None,
            lever: None,
        }
    }

    /// Does this object collide at tile (x, y)?
    pub fn hit(&self, x: usize, y: usize) -> bool {
        self.collision.collides() && self.rect.contains(x, y)
    }
}
