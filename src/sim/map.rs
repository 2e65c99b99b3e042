/// MapInstance: one loaded map, its layers and its object store.
///
/// ## Object store
///
/// Objects live in a single arena (`objects`), addressed by `ObjectId`.
/// Groups hold ordered lists of ids, so one object can sit in several groups
/// at once and a mutation through any group is seen through all of them.
///
///   - `add_object`   : join a group; already a member → no-op, `false`
///   - `remove_object`: leave a group; not a member → no-op, `false`
///
/// Objects are never destroyed. Reference templates stay in `reference`
/// while they are also members of `inBounds`.
///
/// ## Walkability
///
/// A tile is walkable when some collidable `inBounds` object covers it and
/// no collidable `outOfBounds` object does.

use tracing::debug;

use crate::domain::geometry::{CollisionType, Rect};
use crate::domain::group::ObjectGroup;
use crate::domain::object::{MapObject, ObjectId, ObjectKind};

#[derive(Clone, Debug)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
}

#[derive(Clone, Debug)]
pub struct MapInstance {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub spawn: (usize, usize),
    layers: Vec<Layer>,
    objects: Vec<MapObject>,
    groups: [Vec<ObjectId>; 5],
}

// ── Construction ──

impl MapInstance {
    pub fn new(name: &str, width: usize, height: usize, spawn: (usize, usize)) -> Self {
        MapInstance {
            name: name.to_string(),
            width,
            height,
            spawn,
            layers: vec![],
            objects: vec![],
            groups: Default::default(),
        }
    }

    pub fn add_layer(&mut self, name: &str, visible: bool) {
        self.layers.push(Layer { name: name.to_string(), visible });
    }

    /// Create an object in the arena. It belongs to no group until added.
    pub fn spawn_object(&mut self, name: &str, kind: ObjectKind, rect: Rect, gid: Option<u32>) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        let mut obj = MapObject::new(id, name, kind, rect);
        obj.gid = gid;
        self.objects.push(obj);
        id
    }
}

// ── Object store ──

impl MapInstance {
    pub fn object(&self, id: ObjectId) -> Option<&MapObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut MapObject> {
        self.objects.get_mut(id.0 as usize)
    }

    pub fn members(&self, group: ObjectGroup) -> &[ObjectId] {
        &self.groups[group.index()]
    }

    pub fn contains(&self, group: ObjectGroup, id: ObjectId) -> bool {
        self.groups[group.index()].contains(&id)
    }

    /// First object named `name` in `group`.
    pub fn find_object(&self, name: &str, group: ObjectGroup) -> Option<ObjectId> {
        self.groups[group.index()]
            .iter()
            .copied()
            .find(|id| self.object(*id).map_or(false, |o| o.name == name))
    }

    /// First object of `kind` anywhere on the map, grouped or not.
    pub fn find_kind(&self, kind: &ObjectKind) -> Option<ObjectId> {
        self.objects.iter().find(|o| &o.kind == kind).map(|o| o.id)
    }

    /// An object of `kind` named `name` that currently sits in no group.
    pub fn find_detached(&self, name: &str, kind: &ObjectKind) -> Option<ObjectId> {
        self.objects.iter()
            .filter(|o| o.name == name && &o.kind == kind)
            .map(|o| o.id)
            .find(|id| self.groups.iter().all(|g| !g.contains(id)))
    }

    pub fn add_object(&mut self, id: ObjectId, group: ObjectGroup) -> bool {
        if self.object(id).is_none() || self.contains(group, id) {
            return false;
        }
        self.groups[group.index()].push(id);
        debug!(map = %self.name, object = id.0, %group, "object added");
        true
    }

    pub fn remove_object(&mut self, id: ObjectId, group: ObjectGroup) -> bool {
        let list = &mut self.groups[group.index()];
        match list.iter().position(|m| *m == id) {
            Some(i) => {
                list.remove(i);
                debug!(map = %self.name, object = id.0, %group, "object removed");
                true
            }
            None => false,
        }
    }

    pub fn set_collision(&mut self, id: ObjectId, collision: CollisionType) {
        if let Some(obj) = self.object_mut(id) {
            obj.collision = collision;
        }
    }
}

// ── Layers ──

impl MapInstance {
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    pub fn layer_visible(&self, name: &str) -> Option<bool> {
        self.layers.iter().find(|l| l.name == name).map(|l| l.visible)
    }

    /// Returns whether the layer exists.
    pub fn set_layer_visibility(&mut self, name: &str, visible: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }
}

// ── Spatial queries ──

impl MapInstance {
    pub fn in_map(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        if !self.in_map(x, y) {
            return false;
        }
        let inside = |group: ObjectGroup| {
            self.members(group)
                .iter()
                .filter_map(|id| self.object(*id))
                .any(|o| o.hit(x, y))
        };
        inside(ObjectGroup::InBounds) && !inside(ObjectGroup::OutOfBounds)
    }

    /// Trigger objects colliding at (x, y), in group order.
    pub fn triggers_at(&self, x: usize, y: usize) -> Vec<ObjectId> {
        self.members(ObjectGroup::Triggers)
            .iter()
            .copied()
            .filter(|id| self.object(*id).map_or(false, |o| o.hit(x, y)))
            .collect()
    }
}
