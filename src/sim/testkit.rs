/// Test fixtures: a small two-map crossing built in code.
///
/// ```text
///   end (home, 12x6)                 start (peer, 10x6)
///   x: 0....4 5.7 8..11              x: 0..3 4.6 7..9
///      west   river east                field chasm ledge
///   bridge1InBounds (5,1) 3x1        bridge2InBounds (4,2) 3x1
///   bridge3InBounds (5,4) 3x1        magic wand   (1,1)
///   lever (2,2)  magicArea (0,4) 2x2 lever mirror (8,0)
/// ```
///
/// Bridge layers start hidden and no bridge template is in `inBounds`.

use crate::domain::geometry::{CollisionType, Rect};
use crate::domain::group::ObjectGroup;
use crate::domain::lever::DEFAULT_LEFT_GID;
use crate::domain::object::{ObjectId, ObjectKind};

use super::dispatch::install_holdables;
use super::gate::MagicGate;
use super::lever::LeverMechanic;
use super::map::MapInstance;
use super::world::World;

pub const HOME: &str = "end";
pub const PEER: &str = "start";
pub const WAND: &str = "magic wand";

fn place(map: &mut MapInstance, name: &str, kind: ObjectKind, rect: Rect, groups: &[ObjectGroup]) -> ObjectId {
    let id = map.spawn_object(name, kind, rect, None);
    for &g in groups {
        map.add_object(id, g);
        if g.auto_collision() {
            map.set_collision(id, CollisionType::Rect);
        }
    }
    id
}

fn area() -> ObjectKind {
    ObjectKind::Other("area".into())
}

pub fn home_map() -> MapInstance {
    let mut map = MapInstance::new(HOME, 12, 6, (1, 1));
    map.add_layer("ground", true);
    map.add_layer("bridge1", false);
    map.add_layer("bridge3", false);
    place(&mut map, "westBank", area(), Rect::new(0, 0, 5, 6), &[ObjectGroup::InBounds]);
    place(&mut map, "eastBank", area(), Rect::new(8, 0, 4, 6), &[ObjectGroup::InBounds]);
    place(&mut map, "bridge1InBounds", area(), Rect::new(5, 1, 3, 1), &[ObjectGroup::Reference]);
    place(&mut map, "bridge2InBounds", area(), Rect::new(5, 3, 3, 1), &[ObjectGroup::Reference]);
    place(&mut map, "bridge3InBounds", area(), Rect::new(5, 4, 3, 1), &[ObjectGroup::Reference]);
    place(&mut map, "magicArea", ObjectKind::MagicArea, Rect::new(0, 4, 2, 2), &[ObjectGroup::Triggers]);
    let lever = place(&mut map, "lever", ObjectKind::Lever, Rect::new(2, 2, 1, 1), &[ObjectGroup::Props]);
    if let Some(obj) = map.object_mut(lever) {
        obj.gid = Some(DEFAULT_LEFT_GID);
    }
    map
}

pub fn peer_map() -> MapInstance {
    let mut map = MapInstance::new(PEER, 10, 6, (1, 3));
    map.add_layer("ground", true);
    map.add_layer("bridge2", false);
    place(&mut map, "field", area(), Rect::new(0, 0, 4, 6), &[ObjectGroup::InBounds]);
    place(&mut map, "ledge", area(), Rect::new(7, 0, 3, 6), &[ObjectGroup::InBounds]);
    place(&mut map, "bridge2InBounds", area(), Rect::new(4, 2, 3, 1), &[ObjectGroup::Reference]);
    place(&mut map, WAND, ObjectKind::Holdable, Rect::new(1, 1, 1, 1), &[ObjectGroup::Props, ObjectGroup::Triggers]);
    let mirror = place(&mut map, "lever", ObjectKind::Lever, Rect::new(8, 0, 1, 1), &[ObjectGroup::Props]);
    if let Some(obj) = map.object_mut(mirror) {
        obj.gid = Some(DEFAULT_LEFT_GID);
    }
    map
}

/// Both maps loaded, nothing installed, one sprite "ana" on the lever.
pub fn bare_crossing() -> World {
    let mut world = World::new();
    world.add_map(peer_map());
    world.add_map(home_map());
    world.add_sprite("ana", HOME, 2, 2);
    world
}

/// Both maps with lever, gate and holdables installed.
pub fn crossing() -> World {
    let mut world = bare_crossing();
    LeverMechanic::install(&mut world, HOME, PEER, DEFAULT_LEFT_GID).expect("lever installs");
    MagicGate::install(&mut world, HOME, WAND).expect("gate installs");
    install_holdables(&mut world, HOME).expect("home holdables");
    install_holdables(&mut world, PEER).expect("peer holdables");
    world
}
