/// Lever mechanic: one lever on the "home" map drives three bridges spread
/// over the home map and its "peer".
///
/// ## Wiring (resolved once, at install)
///
///   home map                         peer map
///   ─────────                        ─────────
///   lever      (props → triggers)    lever mirror (optional, same LeverId)
///   bridge1 layer + bridge1InBounds  bridge2 layer + bridge2InBounds
///   bridge3 layer + bridge3InBounds
///
/// The templates stay in each map's `reference` group. A heave adds the
/// active template to the governing map's `inBounds` group (by handle) and
/// removes the previously active one. Removal tolerates absence: on the very
/// first RIGHT, bridge 2 was never granted on the peer.
///
/// A trigger call is one synchronous transition. Callers must not run two
/// triggers against the same lever at once; the tick loop guarantees this.

use tracing::{debug, info};

use crate::domain::geometry::CollisionType;
use crate::domain::group::ObjectGroup;
use crate::domain::lever::{
    BridgeSlot, LeverId, LeverPosition, LeverRegistry, LeverState, MapSide, Transition,
};
use crate::domain::object::{ObjectId, ObjectKind};
use crate::domain::sprite::Sprite;
use crate::error::WorldError;

use super::event::MapEvent;
use super::map::MapInstance;
use super::world::{pair_mut, World};

pub const LEVER_NAME: &str = "lever";

#[derive(Clone, Debug)]
pub struct LeverMechanic {
    pub lever: LeverId,
    /// The lever object in the home map's triggers group.
    pub object: ObjectId,
    home: usize,
    peer: usize,
    /// inBounds templates per slot, each in its governing map's reference group.
    templates: [ObjectId; 3],
}

/// Install the lever on `map`: move the lever object into `triggers` (same
/// handle, not a copy), give it rect collision, and give the three bridge
/// templates rect collision ahead of their first trip into `inBounds`.
///
/// Calling this twice on one map registers a second lever; don't.
pub fn initialize(
    map: &mut MapInstance,
    levers: &mut LeverRegistry,
    left_gid: u32,
) -> Result<(ObjectId, LeverId), WorldError> {
    let object = map.find_kind(&ObjectKind::Lever).ok_or_else(|| WorldError::MissingObject {
        map: map.name.clone(),
        object: LEVER_NAME.to_string(),
        group: "any".to_string(),
    })?;

    let mut templates = [object; 3];
    for slot in BridgeSlot::ALL {
        templates[slot.index()] = require_template(map, slot)?;
    }

    let gid = map.object(object).and_then(|o| o.gid).unwrap_or(left_gid);
    let state = LeverState::new(left_gid, gid).ok_or_else(|| WorldError::LeverGidOutOfRange {
        map: map.name.clone(),
        gid,
        min: left_gid,
        max: left_gid.saturating_add(2),
    })?;
    let lever = levers.register(state);

    if let Some(obj) = map.object_mut(object) {
        obj.lever = Some(lever);
    }
    map.add_object(object, ObjectGroup::Triggers);
    map.set_collision(object, CollisionType::Rect);

    for template in templates {
        map.set_collision(template, CollisionType::Rect);
    }

    Ok((object, lever))
}

fn require_template(map: &MapInstance, slot: BridgeSlot) -> Result<ObjectId, WorldError> {
    map.find_object(slot.in_bounds_name(), ObjectGroup::Reference)
        .ok_or_else(|| WorldError::MissingObject {
            map: map.name.clone(),
            object: slot.in_bounds_name().to_string(),
            group: ObjectGroup::Reference.name().to_string(),
        })
}

fn require_layer(map: &MapInstance, slot: BridgeSlot) -> Result<(), WorldError> {
    if map.has_layer(slot.layer_name()) {
        Ok(())
    } else {
        Err(WorldError::MissingLayer { map: map.name.clone(), layer: slot.layer_name().to_string() })
    }
}

impl LeverMechanic {
    /// Initialize the lever on `home`, resolve every handle a heave needs, and
    /// register the mechanic on the home map.
    pub fn install(world: &mut World, home: &str, peer: &str, left_gid: u32) -> Result<LeverId, WorldError> {
        let home_idx = world.require_map(home)?;
        let peer_idx = world.require_map(peer)?;
        if home_idx == peer_idx {
            return Err(WorldError::SamePeer(home.to_string()));
        }

        let parts = world.parts_mut();
        let (home_map, peer_map) = pair_mut(parts.maps, home_idx, peer_idx)
            .ok_or_else(|| WorldError::SamePeer(home.to_string()))?;

        let mut templates = [ObjectId(0); 3];
        for slot in BridgeSlot::ALL {
            let map: &MapInstance = match slot.side() {
                MapSide::Home => &*home_map,
                MapSide::Peer => &*peer_map,
            };
            require_layer(map, slot)?;
            templates[slot.index()] = require_template(map, slot)?;
        }

        let (object, lever) = initialize(home_map, parts.levers, left_gid)?;
        peer_map.set_collision(templates[BridgeSlot::Two.index()], CollisionType::Rect);

        if let Some(mirror) = peer_map.find_kind(&ObjectKind::Lever) {
            if let Some(obj) = peer_map.object_mut(mirror) {
                obj.lever = Some(lever);
            }
        }

        info!(home, peer, lever = lever.0, "lever installed");
        world.mechanics[home_idx].lever = Some(LeverMechanic {
            lever,
            object,
            home: home_idx,
            peer: peer_idx,
            templates,
        });
        Ok(lever)
    }

    pub fn template(&self, slot: BridgeSlot) -> ObjectId {
        self.templates[slot.index()]
    }

    /// Sprite is on the lever. Always prompt; heave only on action intent.
    pub fn trigger(
        &self,
        maps: &mut [MapInstance],
        levers: &mut LeverRegistry,
        trigger: ObjectId,
        sprite: &mut Sprite,
        events: &mut Vec<MapEvent>,
    ) {
        let Some((home, peer)) = pair_mut(maps, self.home, self.peer) else { return };

        let is_lever = trigger == self.object
            && home.object(trigger).map_or(false, |o| o.name == LEVER_NAME);
        if !is_lever {
            return;
        }

        let text = format!("Available Action: Heave {}", sprite.name);
        sprite.set_action_text(text.clone());
        events.push(MapEvent::ActionText { sprite: sprite.id, text });

        if !sprite.take_action() {
            return;
        }

        let Some(state) = levers.get_mut(self.lever) else { return };
        let from = state.position();
        let to = state.advance();
        info!(map = %home.name, from = from.label(), to = to.label(), sprite = %sprite.name, "lever heaved");
        events.push(MapEvent::LeverMoved { map: home.name.clone(), from, to });

        self.apply(home, peer, to, events);
    }

    fn apply(&self, home: &mut MapInstance, peer: &mut MapInstance, to: LeverPosition, events: &mut Vec<MapEvent>) {
        let plan = Transition::to(to);

        for (slot, visible) in plan.visibility() {
            let map = governing(slot, home, peer);
            if map.layer_visible(slot.layer_name()) != Some(visible) {
                map.set_layer_visibility(slot.layer_name(), visible);
                events.push(MapEvent::LayerVisibility {
                    map: map.name.clone(),
                    layer: slot.layer_name().to_string(),
                    visible,
                });
            }
        }

        let retired = self.template(plan.retire);
        let map = governing(plan.retire, home, peer);
        if map.remove_object(retired, ObjectGroup::InBounds) {
            events.push(MapEvent::InBoundsRemoved { map: map.name.clone(), object: retired });
        } else {
            debug!(map = %map.name, slot = plan.retire.in_bounds_name(), "nothing to retire");
        }

        let granted = self.template(plan.grant);
        let map = governing(plan.grant, home, peer);
        if map.add_object(granted, ObjectGroup::InBounds) {
            events.push(MapEvent::InBoundsAdded { map: map.name.clone(), object: granted });
        }
    }
}

fn governing<'m>(slot: BridgeSlot, home: &'m mut MapInstance, peer: &'m mut MapInstance) -> &'m mut MapInstance {
    match slot.side() {
        MapSide::Home => home,
        MapSide::Peer => peer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sprite::{ActionIntent, SpriteId};
    use crate::sim::testkit::{self, HOME, PEER};

    /// Everything the lever governs, for whole-state comparisons.
    #[derive(Debug, PartialEq)]
    struct Snapshot {
        position: LeverPosition,
        home_layers: Vec<(String, bool)>,
        peer_layers: Vec<(String, bool)>,
        home_in_bounds: Vec<ObjectId>,
        peer_in_bounds: Vec<ObjectId>,
    }

    fn snapshot(world: &World, lever: LeverId) -> Snapshot {
        let layers = |name: &str| -> Vec<(String, bool)> {
            world.map(name).unwrap().layers().iter().map(|l| (l.name.clone(), l.visible)).collect()
        };
        let mut home_in_bounds = world.map(HOME).unwrap().members(ObjectGroup::InBounds).to_vec();
        let mut peer_in_bounds = world.map(PEER).unwrap().members(ObjectGroup::InBounds).to_vec();
        home_in_bounds.sort();
        peer_in_bounds.sort();
        Snapshot {
            position: world.lever_position(lever).unwrap(),
            home_layers: layers(HOME),
            peer_layers: layers(PEER),
            home_in_bounds,
            peer_in_bounds,
        }
    }

    fn mechanic(world: &World) -> LeverMechanic {
        let idx = world.map_index(HOME).unwrap();
        world.mechanics[idx].lever.clone().unwrap()
    }

    /// Heave once, with or without action intent.
    fn heave(world: &mut World, intent: bool) -> Vec<MapEvent> {
        let mech = mechanic(world);
        let tick = world.tick;
        let parts = world.parts_mut();
        let sprite = &mut parts.sprites[0];
        if intent {
            sprite.action = Some(ActionIntent { tick });
        }
        let mut events = vec![];
        mech.trigger(parts.maps, parts.levers, mech.object, sprite, &mut events);
        events
    }

    fn visible(world: &World, map: &str, slot: BridgeSlot) -> bool {
        world.map(map).unwrap().layer_visible(slot.layer_name()).unwrap()
    }

    fn granted(world: &World, mech: &LeverMechanic, slot: BridgeSlot) -> bool {
        let map = if slot.side() == MapSide::Peer { PEER } else { HOME };
        world.map(map).unwrap().contains(ObjectGroup::InBounds, mech.template(slot))
    }

    #[test]
    fn install_moves_lever_into_triggers_with_collision() {
        let world = testkit::crossing();
        let mech = mechanic(&world);
        let home = world.map(HOME).unwrap();
        assert_eq!(home.find_object(LEVER_NAME, ObjectGroup::Triggers), Some(mech.object));
        let obj = home.object(mech.object).unwrap();
        assert_eq!(obj.collision, CollisionType::Rect);
        assert_eq!(obj.lever, Some(mech.lever));
        // still in props too: shared, not copied
        assert!(home.contains(ObjectGroup::Props, mech.object));
    }

    #[test]
    fn install_gives_reference_templates_collision() {
        let world = testkit::crossing();
        let home = world.map(HOME).unwrap();
        for slot in BridgeSlot::ALL {
            let id = home.find_object(slot.in_bounds_name(), ObjectGroup::Reference).unwrap();
            assert_eq!(home.object(id).unwrap().collision, CollisionType::Rect);
        }
        let mech = mechanic(&world);
        let peer = world.map(PEER).unwrap();
        assert_eq!(peer.object(mech.template(BridgeSlot::Two)).unwrap().collision, CollisionType::Rect);
    }

    #[test]
    fn scenario_left_center_right_left() {
        let mut world = testkit::crossing();
        let mech = mechanic(&world);
        assert_eq!(world.lever_position(mech.lever), Some(LeverPosition::Left));

        heave(&mut world, true);
        assert_eq!(world.lever_position(mech.lever), Some(LeverPosition::Center));
        assert!(!visible(&world, HOME, BridgeSlot::One));
        assert!(visible(&world, PEER, BridgeSlot::Two));
        assert!(!visible(&world, HOME, BridgeSlot::Three));
        assert!(!granted(&world, &mech, BridgeSlot::One));
        assert!(granted(&world, &mech, BridgeSlot::Two));

        heave(&mut world, true);
        assert_eq!(world.lever_position(mech.lever), Some(LeverPosition::Right));
        assert!(!visible(&world, PEER, BridgeSlot::Two));
        assert!(visible(&world, HOME, BridgeSlot::Three));
        assert!(!granted(&world, &mech, BridgeSlot::Two));
        assert!(granted(&world, &mech, BridgeSlot::Three));

        heave(&mut world, true);
        assert_eq!(world.lever_position(mech.lever), Some(LeverPosition::Left));
        assert!(visible(&world, HOME, BridgeSlot::One));
        assert!(granted(&world, &mech, BridgeSlot::One));
        assert!(!granted(&world, &mech, BridgeSlot::Three));
    }

    #[test]
    fn three_heaves_are_exactly_periodic() {
        let mut world = testkit::crossing();
        let lever = mechanic(&world).lever;
        heave(&mut world, true);
        let first_center = snapshot(&world, lever);
        for _ in 0..3 {
            heave(&mut world, true);
        }
        assert_eq!(snapshot(&world, lever), first_center);

        heave(&mut world, true);
        let right = snapshot(&world, lever);
        for _ in 0..3 {
            heave(&mut world, true);
        }
        assert_eq!(snapshot(&world, lever), right);
    }

    #[test]
    fn exactly_one_bridge_open_after_every_heave() {
        let mut world = testkit::crossing();
        let mech = mechanic(&world);
        for _ in 0..7 {
            heave(&mut world, true);
            let pos = world.lever_position(mech.lever).unwrap();
            for slot in BridgeSlot::ALL {
                let map = if slot.side() == MapSide::Peer { PEER } else { HOME };
                let active = slot == pos.active_slot();
                assert_eq!(visible(&world, map, slot), active, "{slot:?} at {pos:?}");
                assert_eq!(granted(&world, &mech, slot), active, "{slot:?} at {pos:?}");
            }
        }
    }

    #[test]
    fn no_intent_only_updates_the_prompt() {
        let mut world = testkit::crossing();
        let lever = mechanic(&world).lever;
        heave(&mut world, true);
        let before = snapshot(&world, lever);
        world.sprites[0].action_text = None;

        let events = heave(&mut world, false);
        assert_eq!(snapshot(&world, lever), before);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MapEvent::ActionText { .. }));
        assert_eq!(world.sprites[0].action_text.as_deref(), Some("Available Action: Heave ana"));
    }

    #[test]
    fn first_right_tolerates_missing_bridge_two() {
        let mut world = testkit::crossing();
        let mech = mechanic(&world);
        // Put the lever at CENTER without ever granting bridge 2 on the peer.
        world.levers.get_mut(mech.lever).unwrap().advance();
        assert!(!granted(&world, &mech, BridgeSlot::Two));

        let events = heave(&mut world, true);
        assert_eq!(world.lever_position(mech.lever), Some(LeverPosition::Right));
        assert!(!events.iter().any(|e| matches!(e, MapEvent::InBoundsRemoved { .. })));
        assert!(granted(&world, &mech, BridgeSlot::Three));
    }

    #[test]
    fn heave_consumes_the_intent() {
        let mut world = testkit::crossing();
        heave(&mut world, true);
        assert!(!world.sprites[0].has_action());
    }

    #[test]
    fn non_lever_trigger_is_ignored() {
        let mut world = testkit::crossing();
        let mech = mechanic(&world);
        let lever = mech.lever;
        let before = snapshot(&world, lever);
        let area = world.map(HOME).unwrap().find_kind(&ObjectKind::MagicArea).unwrap();

        let parts = world.parts_mut();
        let sprite = &mut parts.sprites[0];
        sprite.action = Some(ActionIntent { tick: 0 });
        let mut events = vec![];
        mech.trigger(parts.maps, parts.levers, area, sprite, &mut events);

        assert!(events.is_empty());
        assert!(world.sprites[0].has_action()); // not consumed
        assert_eq!(snapshot(&world, lever), before);
    }

    #[test]
    fn peer_lever_mirror_shares_the_state() {
        let mut world = testkit::crossing();
        let mech = mechanic(&world);
        let peer = world.map(PEER).unwrap();
        let mirror = peer.find_kind(&ObjectKind::Lever).unwrap();
        assert_eq!(peer.object(mirror).unwrap().lever, Some(mech.lever));
        // mirror is not a trigger on the peer
        assert!(!peer.contains(ObjectGroup::Triggers, mirror));

        heave(&mut world, true);
        let id = world.map(PEER).unwrap().object(mirror).unwrap().lever.unwrap();
        assert_eq!(world.lever_position(id), Some(LeverPosition::Center));
    }

    #[test]
    fn install_rejects_same_peer() {
        let mut world = testkit::bare_crossing();
        let err = LeverMechanic::install(&mut world, HOME, HOME, 381).unwrap_err();
        assert!(matches!(err, WorldError::SamePeer(_)));
    }

    #[test]
    fn install_rejects_unknown_peer() {
        let mut world = testkit::bare_crossing();
        let err = LeverMechanic::install(&mut world, HOME, "nowhere", 381).unwrap_err();
        assert!(matches!(err, WorldError::MissingMap(_)));
    }

    #[test]
    fn install_rejects_out_of_range_gid() {
        let mut world = testkit::bare_crossing();
        let err = LeverMechanic::install(&mut world, HOME, PEER, 100).unwrap_err();
        assert!(matches!(err, WorldError::LeverGidOutOfRange { gid: 381, .. }));
    }

    #[test]
    fn install_rejects_missing_peer_template() {
        let mut world = testkit::bare_crossing();
        let peer = world.map_mut(PEER).unwrap();
        let id = peer.find_object("bridge2InBounds", ObjectGroup::Reference).unwrap();
        peer.remove_object(id, ObjectGroup::Reference);
        let err = LeverMechanic::install(&mut world, HOME, PEER, 381).unwrap_err();
        assert!(matches!(err, WorldError::MissingObject { ref object, .. } if object == "bridge2InBounds"));
    }

    #[test]
    fn failed_install_leaves_the_home_map_untouched() {
        let mut world = testkit::bare_crossing();
        let home = world.map_mut(HOME).unwrap();
        let tpl = home.find_object("bridge3InBounds", ObjectGroup::Reference).unwrap();
        home.remove_object(tpl, ObjectGroup::Reference);

        let err = LeverMechanic::install(&mut world, HOME, PEER, 381).unwrap_err();
        assert!(matches!(err, WorldError::MissingObject { ref object, .. } if object == "bridge3InBounds"));
        let home = world.map(HOME).unwrap();
        assert!(home.members(ObjectGroup::Triggers).iter()
            .all(|id| home.object(*id).unwrap().kind != ObjectKind::Lever));
        let lever = home.find_kind(&ObjectKind::Lever).unwrap();
        assert!(home.object(lever).unwrap().lever.is_none());
        assert!(world.levers.get(LeverId(0)).is_none());
    }

    #[test]
    fn missing_peer_layer_registers_nothing() {
        let mut world = testkit::bare_crossing();
        let mut bare = MapInstance::new(PEER, 10, 6, (1, 3));
        bare.add_layer("ground", true);
        world.add_map(bare);
        let err = LeverMechanic::install(&mut world, HOME, PEER, 381).unwrap_err();
        assert!(matches!(err, WorldError::MissingLayer { .. }));
        assert!(world.levers.get(LeverId(0)).is_none());
    }

    #[test]
    fn prompt_names_the_sprite() {
        let mut world = testkit::crossing();
        world.sprites[0] = Sprite::new(SpriteId(0), "bo", HOME, 2, 2);
        heave(&mut world, false);
        assert_eq!(world.sprites[0].action_text.as_deref(), Some("Available Action: Heave bo"));
    }
}
