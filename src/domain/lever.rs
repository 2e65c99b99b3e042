/// Lever state machine: three positions, three bridge slots.
///
/// The lever position is stored as a tile gid (the lever sprite frame), one of
/// three consecutive gids starting at `left_gid`. Advancing steps one gid to
/// the right and wraps from the right-most gid back to the left-most:
///
///   next = gid + 1;  if next > right_gid { next = left_gid }
///
/// Each position makes exactly one bridge slot visible and walkable. Slots 1
/// and 3 live on the map that owns the lever ("home"); slot 2 spans the seam
/// and lives on the neighbouring map ("peer").

/// Default gid of the left-most lever frame.
pub const DEFAULT_LEFT_GID: u32 = 381;

/// Handle into the `LeverRegistry`. Map objects hold this, never the state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct LeverId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LeverPosition {
    Left,
    Center,
    Right,
}

impl LeverPosition {
    /// The bridge slot this position opens.
    pub fn active_slot(self) -> BridgeSlot {
        match self {
            LeverPosition::Left => BridgeSlot::One,
            LeverPosition::Center => BridgeSlot::Two,
            LeverPosition::Right => BridgeSlot::Three,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeverPosition::Left => "left",
            LeverPosition::Center => "center",
            LeverPosition::Right => "right",
        }
    }
}

/// Which of the two maps a bridge slot is governed by.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MapSide {
    Home,
    Peer,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BridgeSlot {
    One,
    Two,
    Three,
}

impl BridgeSlot {
    pub const ALL: [BridgeSlot; 3] = [BridgeSlot::One, BridgeSlot::Two, BridgeSlot::Three];

    pub fn index(self) -> usize {
        match self {
            BridgeSlot::One => 0,
            BridgeSlot::Two => 1,
            BridgeSlot::Three => 2,
        }
    }

    /// Visual layer drawing this bridge.
    pub fn layer_name(self) -> &'static str {
        match self {
            BridgeSlot::One => "bridge1",
            BridgeSlot::Two => "bridge2",
            BridgeSlot::Three => "bridge3",
        }
    }

    /// Reference-group template that grants walking across this bridge.
    pub fn in_bounds_name(self) -> &'static str {
        match self {
            BridgeSlot::One => "bridge1InBounds",
            BridgeSlot::Two => "bridge2InBounds",
            BridgeSlot::Three => "bridge3InBounds",
        }
    }

    /// Slot 2 crosses the seam and is drawn and walked on the peer map.
    pub fn side(self) -> MapSide {
        match self {
            BridgeSlot::Two => MapSide::Peer,
            BridgeSlot::One | BridgeSlot::Three => MapSide::Home,
        }
    }
}

/// Shared lever record.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LeverState {
    gid: u32,
    left_gid: u32,
}

impl LeverState {
    /// Returns `None` if `gid` is not one of the three lever frames, or if
    /// the frames plus the wrap step do not fit in a `u32`.
    pub fn new(left_gid: u32, gid: u32) -> Option<Self> {
        left_gid.checked_add(3)?;
        let state = LeverState { gid, left_gid };
        if state.in_range(gid) { Some(state) } else { None }
    }

    pub fn gid(&self) -> u32 {
        self.gid
    }

    pub fn right_gid(&self) -> u32 {
        self.left_gid + 2
    }

    fn in_range(&self, gid: u32) -> bool {
        gid >= self.left_gid && gid <= self.right_gid()
    }

    pub fn position(&self) -> LeverPosition {
        match self.gid - self.left_gid {
            0 => LeverPosition::Left,
            1 => LeverPosition::Center,
            _ => LeverPosition::Right,
        }
    }

    /// Move one step to the right, wrapping back to the left.
    pub fn advance(&mut self) -> LeverPosition {
        let mut next = self.gid + 1;
        if next > self.right_gid() {
            next = self.left_gid;
        }
        debug_assert!(self.in_range(next), "lever gid {next} escaped its range");
        self.gid = next;
        self.position()
    }
}

/// Owns every lever state. Maps refer to entries by `LeverId`.
#[derive(Clone, Debug, Default)]
pub struct LeverRegistry {
    levers: Vec<LeverState>,
}

impl LeverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, state: LeverState) -> LeverId {
        self.levers.push(state);
        LeverId(self.levers.len() - 1)
    }

    pub fn get(&self, id: LeverId) -> Option<&LeverState> {
        self.levers.get(id.0)
    }

    pub fn get_mut(&mut self, id: LeverId) -> Option<&mut LeverState> {
        self.levers.get_mut(id.0)
    }
}

/// Everything a lever move changes, as a plan.
///
/// `retire` is the slot whose inBounds object leaves its inbound set (absence
/// tolerated), `grant` the slot whose template joins it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transition {
    pub show: BridgeSlot,
    pub hide: [BridgeSlot; 2],
    pub retire: BridgeSlot,
    pub grant: BridgeSlot,
}

impl Transition {
    pub fn to(position: LeverPosition) -> Self {
        let show = position.active_slot();
        let (hide, retire) = match position {
            LeverPosition::Left => ([BridgeSlot::Two, BridgeSlot::Three], BridgeSlot::Three),
            LeverPosition::Center => ([BridgeSlot::One, BridgeSlot::Three], BridgeSlot::One),
            LeverPosition::Right => ([BridgeSlot::One, BridgeSlot::Two], BridgeSlot::Two),
        };
        Transition { show, hide, retire, grant: show }
    }

    /// Visibility of every slot after this transition.
    pub fn visibility(&self) -> [(BridgeSlot, bool); 3] {
        [
            (self.show, true),
            (self.hide[0], false),
            (self.hide[1], false),
        ]
    }
}
