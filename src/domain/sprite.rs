/// Sprites: the player-controlled actors that walk maps and trigger objects.

/// Movement direction for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    /// Target tile one step away, or `None` when stepping off the top/left edge.
    pub fn apply(self, x: usize, y: usize) -> Option<(usize, usize)> {
        match self {
            MoveDir::Left => x.checked_sub(1).map(|nx| (nx, y)),
            MoveDir::Right => Some((x + 1, y)),
            MoveDir::Up => y.checked_sub(1).map(|ny| (x, ny)),
            MoveDir::Down => Some((x, y + 1)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct SpriteId(pub usize);

/// An item a sprite carries.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Holdable {
    pub name: String,
    /// Map object the item was picked up from, so it can be put back.
    pub origin_map: String,
    pub origin_object: super::object::ObjectId,
}

/// A request to interact, valid only for the tick it was made in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActionIntent {
    pub tick: u64,
}

#[derive(Clone, Debug)]
pub struct Sprite {
    pub id: SpriteId,
    pub name: String,
    pub map: String,
    pub x: usize,
    pub y: usize,
    pub holding: Option<Holdable>,
    pub action: Option<ActionIntent>,
    pub action_text: Option<String>,
    pub speech_text: Option<String>,
}

impl Sprite {
    pub fn new(id: SpriteId, name: &str, map: &str, x: usize, y: usize) -> Self {
        Sprite {
            id,
            name: name.to_string(),
            map: map.to_string(),
            x, y,
            holding: None,
            action: None,
            action_text: None,
            speech_text: None,
        }
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Consume the action intent. Returns whether there was one.
    pub fn take_action(&mut self) -> bool {
        self.action.take().is_some()
    }

    pub fn is_holding(&self, item: &str) -> bool {
        self.holding.as_ref().map_or(false, |h| h.name == item)
    }

    pub fn set_action_text(&mut self, text: String) {
        self.action_text = Some(text);
    }

    pub fn set_speech_text(&mut self, text: String) {
        self.speech_text = Some(text);
    }

    /// Per-tick texts are cleared at the start of every step.
    pub fn clear_texts(&mut self) {
        self.action_text = None;
        self.speech_text = None;
    }
}
