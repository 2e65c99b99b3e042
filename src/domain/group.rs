/// Object groups of a map.
/// Group semantics are centralized here, like tile properties.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum ObjectGroup {
    Props,       // Drawn objects with no gameplay role
    Reference,   // Templates, never traversable, never mutated
    Triggers,    // Objects that respond to a sprite standing on them
    InBounds,    // Areas a sprite may walk on
    OutOfBounds, // Areas a sprite may never walk on, even inside inBounds
}

impl ObjectGroup {
    pub const ALL: [ObjectGroup; 5] = [
        ObjectGroup::Props,
        ObjectGroup::Reference,
        ObjectGroup::Triggers,
        ObjectGroup::InBounds,
        ObjectGroup::OutOfBounds,
    ];

    /// Parse the group name used in map files.
    pub fn from_name(name: &str) -> Option<Self> {
        ObjectGroup::ALL.into_iter().find(|g| g.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectGroup::Props => "props",
            ObjectGroup::Reference => "reference",
            ObjectGroup::Triggers => "triggers",
            ObjectGroup::InBounds => "inBounds",
            ObjectGroup::OutOfBounds => "outOfBounds",
        }
    }

    /// Do objects listed here get rect collision when the map loads?
    pub fn auto_collision(self) -> bool {
        matches!(self, ObjectGroup::Triggers | ObjectGroup::InBounds | ObjectGroup::OutOfBounds)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ObjectGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for g in ObjectGroup::ALL {
            assert_eq!(ObjectGroup::from_name(g.name()), Some(g));
        }
        assert_eq!(ObjectGroup::from_name("inbounds"), None);
    }

    #[test]
    fn reference_has_no_auto_collision() {
        assert!(!ObjectGroup::Reference.auto_collision());
        assert!(!ObjectGroup::Props.auto_collision());
        assert!(ObjectGroup::InBounds.auto_collision());
    }
}
