use std::fmt;

/// Which roster an actor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Players,
    Enemies,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Players, Side::Enemies];

    /// The opposing roster.
    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Players => Side::Enemies,
            Side::Enemies => Side::Players,
        }
    }

    /// Stable array index (players 0, enemies 1) for per-side caches.
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Side::Players => 0,
            Side::Enemies => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Players => "players",
            Side::Enemies => "enemies",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arena handle addressing an actor by roster and index.
///
/// Roster order is fixed for the whole battle, so a handle stays valid even
/// after the actor is defeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId {
    pub side: Side,
    pub index: u8,
}

impl ActorId {
    pub const fn new(side: Side, index: u8) -> Self {
        Self { side, index }
    }

    pub const fn player(index: u8) -> Self {
        Self::new(Side::Players, index)
    }

    pub const fn enemy(index: u8) -> Self {
        Self::new(Side::Enemies, index)
    }

    #[inline]
    pub fn is_ally_of(self, other: ActorId) -> bool {
        self.side == other.side
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.side {
            Side::Players => 'P',
            Side::Enemies => 'E',
        };
        write!(f, "{}{}", prefix, self.index)
    }
}

macro_rules! definition_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

definition_id!(
    /// Key into the status definition table.
    StatusId(u8)
);
definition_id!(
    /// Key into the spell definition table.
    SpellId(u8)
);
definition_id!(
    /// Key into the enemy-only skill table.
    EnemySkillId(u16)
);
definition_id!(
    /// Identifier of a learned ability (used to tag reactions in the log).
    AbilityId(u16)
);
