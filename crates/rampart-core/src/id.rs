//! Strongly-typed identifiers and the [`TilePos`] coordinate type.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a connected client within a match.
///
/// `ClientId(0)` is reserved as the neutral owner sentinel; the allocator
/// never hands it out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u32);

impl ClientId {
    /// Owner sentinel for entities that belong to no client.
    pub const NEUTRAL: ClientId = ClientId(0);
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ClientId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an entity (unit or building) within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a transient formation group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormationId(pub u32);

impl fmt::Display for FormationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FormationId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation advances one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonic allocator for client, entity, and formation ids.
///
/// All ids in a match are drawn from one counter, so an id is never
/// reused within a process lifetime regardless of what it names. Starts
/// at 1; 0 is reserved for [`ClientId::NEUTRAL`].
#[derive(Clone, Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Create an allocator whose first issued id is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue the next raw id.
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Issue a fresh [`ClientId`].
    pub fn next_client(&mut self) -> ClientId {
        ClientId(self.next())
    }

    /// Issue a fresh [`EntityId`].
    pub fn next_entity(&mut self) -> EntityId {
        EntityId(self.next())
    }

    /// Issue a fresh [`FormationId`].
    pub fn next_formation(&mut self) -> FormationId {
        FormationId(self.next())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// An integer tile coordinate on the map grid.
///
/// The authoritative position of every entity is a `TilePos`; fractional
/// movement between tiles is carried separately as a progress value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    /// Column, `0 <= x < map width`.
    pub x: i32,
    /// Row, `0 <= y < map height`.
    pub y: i32,
}

impl TilePos {
    /// Construct a tile position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance to `other`: the graph geodesic on a
    /// 4-connected grid without obstacles.
    pub fn manhattan(self, other: TilePos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The position offset by `(dx, dy)`; may be out of bounds.
    pub fn offset(self, dx: i32, dy: i32) -> TilePos {
        TilePos::new(self.x + dx, self.y + dy)
    }

    /// The four cardinal neighbours (N, S, W, E), unfiltered for bounds.
    pub fn neighbours4(self) -> SmallVec<[TilePos; 4]> {
        let mut out = SmallVec::new();
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            out.push(self.offset(dx, dy));
        }
        out
    }

    /// Whether `other` is one of this tile's four cardinal neighbours.
    pub fn is_neighbour4(self, other: TilePos) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
