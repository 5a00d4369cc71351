//! A* pathfinding on the 4-connected tile grid.
//!
//! Shortest-step search with unit edge cost and the Manhattan heuristic
//! (admissible and consistent for 4-connected movement). Search state
//! lives in a [`PathScratch`] that is reused across calls: flat arrays
//! are invalidated in O(1) by bumping a generation stamp, so steady-state
//! queries allocate nothing beyond the returned path.

use rampart_core::TilePos;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An open-set entry keyed by `f = g + h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    g: u32,
    idx: u32,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest f. Ties break on the
        // cell index to keep pop order fully deterministic.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable search state for [`find_path`].
///
/// The g-cost, parent, and visitation arrays are sized to the map on
/// first use and invalidated per call by a generation counter instead of
/// being cleared. One scratch belongs to one search context (the world
/// owns one); it is not shared across threads.
pub struct PathScratch {
    g: Vec<u32>,
    parent: Vec<u32>,
    stamp: Vec<u32>,
    generation: u32,
    open: BinaryHeap<OpenNode>,
}

impl PathScratch {
    /// Create an empty scratch; arrays grow on first search.
    pub fn new() -> Self {
        Self {
            g: Vec::new(),
            parent: Vec::new(),
            stamp: Vec::new(),
            generation: 0,
            open: BinaryHeap::new(),
        }
    }

    /// Prepare for a search over `cells` grid cells.
    fn begin(&mut self, cells: usize) {
        if self.g.len() < cells {
            self.g.resize(cells, 0);
            self.parent.resize(cells, 0);
            self.stamp.resize(cells, 0);
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamp wraparound: stale stamps could collide, so clear once.
            self.stamp.fill(0);
            self.generation = 1;
        }
        self.open.clear();
    }

    fn visited(&self, idx: usize) -> bool {
        self.stamp[idx] == self.generation
    }

    fn record(&mut self, idx: usize, g: u32, parent: u32) {
        self.stamp[idx] = self.generation;
        self.g[idx] = g;
        self.parent[idx] = parent;
    }
}

impl Default for PathScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute a shortest path from `start` to `goal` on a `width x height`
/// grid, honoring the `passable` predicate.
///
/// On success the result runs from the tile immediately after `start`
/// through `goal` inclusive. The result is empty when `start == goal`
/// (already there) and when no path exists, including when `goal`
/// itself fails the predicate. Callers wanting "move as close as
/// possible" must relocate the goal before searching.
///
/// `passable` is never asked about out-of-bounds tiles, and is not asked
/// about `start` (a unit may stand on a tile that is closed to entry).
pub fn find_path(
    width: i32,
    height: i32,
    passable: impl Fn(TilePos) -> bool,
    start: TilePos,
    goal: TilePos,
    scratch: &mut PathScratch,
) -> Vec<TilePos> {
    let in_bounds =
        |t: TilePos| t.x >= 0 && t.x < width && t.y >= 0 && t.y < height;
    if width <= 0 || height <= 0 || !in_bounds(start) || !in_bounds(goal) {
        return Vec::new();
    }
    if start == goal {
        return Vec::new();
    }
    if !passable(goal) {
        return Vec::new();
    }

    let w = width as usize;
    scratch.begin(w * (height as usize));
    let idx_of = |t: TilePos| (t.y as usize) * w + (t.x as usize);
    let pos_of = |idx: usize| TilePos::new((idx % w) as i32, (idx / w) as i32);
    let h = |t: TilePos| t.manhattan(goal);

    let start_idx = idx_of(start);
    let goal_idx = idx_of(goal);
    scratch.record(start_idx, 0, start_idx as u32);
    scratch.open.push(OpenNode {
        f: h(start),
        g: 0,
        idx: start_idx as u32,
    });

    let mut found = false;
    while let Some(node) = scratch.open.pop() {
        let idx = node.idx as usize;
        if node.g > scratch.g[idx] {
            continue; // superseded by a cheaper entry
        }
        if idx == goal_idx {
            found = true;
            break;
        }
        let pos = pos_of(idx);
        for nb in pos.neighbours4() {
            if !in_bounds(nb) || !passable(nb) {
                continue;
            }
            let nidx = idx_of(nb);
            let g = node.g + 1;
            if scratch.visited(nidx) && scratch.g[nidx] <= g {
                continue;
            }
            scratch.record(nidx, g, idx as u32);
            scratch.open.push(OpenNode {
                f: g + h(nb),
                g,
                idx: nidx as u32,
            });
        }
    }

    if !found {
        return Vec::new();
    }

    let mut path = Vec::with_capacity(scratch.g[goal_idx] as usize);
    let mut idx = goal_idx;
    while idx != start_idx {
        path.push(pos_of(idx));
        idx = scratch.parent[idx] as usize;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn open(_: TilePos) -> bool {
        true
    }

    fn rocks(tiles: &[(i32, i32)]) -> impl Fn(TilePos) -> bool + '_ {
        move |t| !tiles.contains(&(t.x, t.y))
    }

    #[test]
    fn straight_line_has_manhattan_length() {
        let mut scratch = PathScratch::new();
        let path = find_path(
            20,
            10,
            open,
            TilePos::new(2, 5),
            TilePos::new(9, 5),
            &mut scratch,
        );
        assert_eq!(path.len(), 7);
        assert_eq!(*path.last().unwrap(), TilePos::new(9, 5));
    }

    #[test]
    fn path_excludes_start_and_steps_by_one() {
        let mut scratch = PathScratch::new();
        let start = TilePos::new(1, 1);
        let path = find_path(8, 8, open, start, TilePos::new(4, 3), &mut scratch);
        assert!(!path.contains(&start));
        assert!(start.is_neighbour4(path[0]));
        for pair in path.windows(2) {
            assert!(pair[0].is_neighbour4(pair[1]));
        }
    }

    #[test]
    fn detours_around_a_wall() {
        // Vertical wall at x=5 with a gap at y=0.
        let wall: Vec<(i32, i32)> = (1..8).map(|y| (5, y)).collect();
        let mut scratch = PathScratch::new();
        let path = find_path(
            10,
            8,
            rocks(&wall),
            TilePos::new(2, 4),
            TilePos::new(8, 4),
            &mut scratch,
        );
        assert!(!path.is_empty());
        for tile in &path {
            assert!(!wall.contains(&(tile.x, tile.y)));
        }
        assert_eq!(*path.last().unwrap(), TilePos::new(8, 4));
    }

    #[test]
    fn unreachable_goal_returns_empty() {
        // Goal walled in on all four sides.
        let walls = [(4, 3), (4, 5), (3, 4), (5, 4)];
        let mut scratch = PathScratch::new();
        let path = find_path(
            9,
            9,
            rocks(&walls),
            TilePos::new(0, 0),
            TilePos::new(4, 4),
            &mut scratch,
        );
        assert!(path.is_empty());
    }

    #[test]
    fn impassable_goal_returns_empty() {
        let rock = [(6, 6)];
        let mut scratch = PathScratch::new();
        let path = find_path(
            10,
            10,
            rocks(&rock),
            TilePos::new(0, 0),
            TilePos::new(6, 6),
            &mut scratch,
        );
        assert!(path.is_empty());
    }

    #[test]
    fn start_equals_goal_returns_empty() {
        let mut scratch = PathScratch::new();
        let path = find_path(
            10,
            10,
            open,
            TilePos::new(3, 3),
            TilePos::new(3, 3),
            &mut scratch,
        );
        assert!(path.is_empty());
    }

    #[test]
    fn scratch_is_reusable_across_searches() {
        let mut scratch = PathScratch::new();
        let a = find_path(16, 16, open, TilePos::new(0, 0), TilePos::new(15, 15), &mut scratch);
        let b = find_path(16, 16, open, TilePos::new(15, 0), TilePos::new(0, 15), &mut scratch);
        let c = find_path(16, 16, open, TilePos::new(0, 0), TilePos::new(15, 15), &mut scratch);
        assert_eq!(a.len(), 30);
        assert_eq!(b.len(), 30);
        assert_eq!(a, c, "identical queries must produce identical paths");
    }

    #[test]
    fn closed_start_tile_can_still_be_left() {
        // The predicate closes the start tile itself; the unit standing
        // there must still be able to path out.
        let closed_start = [(2, 2)];
        let mut scratch = PathScratch::new();
        let path = find_path(
            8,
            8,
            rocks(&closed_start),
            TilePos::new(2, 2),
            TilePos::new(5, 2),
            &mut scratch,
        );
        assert_eq!(path.len(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_rocks() -> impl Strategy<Value = HashSet<(i32, i32)>> {
            prop::collection::hash_set((0i32..12, 0i32..12), 0..30)
        }

        proptest! {
            /// Every returned path is passable, 4-connected, starts next
            /// to the start tile, and ends at the goal.
            #[test]
            fn returned_paths_are_well_formed(
                rocks in arb_rocks(),
                sx in 0i32..12, sy in 0i32..12,
                gx in 0i32..12, gy in 0i32..12,
            ) {
                let start = TilePos::new(sx, sy);
                let goal = TilePos::new(gx, gy);
                let passable = |t: TilePos| !rocks.contains(&(t.x, t.y));
                let mut scratch = PathScratch::new();
                let path = find_path(12, 12, passable, start, goal, &mut scratch);

                if !path.is_empty() {
                    prop_assert!(start.is_neighbour4(path[0]));
                    prop_assert_eq!(*path.last().unwrap(), goal);
                    for tile in &path {
                        prop_assert!(passable(*tile));
                    }
                    for pair in path.windows(2) {
                        prop_assert!(pair[0].is_neighbour4(pair[1]));
                    }
                }
            }

            /// With no obstacles the path length equals the Manhattan
            /// distance (optimality on open ground).
            #[test]
            fn open_ground_paths_are_optimal(
                sx in 0i32..12, sy in 0i32..12,
                gx in 0i32..12, gy in 0i32..12,
            ) {
                let start = TilePos::new(sx, sy);
                let goal = TilePos::new(gx, gy);
                let mut scratch = PathScratch::new();
                let path = find_path(12, 12, |_| true, start, goal, &mut scratch);
                prop_assert_eq!(path.len() as u32, start.manhattan(goal));
            }
        }
    }
}
