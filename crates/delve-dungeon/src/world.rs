//! The world: a grid of squares plus the arena of dungeons placed on it.

use delve_core::{Coordinate, CoordinateSystem, Direction, DungeonId, SquareId};
use delve_grid::{Grid, SquareBuilder};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::config::WorldConfig;
use crate::dungeon::{CompositeDungeon, Dungeon, DungeonKind, LeafDungeon, LeafShape};
use crate::error::DungeonError;

/// Occupied neighbours of a coordinate, keyed by the direction towards them.
pub type NeighbourSquares = SmallVec<[(Direction, SquareId); 6]>;

/// Owner of every square, border and dungeon.
///
/// Dungeons form a forest. A dungeon without a parent is a root; all
/// adjacency is computed relative to the root, so squares in sibling
/// dungeons that touch in world space share a border.
///
/// # Examples
///
/// ```
/// use delve_core::{Coordinate, Direction};
/// use delve_dungeon::World;
/// use delve_grid::SquareBuilder;
///
/// let mut world = World::default();
/// let level = world.create_level(2, 2).unwrap();
/// let a = world.insert_square(SquareBuilder::new()).unwrap();
/// let b = world.insert_square(SquareBuilder::new()).unwrap();
/// world.add_square_at(level, Coordinate::new(0, 1, 0), a).unwrap();
/// world.add_square_at(level, Coordinate::new(1, 1, 0), b).unwrap();
/// assert_eq!(world.grid().neighbour(a, Direction::East).unwrap(), Some(b));
/// ```
#[derive(Debug)]
pub struct World {
    pub(crate) grid: Grid,
    pub(crate) dungeons: Vec<Dungeon>,
    pub(crate) homes: IndexMap<SquareId, DungeonId>,
    config: WorldConfig,
}

impl World {
    /// Create an empty world.
    pub fn new(config: WorldConfig) -> Result<Self, DungeonError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.environment)?,
            dungeons: Vec::new(),
            homes: IndexMap::new(),
            config,
        })
    }

    /// The active settings.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replace the settings.
    ///
    /// Existing dungeons are not re-checked against a stricter slippery
    /// share; [`audit`](Self::audit) reports any that no longer comply.
    pub fn set_config(&mut self, config: WorldConfig) -> Result<(), DungeonError> {
        config.validate()?;
        self.grid.set_environment(config.environment)?;
        self.config = config;
        Ok(())
    }

    /// Restore the default settings.
    pub fn reset_config(&mut self) {
        self.config = WorldConfig::default();
        self.grid.reset_environment();
    }

    /// The square/border arena.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the square/border arena, for environment and
    /// border-kind changes.
    ///
    /// Changes made here are not checked against dungeon placement rules;
    /// [`audit`](Self::audit) reports any that break them.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Create a square that is not yet placed in any dungeon.
    pub fn insert_square(&mut self, builder: SquareBuilder) -> Result<SquareId, DungeonError> {
        Ok(self.grid.insert_square(builder)?)
    }

    // ── Dungeon arena ───────────────────────────────────────────

    /// The dungeon in slot `id`, live or terminated.
    pub fn dungeon(&self, id: DungeonId) -> Result<&Dungeon, DungeonError> {
        self.dungeons
            .get(id.index())
            .ok_or(DungeonError::UnknownDungeon { dungeon: id })
    }

    /// Ids of all live dungeons, in creation order.
    pub fn dungeon_ids(&self) -> impl Iterator<Item = DungeonId> + '_ {
        self.dungeons
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.terminated)
            .map(|(i, _)| DungeonId(i as u32))
    }

    pub(crate) fn live(&self, id: DungeonId) -> Result<&Dungeon, DungeonError> {
        let node = self.dungeon(id)?;
        if node.terminated {
            return Err(DungeonError::DungeonTerminated { dungeon: id });
        }
        Ok(node)
    }

    pub(crate) fn leaf(&self, id: DungeonId) -> Result<&LeafDungeon, DungeonError> {
        self.live(id)?
            .as_leaf()
            .ok_or(DungeonError::NotALeaf { dungeon: id })
    }

    pub(crate) fn leaf_mut(&mut self, id: DungeonId) -> Result<&mut LeafDungeon, DungeonError> {
        self.live(id)?;
        match &mut self.dungeons[id.index()].kind {
            DungeonKind::Leaf(leaf) => Ok(leaf),
            DungeonKind::Composite(_) => Err(DungeonError::NotALeaf { dungeon: id }),
        }
    }

    pub(crate) fn composite(&self, id: DungeonId) -> Result<&CompositeDungeon, DungeonError> {
        self.live(id)?
            .as_composite()
            .ok_or(DungeonError::NotAComposite { dungeon: id })
    }

    fn push_dungeon(&mut self, dungeon: Dungeon) -> Result<DungeonId, DungeonError> {
        let id = DungeonId(
            u32::try_from(self.dungeons.len()).map_err(|_| DungeonError::CapacityExceeded)?,
        );
        self.dungeons.push(dungeon);
        Ok(id)
    }

    // ── Creation ────────────────────────────────────────────────

    /// A `width` × `depth` level spanning `(0, 0, 0)` to
    /// `(width - 1, depth - 1, 0)`.
    pub fn create_level(&mut self, width: u32, depth: u32) -> Result<DungeonId, DungeonError> {
        let upper = Coordinate::new(last_index(width)?, last_index(depth)?, 0);
        self.create_level_in(CoordinateSystem::new(Coordinate::ORIGIN, upper)?)
    }

    /// A level occupying `system`, which must be one square thick along z.
    pub fn create_level_in(&mut self, system: CoordinateSystem) -> Result<DungeonId, DungeonError> {
        self.create_leaf(system, LeafShape::Level)
    }

    /// A shaft of `length` squares starting at `origin` and running in
    /// `direction`.
    pub fn create_shaft(
        &mut self,
        origin: Coordinate,
        length: u32,
        direction: Direction,
    ) -> Result<DungeonId, DungeonError> {
        let steps = last_index(length)?;
        let unit = direction.offset();
        let delta = Coordinate::new(unit.x * steps, unit.y * steps, unit.z * steps);
        let end = origin.try_add(delta)?;
        let axis = positive_axis(direction);
        self.create_leaf(CoordinateSystem::spanning(origin, end), LeafShape::Shaft { axis })
    }

    /// A shaft occupying `system`, which must extend along at most one
    /// axis. A single-square shaft runs up.
    pub fn create_shaft_in(&mut self, system: CoordinateSystem) -> Result<DungeonId, DungeonError> {
        let axis = match system.extent() {
            (1, 1, 1) => Direction::Up,
            _ => system
                .line_axis()
                .ok_or(DungeonError::InvalidLeafShape { system })?,
        };
        self.create_leaf(system, LeafShape::Shaft { axis })
    }

    fn create_leaf(
        &mut self,
        system: CoordinateSystem,
        shape: LeafShape,
    ) -> Result<DungeonId, DungeonError> {
        if !shape.fits(&system) {
            return Err(DungeonError::InvalidLeafShape { system });
        }
        let id = self.push_dungeon(Dungeon::new(
            system,
            DungeonKind::Leaf(LeafDungeon::new(shape)),
        ))?;
        debug!(dungeon = %id, %system, ?shape, "leaf dungeon created");
        Ok(id)
    }

    /// An empty composite occupying `system`.
    pub fn create_composite(&mut self, system: CoordinateSystem) -> Result<DungeonId, DungeonError> {
        let id = self.push_dungeon(Dungeon::new(
            system,
            DungeonKind::Composite(CompositeDungeon::default()),
        ))?;
        debug!(dungeon = %id, %system, "composite dungeon created");
        Ok(id)
    }

    // ── Tree queries ────────────────────────────────────────────

    /// The composite `dungeon` belongs to, if any.
    pub fn parent(&self, dungeon: DungeonId) -> Result<Option<DungeonId>, DungeonError> {
        Ok(self.live(dungeon)?.parent)
    }

    /// The top-most ancestor of `dungeon`, which may be `dungeon` itself.
    pub fn root_of(&self, dungeon: DungeonId) -> Result<DungeonId, DungeonError> {
        let mut current = dungeon;
        while let Some(parent) = self.live(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// `dungeon` and everything below it, parents before children.
    pub(crate) fn subtree(&self, dungeon: DungeonId) -> Vec<DungeonId> {
        let mut out = Vec::new();
        let mut stack = vec![dungeon];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(DungeonKind::Composite(c)) = self.dungeons.get(id.index()).map(|d| &d.kind)
            {
                stack.extend(c.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every leaf at or below `dungeon`.
    pub fn containing_leaf_dungeons(&self, dungeon: DungeonId) -> Result<Vec<DungeonId>, DungeonError> {
        self.live(dungeon)?;
        Ok(self
            .subtree(dungeon)
            .into_iter()
            .filter(|d| self.dungeons[d.index()].as_leaf().is_some())
            .collect())
    }

    /// Whether the two dungeons' bounds share a point.
    pub fn overlaps(&self, a: DungeonId, b: DungeonId) -> Result<bool, DungeonError> {
        Ok(self.live(a)?.system.overlaps(&self.live(b)?.system))
    }

    /// Whether `coord` belongs to `dungeon`.
    ///
    /// A leaf contains every point of its bounds; a composite contains
    /// only the points covered by one of its children.
    pub fn contains_coordinate(
        &self,
        dungeon: DungeonId,
        coord: Coordinate,
    ) -> Result<bool, DungeonError> {
        self.live(dungeon)?;
        Ok(self.owning_leaf(dungeon, coord).is_some())
    }

    /// The leaf at or below `dungeon` whose bounds contain `coord`.
    pub(crate) fn owning_leaf(&self, dungeon: DungeonId, coord: Coordinate) -> Option<DungeonId> {
        let mut current = dungeon;
        loop {
            let node = self.dungeons.get(current.index())?;
            if node.terminated || !node.system.contains(coord) {
                return None;
            }
            match &node.kind {
                DungeonKind::Leaf(_) => return Some(current),
                DungeonKind::Composite(c) => {
                    current = c
                        .children
                        .iter()
                        .copied()
                        .find(|ch| self.dungeons[ch.index()].system.contains(coord))?;
                }
            }
        }
    }

    // ── Square queries ──────────────────────────────────────────

    pub(crate) fn find_square(&self, dungeon: DungeonId, coord: Coordinate) -> Option<SquareId> {
        let leaf = self.owning_leaf(dungeon, coord)?;
        self.dungeons[leaf.index()].as_leaf()?.get(coord)
    }

    /// The square at `coord`, searching every leaf below `dungeon`.
    pub fn square_at(&self, dungeon: DungeonId, coord: Coordinate) -> Result<SquareId, DungeonError> {
        self.live(dungeon)?;
        self.find_square(dungeon, coord)
            .ok_or(DungeonError::CoordinateNotOccupied { dungeon, coord })
    }

    /// Whether a square sits at `coord` below `dungeon`.
    pub fn is_occupied(&self, dungeon: DungeonId, coord: Coordinate) -> Result<bool, DungeonError> {
        self.live(dungeon)?;
        Ok(self.find_square(dungeon, coord).is_some())
    }

    /// The occupied neighbours of `coord` within `dungeon`'s bounds.
    ///
    /// Pass a root dungeon to get world adjacency across sibling
    /// sub-dungeons.
    pub fn directions_and_neighbours_of(
        &self,
        dungeon: DungeonId,
        coord: Coordinate,
    ) -> Result<NeighbourSquares, DungeonError> {
        let system = self.live(dungeon)?.system;
        Ok(system
            .neighbours_of(coord)
            .into_iter()
            .filter_map(|(d, n)| self.find_square(dungeon, n).map(|s| (d, s)))
            .collect())
    }

    /// Number of squares at or below `dungeon`.
    pub fn square_count(&self, dungeon: DungeonId) -> Result<usize, DungeonError> {
        self.live(dungeon)?;
        Ok(self
            .subtree(dungeon)
            .into_iter()
            .filter_map(|d| self.dungeons[d.index()].as_leaf())
            .map(LeafDungeon::len)
            .sum())
    }

    /// The leaf holding `square`, if it has been placed.
    pub fn leaf_of(&self, square: SquareId) -> Option<DungeonId> {
        self.homes.get(&square).copied()
    }

    /// Whether `square` lies at or below `dungeon`.
    pub fn has_square(&self, dungeon: DungeonId, square: SquareId) -> Result<bool, DungeonError> {
        self.live(dungeon)?;
        let mut current = self.leaf_of(square);
        while let Some(d) = current {
            if d == dungeon {
                return Ok(true);
            }
            current = self.dungeons[d.index()].parent;
        }
        Ok(false)
    }

    /// Every position and square at or below `dungeon`.
    pub fn square_mapping(
        &self,
        dungeon: DungeonId,
    ) -> Result<IndexMap<Coordinate, SquareId>, DungeonError> {
        Ok(self
            .containing_leaf_dungeons(dungeon)?
            .into_iter()
            .filter_map(|d| self.dungeons[d.index()].as_leaf())
            .flat_map(LeafDungeon::positions_and_squares)
            .collect())
    }

    // ── Termination ─────────────────────────────────────────────

    /// Terminate `dungeon` and everything below it.
    ///
    /// Every contained square is terminated, the subtree's parent and child
    /// links are cleared, and `dungeon` is removed from its parent.
    /// Terminating a terminated dungeon does nothing.
    pub fn terminate(&mut self, dungeon: DungeonId) -> Result<(), DungeonError> {
        let node = self.dungeon(dungeon)?;
        if node.terminated {
            return Ok(());
        }
        let parent = node.parent;
        let subtree = self.subtree(dungeon);
        let squares: Vec<SquareId> = subtree
            .iter()
            .filter_map(|d| self.dungeons[d.index()].as_leaf())
            .flat_map(|l| l.squares.values().copied())
            .collect();
        self.grid
            .transaction(|g| squares.iter().try_for_each(|&s| g.terminate_square(s)))?;

        for &d in &subtree {
            let node = &mut self.dungeons[d.index()];
            match &mut node.kind {
                DungeonKind::Leaf(leaf) => {
                    for square in leaf.squares.values() {
                        self.homes.swap_remove(square);
                    }
                    leaf.squares.clear();
                }
                DungeonKind::Composite(c) => c.children.clear(),
            }
            node.parent = None;
            node.terminated = true;
        }
        if let Some(parent) = parent {
            if let DungeonKind::Composite(c) = &mut self.dungeons[parent.index()].kind {
                c.children.shift_remove(&dungeon);
            }
        }
        debug!(%dungeon, dungeons = subtree.len(), squares = squares.len(), "dungeon terminated");
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            dungeons: Vec::new(),
            homes: IndexMap::new(),
            config: WorldConfig::default(),
        }
    }
}

/// `extent - 1` as a coordinate component.
fn last_index(extent: u32) -> Result<i32, DungeonError> {
    match i32::try_from(extent) {
        Ok(e) if e > 0 => Ok(e - 1),
        _ => Err(DungeonError::InvalidExtent { extent }),
    }
}

fn positive_axis(direction: Direction) -> Direction {
    match direction {
        Direction::East | Direction::West => Direction::East,
        Direction::North | Direction::South => Direction::North,
        Direction::Up | Direction::Down => Direction::Up,
    }
}
