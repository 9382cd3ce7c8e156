//! Composition of dungeons into composites.

use delve_core::{Coordinate, CoordinateSystem, Direction, DungeonId, SquareId};
use tracing::debug;

use crate::dungeon::DungeonKind;
use crate::error::DungeonError;
use crate::leaf::check_shaft_axes;
use crate::world::World;

impl World {
    /// Whether `system` lies inside `composite` and clear of every child
    /// other than `except`.
    fn can_place(
        &self,
        composite: DungeonId,
        except: Option<DungeonId>,
        system: &CoordinateSystem,
    ) -> Result<bool, DungeonError> {
        let bounds = self.live(composite)?.system;
        if !bounds.contains_system(system) {
            return Ok(false);
        }
        Ok(self
            .composite(composite)?
            .children
            .iter()
            .filter(|&&ch| Some(ch) != except)
            .all(|ch| !self.dungeons[ch.index()].system.overlaps(system)))
    }

    /// Shift `sub` by `offset` and attach it to `composite`.
    ///
    /// Every square in the sub-tree is joined to the squares it touches in
    /// the rest of the world, found from the root of `composite`. If any
    /// join fails, the grid and the sub-dungeon's position are restored
    /// and the error is returned.
    pub fn add_sub_dungeon_at(
        &mut self,
        composite: DungeonId,
        offset: Coordinate,
        sub: DungeonId,
    ) -> Result<(), DungeonError> {
        self.composite(composite)?;
        let node = self.live(sub)?;
        if let Some(parent) = node.parent {
            return Err(DungeonError::DungeonAlreadyAssociated {
                dungeon: sub,
                parent,
            });
        }
        let root = self.root_of(composite)?;
        if root == sub {
            return Err(DungeonError::CyclicComposition { composite, sub });
        }
        let target = node.system.translated(offset)?;
        if !self.can_place(composite, None, &target)? {
            return Err(DungeonError::SubDungeonDoesNotFit { composite, sub });
        }

        let plan = self.plan_translation(sub, offset)?;
        let undo = self.apply_relocations(plan);

        let joins = match self.pending_joins(root, sub) {
            Ok(joins) => joins,
            Err(e) => {
                self.apply_relocations(undo);
                return Err(e);
            }
        };
        let guards: Vec<_> = joins
            .iter()
            .flat_map(|&(s, _, n)| [self.shaft_guard(s), self.shaft_guard(n)])
            .flatten()
            .collect();
        let merged = self.grid.transaction(|g| {
            for &(s, d, n) in &joins {
                g.merge_squares(s, n, d)?;
            }
            check_shaft_axes(g, &guards)
        });
        if let Err(e) = merged {
            self.apply_relocations(undo);
            debug!(%composite, %sub, error = %e, "composition rolled back");
            return Err(e);
        }

        if let DungeonKind::Composite(c) = &mut self.dungeons[composite.index()].kind {
            c.children.insert(sub);
        }
        self.dungeons[sub.index()].parent = Some(composite);
        debug!(%composite, %sub, %offset, joins = joins.len(), "sub-dungeon added");
        Ok(())
    }

    /// Every (square of `sub`, direction, neighbour) pair the root of the
    /// target tree can see. `sub` must not yet be attached.
    fn pending_joins(
        &self,
        root: DungeonId,
        sub: DungeonId,
    ) -> Result<Vec<(SquareId, Direction, SquareId)>, DungeonError> {
        let mut joins = Vec::new();
        for leaf in self.containing_leaf_dungeons(sub)? {
            for (coord, square) in self.leaf(leaf)?.positions_and_squares() {
                for (d, n) in self.directions_and_neighbours_of(root, coord)? {
                    joins.push((square, d, n));
                }
            }
        }
        Ok(joins)
    }

    /// Detach and terminate `sub` if it is a child of `composite`;
    /// otherwise do nothing.
    pub fn delete_sub_dungeon(
        &mut self,
        composite: DungeonId,
        sub: DungeonId,
    ) -> Result<(), DungeonError> {
        if !self.composite(composite)?.has_child(sub) {
            return Ok(());
        }
        self.terminate(sub)?;
        debug!(%composite, %sub, "sub-dungeon deleted");
        Ok(())
    }

    /// The direct children of `composite`, in insertion order.
    pub fn sub_dungeons(&self, composite: DungeonId) -> Result<Vec<DungeonId>, DungeonError> {
        Ok(self.composite(composite)?.children.iter().copied().collect())
    }

    /// Whether `sub` is a direct child of `composite`.
    pub fn has_as_sub_dungeon(
        &self,
        composite: DungeonId,
        sub: DungeonId,
    ) -> Result<bool, DungeonError> {
        Ok(self.composite(composite)?.has_child(sub))
    }

    /// The direct child of `composite` whose bounds contain `coord`.
    pub fn sub_dungeon_containing(
        &self,
        composite: DungeonId,
        coord: Coordinate,
    ) -> Result<Option<DungeonId>, DungeonError> {
        Ok(self
            .composite(composite)?
            .children
            .iter()
            .copied()
            .find(|ch| self.dungeons[ch.index()].system.contains(coord)))
    }

    /// Whether `sub`, a child of `composite`, could occupy `system`
    /// instead of its current bounds.
    pub fn can_expand_sub_dungeon_to(
        &self,
        composite: DungeonId,
        sub: DungeonId,
        system: &CoordinateSystem,
    ) -> Result<bool, DungeonError> {
        if !self.composite(composite)?.has_child(sub) {
            return Ok(false);
        }
        if !system.contains_system(&self.live(sub)?.system) {
            return Ok(false);
        }
        self.can_place(composite, Some(sub), system)
    }
}
