//! All-or-nothing translation of dungeon subtrees.

use delve_core::{Coordinate, CoordinateSystem, DungeonId, SquareId};
use indexmap::IndexMap;
use tracing::debug;

use crate::dungeon::DungeonKind;
use crate::error::DungeonError;
use crate::world::World;

/// New bounds (and, for leaves, re-keyed squares) for one dungeon.
#[derive(Debug)]
pub(crate) struct Relocation {
    dungeon: DungeonId,
    system: CoordinateSystem,
    squares: Option<IndexMap<Coordinate, SquareId>>,
}

impl World {
    /// Compute where every dungeon and square under `dungeon` ends up when
    /// shifted by `offset`, without mutating anything.
    ///
    /// Fails on the first dungeon whose bounds overflow, or the first
    /// square whose new coordinate its leaf would not accept.
    pub(crate) fn plan_translation(
        &self,
        dungeon: DungeonId,
        offset: Coordinate,
    ) -> Result<Vec<Relocation>, DungeonError> {
        let mut plan = Vec::new();
        for id in self.subtree(dungeon) {
            let node = self.live(id)?;
            let system = node.system.translated(offset)?;
            let squares = match &node.kind {
                DungeonKind::Leaf(leaf) => {
                    let mut moved = IndexMap::with_capacity(leaf.squares.len());
                    for (&coord, &square) in &leaf.squares {
                        let target = coord.try_add(offset)?;
                        if !self.placement_allowed(&system, leaf.shape, target, square) {
                            return Err(DungeonError::CoordinateConstraints {
                                dungeon: id,
                                coord: target,
                            });
                        }
                        moved.insert(target, square);
                    }
                    Some(moved)
                }
                DungeonKind::Composite(_) => None,
            };
            plan.push(Relocation {
                dungeon: id,
                system,
                squares,
            });
        }
        Ok(plan)
    }

    /// Apply a plan and return the plan that undoes it.
    pub(crate) fn apply_relocations(&mut self, plan: Vec<Relocation>) -> Vec<Relocation> {
        plan.into_iter()
            .map(|mut r| {
                let node = &mut self.dungeons[r.dungeon.index()];
                std::mem::swap(&mut node.system, &mut r.system);
                if let (DungeonKind::Leaf(leaf), Some(squares)) = (&mut node.kind, r.squares.as_mut())
                {
                    std::mem::swap(&mut leaf.squares, squares);
                }
                r
            })
            .collect()
    }

    /// Shift a root dungeon and everything below it by `offset`.
    ///
    /// Either every dungeon and square moves or nothing does. Dungeons
    /// with a parent are refused with [`DungeonError::AttachedTranslation`]
    /// since their squares are already joined to their surroundings.
    pub fn translate(&mut self, dungeon: DungeonId, offset: Coordinate) -> Result<(), DungeonError> {
        if let Some(parent) = self.live(dungeon)?.parent {
            return Err(DungeonError::AttachedTranslation { dungeon, parent });
        }
        let plan = self.plan_translation(dungeon, offset)?;
        let moved = plan.len();
        self.apply_relocations(plan);
        debug!(%dungeon, %offset, dungeons = moved, "dungeon translated");
        Ok(())
    }
}
