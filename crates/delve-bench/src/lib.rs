//! Benchmark profiles for the Delve dungeon model.
//!
//! - [`filled_level`]: one level with every valid coordinate occupied
//! - [`stacked_floors`]: a composite of filled levels joined by shafts
//! - [`scatter_coordinates`]: deterministic distinct positions in a level

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;

use delve_core::{Coordinate, CoordinateSystem, Direction, DungeonId, Humidity, Temperature};
use delve_dungeon::{DungeonError, World};
use delve_grid::SquareBuilder;

/// Square with a temperature and humidity derived from `i`, so merges do
/// real equilibration work.
fn varied_square(i: usize) -> SquareBuilder {
    let celsius = 10.0 + (i % 17) as f64;
    let humidity = ((i * 37) % 10_000) as u32;
    SquareBuilder::new()
        .temperature(Temperature::constant(celsius))
        .humidity(Humidity::from_hundredths(humidity).unwrap_or_default())
}

/// Every non-diagonal coordinate of `system`'s bottom layer.
pub fn level_coordinates(system: &CoordinateSystem) -> Vec<Coordinate> {
    let (lower, upper) = (system.lower(), system.upper());
    (lower.y..=upper.y)
        .flat_map(|y| (lower.x..=upper.x).map(move |x| Coordinate::new(x, y, lower.z)))
        .filter(|c| !c.is_diagonal())
        .collect()
}

/// Place a fresh square at every free coordinate of `level`.
pub fn fill_level(world: &mut World, level: DungeonId) -> Result<usize, DungeonError> {
    let system = *world.dungeon(level)?.system();
    let mut placed = 0;
    for (i, at) in level_coordinates(&system).into_iter().enumerate() {
        if world.is_occupied(level, at)? {
            continue;
        }
        let square = world.insert_square(varied_square(i))?;
        world.add_square_at(level, at, square)?;
        placed += 1;
    }
    Ok(placed)
}

/// Fill a new `width` × `depth` level at the origin.
pub fn filled_level(world: &mut World, width: u32, depth: u32) -> Result<DungeonId, DungeonError> {
    let level = world.create_level(width, depth)?;
    fill_level(world, level)?;
    Ok(level)
}

/// A composite holding `floors` filled `side` × `side` levels, two apart
/// in z, each linked to the next by a one-square shaft.
///
/// Levels are attached empty and filled afterwards, so every placement
/// goes through the root neighbour lookup.
pub fn stacked_floors(side: u32, floors: u32) -> Result<(World, DungeonId), DungeonError> {
    let mut world = World::default();
    let top = floors.saturating_mul(2).saturating_sub(2) as i32;
    let span = side as i32 - 1;
    let root = world.create_composite(CoordinateSystem::new(
        Coordinate::ORIGIN,
        Coordinate::new(span, span, top),
    )?)?;
    for floor in 0..floors as i32 {
        let z = floor * 2;
        let level = world.create_level_in(CoordinateSystem::new(
            Coordinate::new(0, 0, z),
            Coordinate::new(span, span, z),
        )?)?;
        world.add_sub_dungeon_at(root, Coordinate::ORIGIN, level)?;
        fill_level(&mut world, level)?;
        if floor + 1 < floors as i32 {
            let at = Coordinate::new(1, 0, z + 1);
            let shaft = world.create_shaft(at, 1, Direction::Up)?;
            world.add_sub_dungeon_at(root, Coordinate::ORIGIN, shaft)?;
            let square = world.insert_square(SquareBuilder::new())?;
            world.add_square_at(shaft, at, square)?;
        }
    }
    Ok((world, root))
}

/// `n` distinct non-diagonal coordinates in a `width` × `depth` level,
/// chosen from `seed`.
pub fn scatter_coordinates(width: i32, depth: i32, n: usize, seed: u64) -> Vec<Coordinate> {
    let all = match CoordinateSystem::new(Coordinate::ORIGIN, Coordinate::new(width - 1, depth - 1, 0)) {
        Ok(system) => level_coordinates(&system),
        Err(_) => return Vec::new(),
    };
    let n = n.min(all.len());
    let mut taken = HashSet::with_capacity(n);
    let mut out = Vec::with_capacity(n);
    for i in 0..n as u64 {
        let mut pos = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407))
            % all.len() as u64) as usize;
        while !taken.insert(pos) {
            pos = (pos + 1) % all.len();
        }
        out.push(all[pos]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_level_has_every_square() {
        let mut world = World::default();
        let level = filled_level(&mut world, 8, 8).unwrap();
        assert_eq!(world.square_count(level).unwrap(), 63);
        assert!(world.audit().is_empty());
    }

    #[test]
    fn stacked_floors_are_linked() {
        let (world, root) = stacked_floors(6, 3).unwrap();
        assert_eq!(world.square_count(root).unwrap(), 3 * 35 + 2);
        assert_eq!(world.sub_dungeons(root).unwrap().len(), 5);
        assert!(world.audit().is_empty());
    }

    #[test]
    fn scatter_is_distinct_and_deterministic() {
        let a = scatter_coordinates(10, 10, 40, 7);
        let b = scatter_coordinates(10, 10, 40, 7);
        assert_eq!(a, b);
        let unique: HashSet<_> = a.iter().collect();
        assert_eq!(unique.len(), 40);
        assert!(a.iter().all(|c| !c.is_diagonal()));
    }
}
