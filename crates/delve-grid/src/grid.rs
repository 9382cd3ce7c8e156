//! The square/border arena and the border-merge protocol.

use delve_core::{
    BorderId, Couple, CoupleError, Direction, EnvironmentConfig, Humidity, SquareId, Temperature,
};
use tracing::{debug, trace};

use crate::border::{Border, BorderKind};
use crate::error::GridError;
use crate::journal::{Journal, Undo};
use crate::square::{check_border_kinds, check_temperature, Square, SquareBuilder};

/// Whether a border merge also blends the environment of the two squares
/// it joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Equilibration {
    /// Blend temperature and humidity after merging.
    #[default]
    Equilibrate,
    /// Only rewire the borders.
    Skip,
}

/// What a validated border merge will do.
#[derive(Clone, Copy, Debug)]
enum MergePlan {
    /// The borders are already one shared border.
    Already(BorderId),
    /// `loser` is discarded and `square` rewired to `survivor` in `direction`.
    Merge {
        survivor: BorderId,
        loser: BorderId,
        square: SquareId,
        direction: Direction,
    },
}

/// Arena of squares and borders.
///
/// Squares and borders are addressed by [`SquareId`] and [`BorderId`].
/// Slots are append-only: terminated entries stay as tombstones so an id
/// never changes meaning. Every mutation keeps the square/border graph
/// symmetric: a border lists exactly the squares that reference it.
///
/// Mutations can be grouped with [`begin`](Self::begin),
/// [`commit`](Self::commit) and [`rollback`](Self::rollback), or the
/// [`transaction`](Self::transaction) helper.
#[derive(Debug)]
pub struct Grid {
    squares: Vec<Square>,
    borders: Vec<Border>,
    environment: EnvironmentConfig,
    journal: Journal,
}

impl Grid {
    /// Create an empty grid with the given environment settings.
    pub fn new(environment: EnvironmentConfig) -> Result<Self, GridError> {
        environment.validate()?;
        Ok(Self {
            squares: Vec::new(),
            borders: Vec::new(),
            environment,
            journal: Journal::default(),
        })
    }

    /// The environment settings.
    pub fn environment(&self) -> &EnvironmentConfig {
        &self.environment
    }

    /// Replace the environment settings. Not journaled.
    pub fn set_environment(&mut self, environment: EnvironmentConfig) -> Result<(), GridError> {
        environment.validate()?;
        self.environment = environment;
        Ok(())
    }

    /// Restore the default environment settings.
    pub fn reset_environment(&mut self) {
        self.environment = EnvironmentConfig::default();
    }

    // ── Lookup ──────────────────────────────────────────────────

    /// Number of square slots, including terminated ones.
    pub fn square_slots(&self) -> usize {
        self.squares.len()
    }

    /// Number of border slots, including terminated ones.
    pub fn border_slots(&self) -> usize {
        self.borders.len()
    }

    /// The square in slot `id`, live or terminated.
    pub fn square(&self, id: SquareId) -> Result<&Square, GridError> {
        self.squares
            .get(id.index())
            .ok_or(GridError::UnknownSquare { square: id })
    }

    /// The border in slot `id`, live or terminated.
    pub fn border(&self, id: BorderId) -> Result<&Border, GridError> {
        self.borders
            .get(id.index())
            .ok_or(GridError::UnknownBorder { border: id })
    }

    /// Whether `id` names a live square.
    pub fn is_live(&self, id: SquareId) -> bool {
        self.square(id).is_ok_and(|s| !s.is_terminated())
    }

    /// Ids of all live squares, in creation order.
    pub fn live_squares(&self) -> impl Iterator<Item = SquareId> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_terminated())
            .map(|(i, _)| SquareId(i as u32))
    }

    fn live_borders(&self, id: SquareId) -> Result<[BorderId; 6], GridError> {
        self.square(id)?
            .borders
            .ok_or(GridError::SquareTerminated { square: id })
    }

    fn live_square(&self, id: SquareId) -> Result<&Square, GridError> {
        let square = self.square(id)?;
        if square.is_terminated() {
            return Err(GridError::SquareTerminated { square: id });
        }
        Ok(square)
    }

    fn live_couple(&self, id: BorderId) -> Result<Couple<SquareId>, GridError> {
        self.border(id)?
            .squares
            .ok_or(GridError::BorderTerminated { border: id })
    }

    /// The border of `square` in `direction`.
    pub fn border_at(&self, square: SquareId, direction: Direction) -> Result<BorderId, GridError> {
        Ok(self.live_borders(square)?[direction.index()])
    }

    /// The kind of the border of `square` in `direction`.
    pub fn border_kind_at(
        &self,
        square: SquareId,
        direction: Direction,
    ) -> Result<BorderKind, GridError> {
        let border = self.border_at(square, direction)?;
        Ok(self.borders[border.index()].kind)
    }

    /// The square sharing the border of `square` in `direction`, if any.
    pub fn neighbour(
        &self,
        square: SquareId,
        direction: Direction,
    ) -> Result<Option<SquareId>, GridError> {
        let border = self.border_at(square, direction)?;
        Ok(self.live_couple(border)?.partner(square))
    }

    // ── Derived environment ─────────────────────────────────────

    /// Whether an occupant of `square` is likely to slip.
    pub fn is_slippery(&self, square: SquareId) -> Result<bool, GridError> {
        let s = self.live_square(square)?;
        let floor = self.border_kind_at(square, Direction::Down)?;
        Ok(s.has_slippery_floor() || floor.is_slippery() || s.has_slippery_environment())
    }

    /// Cold damage in `square` under this grid's settings.
    pub fn cold_damage(&self, square: SquareId) -> Result<u32, GridError> {
        Ok(self.live_square(square)?.cold_damage(&self.environment))
    }

    /// Heat damage in `square` under this grid's settings.
    pub fn heat_damage(&self, square: SquareId) -> Result<u32, GridError> {
        Ok(self.live_square(square)?.heat_damage(&self.environment))
    }

    /// Inhabitability of `square` under this grid's settings.
    pub fn inhabitability(&self, square: SquareId) -> Result<f64, GridError> {
        Ok(self.live_square(square)?.inhabitability(&self.environment))
    }

    // ── Construction ────────────────────────────────────────────

    /// Validate `builder` and add the square with six fresh borders.
    pub fn insert_square(&mut self, builder: SquareBuilder) -> Result<SquareId, GridError> {
        builder.validate()?;
        let square = SquareId(
            u32::try_from(self.squares.len()).map_err(|_| GridError::CapacityExceeded)?,
        );
        let first = self.borders.len();
        u32::try_from(first + Direction::ALL.len()).map_err(|_| GridError::CapacityExceeded)?;

        let kinds = builder.border_kinds();
        let mut ids = [BorderId(0); 6];
        for d in Direction::ALL {
            ids[d.index()] = BorderId((first + d.index()) as u32);
            self.borders.push(Border::new(kinds[d.index()], square));
            self.journal.record(Undo::BorderCreated);
        }
        self.squares.push(builder.into_square(ids));
        self.journal.record(Undo::SquareCreated);
        trace!(%square, "square inserted");
        Ok(square)
    }

    // ── Merging ─────────────────────────────────────────────────

    /// Merge border `a` with border `b`.
    ///
    /// A no-op returning `a` if `a` and `b` are the same shared border.
    /// Fails with [`GridError::BorderMerge`] if either border is already
    /// shared or both touch the same square. Otherwise the less open
    /// border survives (ties keep `a`), the other border's square is
    /// rewired to it and the loser is terminated. Returns the survivor.
    ///
    /// Nothing is mutated unless every check passes.
    pub fn merge_borders(
        &mut self,
        a: BorderId,
        b: BorderId,
        equilibration: Equilibration,
    ) -> Result<BorderId, GridError> {
        let plan = self.plan_border_merge(a, b)?;
        let MergePlan::Merge {
            survivor, square, ..
        } = plan
        else {
            return self.apply_border_merge(plan);
        };
        let blend = match equilibration {
            Equilibration::Equilibrate => {
                let first = self.live_couple(survivor)?.any();
                Some((first, self.plan_equilibration(first, square)?))
            }
            Equilibration::Skip => None,
        };
        let survivor = self.apply_border_merge(plan)?;
        if let Some((first, (t, h))) = blend {
            self.apply_equilibration(first, square, t, h);
        }
        Ok(survivor)
    }

    /// Join `a` to `neighbour` across `a`'s border in `direction`, then
    /// equilibrate both squares.
    ///
    /// Merging a pair that is already joined changes nothing. Either
    /// every effect happens or none does.
    pub fn merge_squares(
        &mut self,
        a: SquareId,
        neighbour: SquareId,
        direction: Direction,
    ) -> Result<BorderId, GridError> {
        let near = self.border_at(a, direction)?;
        let far = self.border_at(neighbour, direction.opposite())?;
        let plan = self.plan_border_merge(near, far)?;
        if let MergePlan::Already(border) = plan {
            return Ok(border);
        }
        let (t, h) = self.plan_equilibration(a, neighbour)?;
        let survivor = self.apply_border_merge(plan)?;
        self.apply_equilibration(a, neighbour, t, h);
        Ok(survivor)
    }

    fn plan_border_merge(&self, a: BorderId, b: BorderId) -> Result<MergePlan, GridError> {
        let ca = self.live_couple(a)?;
        let cb = self.live_couple(b)?;
        let refused = GridError::BorderMerge {
            first: a,
            second: b,
        };
        if a == b {
            return if ca.is_pair() {
                Ok(MergePlan::Already(a))
            } else {
                Err(refused)
            };
        }
        if ca.is_pair() || cb.is_pair() || ca.any() == cb.any() {
            return Err(refused);
        }

        let ka = self.borders[a.index()].kind;
        let kb = self.borders[b.index()].kind;
        let (survivor, loser, moved) = if kb.openness() < ka.openness() {
            (b, a, ca.any())
        } else {
            (a, b, cb.any())
        };
        let direction = self
            .live_square(moved)?
            .direction_of(loser)
            .ok_or(refused)?;
        let kind = self.borders[survivor.index()].kind;
        self.check_border_constraints(moved, Some((direction, kind)))?;
        Ok(MergePlan::Merge {
            survivor,
            loser,
            square: moved,
            direction,
        })
    }

    fn apply_border_merge(&mut self, plan: MergePlan) -> Result<BorderId, GridError> {
        let (survivor, loser, square, direction) = match plan {
            MergePlan::Already(border) => return Ok(border),
            MergePlan::Merge {
                survivor,
                loser,
                square,
                direction,
            } => (survivor, loser, square, direction),
        };

        if let Some(couple) = self.touch_border(survivor).squares.as_mut() {
            couple.add(square)?;
        }
        self.touch_border(loser).squares = None;
        if let Some(borders) = self.touch_square(square).borders.as_mut() {
            borders[direction.index()] = survivor;
        }
        trace!(%survivor, %loser, %square, %direction, "borders merged");
        Ok(survivor)
    }

    fn plan_equilibration(
        &self,
        a: SquareId,
        b: SquareId,
    ) -> Result<(Temperature, Humidity), GridError> {
        let sa = self.live_square(a)?;
        let sb = self.live_square(b)?;
        let t = Temperature::equilibrate(
            sa.temperature,
            sa.humidity,
            sb.temperature,
            sb.humidity,
            self.environment.merge_temperature_weight,
        );
        for (id, s) in [(a, sa), (b, sb)] {
            if !t.within(s.min_temperature, s.max_temperature) {
                return Err(GridError::MergingTemperaturesViolatesLimits {
                    square: id,
                    temperature: t,
                });
            }
        }
        Ok((t, Humidity::average(sa.humidity, sb.humidity)))
    }

    fn apply_equilibration(&mut self, a: SquareId, b: SquareId, t: Temperature, h: Humidity) {
        for id in [a, b] {
            let s = self.touch_square(id);
            s.temperature = t;
            s.humidity = h;
        }
        trace!(%a, %b, temperature = %t, humidity = %h, "squares equilibrated");
    }

    // ── Mutation ────────────────────────────────────────────────

    /// Terminate `square`, detaching all six borders.
    ///
    /// A border shared with a neighbour stays with the neighbour; a
    /// border touching only this square is terminated with it.
    pub fn terminate_square(&mut self, square: SquareId) -> Result<(), GridError> {
        let borders = self.live_borders(square)?;
        self.touch_square(square).borders = None;
        for border in borders {
            let slot = self.touch_border(border);
            match slot.squares.as_mut() {
                Some(couple) if couple.is_pair() => couple.delete(square)?,
                _ => slot.squares = None,
            }
        }
        debug!(%square, "square terminated");
        Ok(())
    }

    /// Change the kind of the border of `square` in `direction`.
    ///
    /// The border is shared state: the change is checked against the
    /// border constraints of every square touching it.
    pub fn set_border_kind(
        &mut self,
        square: SquareId,
        direction: Direction,
        kind: BorderKind,
    ) -> Result<(), GridError> {
        let border = self.border_at(square, direction)?;
        let couple = self.live_couple(border)?;
        for s in couple.iter() {
            let d = self
                .live_square(s)?
                .direction_of(border)
                .ok_or(GridError::Couple(CoupleError::NotMember))?;
            self.check_border_constraints(s, Some((d, kind)))?;
        }
        self.touch_border(border).kind = kind;
        Ok(())
    }

    /// Open or close the door of `square` in `direction`.
    pub fn set_door_open(
        &mut self,
        square: SquareId,
        direction: Direction,
        open: bool,
    ) -> Result<(), GridError> {
        match self.border_kind_at(square, direction)? {
            BorderKind::Door { .. } => {
                self.set_border_kind(square, direction, BorderKind::Door { open })
            }
            _ => Err(GridError::NotADoor { square, direction }),
        }
    }

    /// Set the temperature, which must lie within the square's limits.
    pub fn set_temperature(
        &mut self,
        square: SquareId,
        temperature: Temperature,
    ) -> Result<(), GridError> {
        self.live_square(square)?.check_temperature(temperature)?;
        self.touch_square(square).temperature = temperature;
        Ok(())
    }

    /// Set the temperature limits, which must contain the current temperature.
    pub fn set_temperature_bounds(
        &mut self,
        square: SquareId,
        min: Temperature,
        max: Temperature,
    ) -> Result<(), GridError> {
        check_temperature(self.live_square(square)?.temperature, min, max)?;
        let s = self.touch_square(square);
        s.min_temperature = min;
        s.max_temperature = max;
        Ok(())
    }

    /// Set the humidity.
    pub fn set_humidity(&mut self, square: SquareId, humidity: Humidity) -> Result<(), GridError> {
        self.live_square(square)?;
        self.touch_square(square).humidity = humidity;
        Ok(())
    }

    /// Check the border constraints of `square`, optionally pretending the
    /// border in one direction had a different kind.
    pub(crate) fn check_border_constraints(
        &self,
        square: SquareId,
        replace: Option<(Direction, BorderKind)>,
    ) -> Result<(), GridError> {
        let borders = self.live_borders(square)?;
        let mut kinds = [BorderKind::WALL; 6];
        for d in Direction::ALL {
            kinds[d.index()] = match replace {
                Some((rd, kind)) if rd == d => kind,
                _ => self.borders[borders[d.index()].index()].kind,
            };
        }
        check_border_kinds(&kinds).map_err(|violation| GridError::BorderConstraints {
            square: Some(square),
            violation,
        })
    }

    fn touch_square(&mut self, id: SquareId) -> &mut Square {
        let slot = &mut self.squares[id.index()];
        self.journal.record(Undo::Square(id, *slot));
        slot
    }

    fn touch_border(&mut self, id: BorderId) -> &mut Border {
        let slot = &mut self.borders[id.index()];
        self.journal.record(Undo::Border(id, *slot));
        slot
    }

    // ── Transactions ────────────────────────────────────────────

    /// Open a (possibly nested) transaction.
    pub fn begin(&mut self) {
        self.journal.begin();
    }

    /// Keep every change since the matching [`begin`](Self::begin).
    pub fn commit(&mut self) -> Result<(), GridError> {
        if self.journal.commit() {
            Ok(())
        } else {
            Err(GridError::NoTransaction)
        }
    }

    /// Undo every change since the matching [`begin`](Self::begin).
    pub fn rollback(&mut self) -> Result<(), GridError> {
        let undone = self.journal.unwind().ok_or(GridError::NoTransaction)?;
        for undo in undone {
            match undo {
                Undo::Square(id, square) => self.squares[id.index()] = square,
                Undo::Border(id, border) => self.borders[id.index()] = border,
                Undo::SquareCreated => {
                    self.squares.pop();
                }
                Undo::BorderCreated => {
                    self.borders.pop();
                }
            }
        }
        debug!(depth = self.journal.depth(), "grid transaction rolled back");
        Ok(())
    }

    /// Whether a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.journal.is_active()
    }

    /// Run `f` in a transaction: commit on `Ok`, roll back on `Err`.
    pub fn transaction<T, E>(&mut self, f: impl FnOnce(&mut Grid) -> Result<T, E>) -> Result<T, E> {
        self.begin();
        let result = f(self);
        let closed = match result {
            Ok(_) => self.commit(),
            Err(_) => self.rollback(),
        };
        debug_assert!(closed.is_ok(), "transaction marks unbalanced");
        result
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            squares: Vec::new(),
            borders: Vec::new(),
            environment: EnvironmentConfig::default(),
            journal: Journal::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::Humidity;

    fn t(c: f64) -> Temperature {
        Temperature::celsius(c).unwrap()
    }

    fn h(v: u32) -> Humidity {
        Humidity::from_hundredths(v).unwrap()
    }

    fn square(grid: &mut Grid, celsius: f64, hundredths: u32) -> SquareId {
        grid.insert_square(
            SquareBuilder::new()
                .temperature(t(celsius))
                .humidity(h(hundredths)),
        )
        .unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn new_square_has_six_private_borders() {
        let mut g = Grid::default();
        let s = square(&mut g, 20.0, 0);
        let borders = *g.square(s).unwrap().borders().unwrap();
        for (i, b) in borders.iter().enumerate() {
            assert!(borders[i + 1..].iter().all(|o| o != b));
            let border = g.border(*b).unwrap();
            assert!(border.borders_on(s));
            assert!(!border.is_shared());
        }
        assert!(g.audit().is_empty());
    }

    #[test]
    fn invalid_builder_inserts_nothing() {
        let mut g = Grid::default();
        let bad = SquareBuilder::new().border(Direction::Down, BorderKind::DOOR);
        assert!(g.insert_square(bad).is_err());
        assert_eq!(g.square_slots(), 0);
        assert_eq!(g.border_slots(), 0);
    }

    #[test]
    fn rejects_invalid_environment() {
        let cfg = EnvironmentConfig {
            merge_temperature_weight: 2.0,
            ..EnvironmentConfig::default()
        };
        assert!(matches!(Grid::new(cfg), Err(GridError::Config(_))));
    }

    // ── Merge protocol ──────────────────────────────────────────

    #[test]
    fn merge_squares_equilibrates_both() {
        let mut g = Grid::default();
        let a = square(&mut g, 100.0, 5000);
        let b = square(&mut g, 40.0, 10_000);
        g.merge_squares(a, b, Direction::East).unwrap();

        let w = g.environment().merge_temperature_weight;
        let expected =
            t(((w + (1.0 - w) * 50.0 / 75.0) * 100.0 + (w + (1.0 - w) * 100.0 / 75.0) * 40.0)
                / 2.0);
        for s in [a, b] {
            let sq = g.square(s).unwrap();
            assert_eq!(sq.humidity(), h(7500));
            assert_eq!(sq.temperature(), expected);
        }
        assert_eq!(g.neighbour(a, Direction::East).unwrap(), Some(b));
        assert_eq!(g.neighbour(b, Direction::West).unwrap(), Some(a));
        assert!(g.audit().is_empty());
    }

    #[test]
    fn less_open_border_survives() {
        let mut g = Grid::default();
        let a = g
            .insert_square(SquareBuilder::new().border(Direction::East, BorderKind::Open))
            .unwrap();
        let b = g
            .insert_square(SquareBuilder::new().border(Direction::West, BorderKind::DOOR))
            .unwrap();
        let door = g.border_at(b, Direction::West).unwrap();
        let open = g.border_at(a, Direction::East).unwrap();
        let survivor = g.merge_squares(a, b, Direction::East).unwrap();
        assert_eq!(survivor, door);
        assert!(g.border(open).unwrap().is_terminated());
        assert_eq!(g.border_at(a, Direction::East).unwrap(), door);
        assert_eq!(g.border_kind_at(a, Direction::East).unwrap(), BorderKind::DOOR);
    }

    #[test]
    fn tie_keeps_first_border() {
        let mut g = Grid::default();
        let a = square(&mut g, 20.0, 0);
        let b = square(&mut g, 20.0, 0);
        let near = g.border_at(a, Direction::North).unwrap();
        let far = g.border_at(b, Direction::South).unwrap();
        assert_eq!(g.merge_borders(near, far, Equilibration::Skip).unwrap(), near);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut g = Grid::default();
        let a = square(&mut g, 20.0, 0);
        let b = square(&mut g, 20.0, 0);
        let survivor = g.merge_squares(a, b, Direction::Up).unwrap();
        assert_eq!(g.merge_squares(a, b, Direction::Up).unwrap(), survivor);
        assert_eq!(
            g.merge_borders(survivor, survivor, Equilibration::Skip).unwrap(),
            survivor
        );
    }

    #[test]
    fn merging_square_with_itself_fails_without_mutation() {
        let mut g = Grid::default();
        let a = square(&mut g, 20.0, 0);
        let before = *g.square(a).unwrap();
        assert!(matches!(
            g.merge_squares(a, a, Direction::East),
            Err(GridError::BorderMerge { .. })
        ));
        assert_eq!(*g.square(a).unwrap(), before);
    }

    #[test]
    fn merging_into_shared_border_fails() {
        let mut g = Grid::default();
        let a = square(&mut g, 20.0, 0);
        let b = square(&mut g, 20.0, 0);
        let c = square(&mut g, 20.0, 0);
        g.merge_squares(a, b, Direction::East).unwrap();
        assert!(matches!(
            g.merge_squares(c, a, Direction::West),
            Err(GridError::BorderMerge { .. })
        ));
        assert!(g.audit().is_empty());
    }

    #[test]
    fn merge_rejects_door_forced_into_floor() {
        let mut g = Grid::default();
        let below = g
            .insert_square(SquareBuilder::new().border(Direction::Up, BorderKind::DOOR))
            .unwrap();
        let above = g
            .insert_square(SquareBuilder::new().border(Direction::Down, BorderKind::Open))
            .unwrap();
        // The door would survive and become the floor of `above`.
        assert!(matches!(
            g.merge_squares(below, above, Direction::Up),
            Err(GridError::BorderConstraints { .. })
        ));
        assert_eq!(g.neighbour(below, Direction::Up).unwrap(), None);
    }

    #[test]
    fn merge_outside_temperature_limits_is_refused() {
        let mut g = Grid::default();
        let cold = g
            .insert_square(
                SquareBuilder::new()
                    .temperature(t(0.0))
                    .temperature_bounds(t(-10.0), t(10.0)),
            )
            .unwrap();
        let hot = square(&mut g, 500.0, 0);
        assert!(matches!(
            g.merge_squares(cold, hot, Direction::North),
            Err(GridError::MergingTemperaturesViolatesLimits { square, .. }) if square == cold
        ));
        assert_eq!(g.square(cold).unwrap().temperature(), t(0.0));
        assert_eq!(g.neighbour(cold, Direction::North).unwrap(), None);
    }

    #[test]
    fn skip_leaves_environment_untouched() {
        let mut g = Grid::default();
        let a = square(&mut g, 10.0, 0);
        let b = square(&mut g, 30.0, 0);
        let near = g.border_at(a, Direction::South).unwrap();
        let far = g.border_at(b, Direction::North).unwrap();
        g.merge_borders(near, far, Equilibration::Skip).unwrap();
        assert_eq!(g.square(a).unwrap().temperature(), t(10.0));
        assert_eq!(
            g.merge_borders(near, near, Equilibration::Equilibrate)
                .unwrap(),
            near
        );
        assert_eq!(g.square(a).unwrap().temperature(), t(10.0));
        assert_eq!(g.square(b).unwrap().temperature(), t(30.0));
    }

    #[test]
    fn remerging_joined_pair_does_not_drift() {
        let mut g = Grid::default();
        let a = square(&mut g, 10.0, 2000);
        let b = square(&mut g, 30.0, 8000);
        let survivor = g.merge_squares(a, b, Direction::East).unwrap();
        let snapshot = |g: &Grid| {
            [a, b].map(|id| {
                let s = g.square(id).unwrap();
                (s.temperature(), s.humidity())
            })
        };
        let joined = snapshot(&g);
        for _ in 0..3 {
            assert_eq!(g.merge_squares(a, b, Direction::East).unwrap(), survivor);
            assert_eq!(
                g.merge_borders(survivor, survivor, Equilibration::Equilibrate)
                    .unwrap(),
                survivor
            );
        }
        assert_eq!(snapshot(&g), joined);
    }

    // ── Termination ─────────────────────────────────────────────

    #[test]
    fn terminate_keeps_shared_border_for_neighbour() {
        let mut g = Grid::default();
        let a = square(&mut g, 20.0, 0);
        let b = square(&mut g, 20.0, 0);
        let shared = g.merge_squares(a, b, Direction::East).unwrap();
        let private = g.border_at(a, Direction::North).unwrap();
        g.terminate_square(a).unwrap();

        assert!(g.square(a).unwrap().is_terminated());
        assert!(g.border(private).unwrap().is_terminated());
        let border = g.border(shared).unwrap();
        assert!(border.borders_on(b) && !border.borders_on(a));
        assert_eq!(g.neighbour(b, Direction::West).unwrap(), None);
        assert!(matches!(
            g.terminate_square(a),
            Err(GridError::SquareTerminated { .. })
        ));
        assert!(g.audit().is_empty());
    }

    // ── Mutators ────────────────────────────────────────────────

    #[test]
    fn door_open_close_is_shared() {
        let mut g = Grid::default();
        let a = g
            .insert_square(SquareBuilder::new().border(Direction::East, BorderKind::DOOR))
            .unwrap();
        let b = g
            .insert_square(SquareBuilder::new().border(Direction::West, BorderKind::Open))
            .unwrap();
        g.merge_squares(a, b, Direction::East).unwrap();
        g.set_door_open(b, Direction::West, true).unwrap();
        assert!(g.border_kind_at(a, Direction::East).unwrap().is_open());
        assert!(matches!(
            g.set_door_open(a, Direction::North, true),
            Err(GridError::NotADoor { .. })
        ));
    }

    #[test]
    fn set_border_kind_checks_every_sharing_square() {
        let mut g = Grid::default();
        let low = square(&mut g, 20.0, 0);
        let high = square(&mut g, 20.0, 0);
        g.merge_squares(low, high, Direction::Up).unwrap();
        // A door is fine as a ceiling but not as the upper square's floor.
        assert!(matches!(
            g.set_border_kind(low, Direction::Up, BorderKind::DOOR),
            Err(GridError::BorderConstraints { square: Some(s), .. }) if s == high
        ));
        assert!(g.border_kind_at(low, Direction::Up).unwrap().is_wall());
    }

    #[test]
    fn temperature_setters_respect_bounds() {
        let mut g = Grid::default();
        let s = square(&mut g, 20.0, 0);
        assert!(g.set_temperature(s, t(6000.0)).is_err());
        g.set_temperature(s, t(200.0)).unwrap();
        assert!(g.set_temperature_bounds(s, t(0.0), t(100.0)).is_err());
        g.set_temperature_bounds(s, t(0.0), t(300.0)).unwrap();
        assert_eq!(g.square(s).unwrap().max_temperature(), t(300.0));
    }

    #[test]
    fn slippery_sources() {
        let mut g = Grid::default();
        let wet = square(&mut g, 40.0, 10_000);
        let dry = square(&mut g, 20.0, 0);
        let floor = g
            .insert_square(
                SquareBuilder::new().border(Direction::Down, BorderKind::Wall { slippery: true }),
            )
            .unwrap();
        assert!(g.is_slippery(wet).unwrap());
        assert!(!g.is_slippery(dry).unwrap());
        assert!(g.is_slippery(floor).unwrap());
    }

    // ── Transactions ────────────────────────────────────────────

    #[test]
    fn rollback_restores_everything() {
        let mut g = Grid::default();
        let a = square(&mut g, 100.0, 5000);
        let b = square(&mut g, 40.0, 10_000);
        let before_a = *g.square(a).unwrap();

        g.begin();
        let c = square(&mut g, 20.0, 0);
        g.merge_squares(a, b, Direction::East).unwrap();
        g.merge_squares(c, a, Direction::South).unwrap();
        g.terminate_square(b).unwrap();
        g.rollback().unwrap();

        assert_eq!(g.square_slots(), 2);
        assert_eq!(g.border_slots(), 12);
        assert_eq!(*g.square(a).unwrap(), before_a);
        assert!(g.is_live(b));
        assert_eq!(g.neighbour(a, Direction::East).unwrap(), None);
        assert!(g.audit().is_empty());
    }

    #[test]
    fn transaction_helper_commits_on_ok() {
        let mut g = Grid::default();
        let r: Result<SquareId, GridError> = g.transaction(|g| {
            let a = g.insert_square(SquareBuilder::new())?;
            let b = g.insert_square(SquareBuilder::new())?;
            g.merge_squares(a, b, Direction::North)?;
            Ok(a)
        });
        let a = r.unwrap();
        assert!(!g.in_transaction());
        assert!(g.neighbour(a, Direction::North).unwrap().is_some());
    }

    #[test]
    fn transaction_helper_rolls_back_on_err() {
        let mut g = Grid::default();
        let a = square(&mut g, 20.0, 0);
        let r: Result<(), GridError> = g.transaction(|g| {
            let b = g.insert_square(SquareBuilder::new())?;
            g.merge_squares(a, b, Direction::North)?;
            g.merge_squares(a, a, Direction::East)?;
            Ok(())
        });
        assert!(r.is_err());
        assert_eq!(g.square_slots(), 1);
        assert_eq!(g.neighbour(a, Direction::North).unwrap(), None);
    }

    #[test]
    fn unbalanced_commit_is_an_error() {
        let mut g = Grid::default();
        assert_eq!(g.commit(), Err(GridError::NoTransaction));
        assert_eq!(g.rollback(), Err(GridError::NoTransaction));
    }
}
