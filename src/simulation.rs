use tracing::debug;
use tracing::info;

use crate::Coord;
use crate::Population;
use crate::config::Config;
use crate::error::EngineResult;
use crate::quadtree::Node;
use crate::quadtree::NodeStore;
use crate::rule_set::RuleSet;
use crate::viewport::Viewport;

/// Largest base step, so that one step still fits a `u64` generation count
const MAX_BASE_STEP: u8 = u64::BITS as u8 - 1;

/// A universe being simulated: the store, the current root and where that root sits.
///
/// The root is positioned by the universe coordinate of its top-left cell. Advancing keeps the
/// root's centre point fixed, so the origin moves whenever the root grows or shrinks.
pub struct Simulation {
    store: NodeStore,
    root: Node,

    /// Universe coordinate of the root's top-left cell
    origin: (Coord, Coord),

    /// Generations simulated so far
    generation: u128,

    /// One [`Simulation::step`] advances `2^base_step` generations
    base_step: u8,
}

impl Simulation {
    /// Create an empty 8x8 universe with its top-left cell at the origin.
    pub fn new(config: Config) -> EngineResult<Self> {
        let mut store = NodeStore::with_config(config);
        let root = store.get_zero(3)?;

        Self::from_root(store, root)
    }

    /// Create a universe holding the live cells `points`, in universe coordinates.
    pub fn from_points(config: Config, points: &[(Coord, Coord)]) -> EngineResult<Self> {
        let mut store = NodeStore::with_config(config);
        let root = store.construct(points)?;

        Self::from_root(store, root)
    }

    /// Wrap a root built elsewhere in `store`, with its top-left cell at the origin. A leaf is
    /// placed in the top-left of a 2x2.
    pub fn from_root(mut store: NodeStore, root: Node) -> EngineResult<Self> {
        let root = if root.is_leaf() {
            store.join(root, Node::DEAD, Node::DEAD, Node::DEAD)?
        } else {
            root
        };

        Ok(Self {
            store,
            root,
            origin: (0, 0),
            generation: 0,
            base_step: 0,
        })
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn root(&self) -> Node {
        self.root
    }

    pub fn level(&self) -> u8 {
        self.store.level(self.root)
    }

    pub fn population(&self) -> Population {
        self.store.population(self.root)
    }

    pub fn generation(&self) -> u128 {
        self.generation
    }

    /// Start counting generations from `generation`, e.g. for a pattern saved mid-run.
    pub fn set_generation(&mut self, generation: u128) {
        self.generation = generation;
    }

    pub fn origin(&self) -> (Coord, Coord) {
        self.origin
    }

    pub fn base_step(&self) -> u8 {
        self.base_step
    }

    pub fn set_rule(&mut self, rule: RuleSet) {
        self.store.set_rule(rule);
    }

    /// Half the side of the root
    fn half(&self) -> Coord {
        1 << (self.level() - 1)
    }

    fn centre(&self) -> (Coord, Coord) {
        let half = self.half();
        (self.origin.0 + half, self.origin.1 + half)
    }

    /// Advance the universe by `generations`.
    pub fn advance(&mut self, generations: u64) -> EngineResult<()> {
        let (cx, cy) = self.centre();

        self.root = self.store.advance(self.root, generations)?;

        let half = self.half();
        self.origin = (cx - half, cy - half);
        self.generation += u128::from(generations);

        debug!(
            generation = %self.generation,
            level = self.level(),
            population = %self.population(),
            "Simulation advanced"
        );

        Ok(())
    }

    /// Advance the universe by `2^base_step` generations.
    pub fn step(&mut self) -> EngineResult<()> {
        self.advance(1 << self.base_step)
    }

    pub fn increase_base_step(&mut self) {
        self.base_step = (self.base_step + 1).min(MAX_BASE_STEP);
    }

    pub fn decrease_base_step(&mut self) {
        self.base_step = self.base_step.saturating_sub(1);
    }

    /// Position of universe cell `(x, y)` within the root, if the root holds it.
    fn offset(&self, x: Coord, y: Coord) -> Option<(Coord, Coord)> {
        let side = 2 * self.half();
        let dx = x.checked_sub(self.origin.0)?;
        let dy = y.checked_sub(self.origin.1)?;

        ((0..side).contains(&dx) && (0..side).contains(&dy)).then_some((dx, dy))
    }

    /// Toggle universe cell `(x, y)`, growing the universe until it holds the cell.
    pub fn toggle(&mut self, x: Coord, y: Coord) -> EngineResult<()> {
        let (dx, dy) = loop {
            if let Some(offset) = self.offset(x, y) {
                break offset;
            }

            let half = self.half();

            info!(level = self.level() + 1, "Expanding universe");

            self.root = self.store.centre(self.root)?;
            self.origin = (self.origin.0 - half, self.origin.1 - half);
        };

        self.root = self.store.mark(self.root, dx, dy)?;

        Ok(())
    }

    /// Whether universe cell `(x, y)` is alive. Everything outside the root is dead.
    pub fn cell(&self, x: Coord, y: Coord) -> bool {
        let Some((dx, dy)) = self.offset(x, y) else {
            return false;
        };

        self.store.cell(self.root, dx, dy).unwrap_or(false)
    }

    /// Kill every cell. The universe keeps its size and generation count.
    pub fn clear(&mut self) -> EngineResult<()> {
        self.root = self.store.get_zero(self.level())?;
        Ok(())
    }

    /// Redraw `viewport` from the current universe.
    pub fn expand(&self, viewport: &mut Viewport) {
        viewport.clear();
        self.store
            .expand(self.root, self.origin.0, self.origin.1, viewport);
    }
}

#[cfg(test)]
mod test {
    use super::Simulation;
    use crate::Coord;
    use crate::config::Config;
    use crate::error::EngineError;
    use crate::viewport::Viewport;

    #[test]
    fn toggle_grows_the_universe() {
        let mut sim = Simulation::new(Config::default()).unwrap();
        assert_eq!(sim.level(), 3);

        sim.toggle(3, 3).unwrap();
        assert_eq!(sim.level(), 3);

        sim.toggle(-1, 9).unwrap();
        assert_eq!(sim.level(), 4);
        assert_eq!(sim.origin(), (-4, -4));

        sim.toggle(-30, 0).unwrap();
        assert_eq!(sim.level(), 7);
        assert_eq!(sim.origin(), (-60, -60));

        assert_eq!(sim.population(), 3);
        assert!(sim.cell(3, 3));
        assert!(sim.cell(-1, 9));
        assert!(sim.cell(-30, 0));
        assert!(!sim.cell(0, 0));
        assert!(!sim.cell(1000, 1000));

        sim.toggle(3, 3).unwrap();
        assert!(!sim.cell(3, 3));
        assert_eq!(sim.population(), 2);
    }

    #[test]
    fn toggle_far_cell_hits_depth_limit() {
        let mut sim = Simulation::new(Config::default().with_max_depth(10)).unwrap();

        let err = sim.toggle(Coord::MAX, 0).unwrap_err();
        assert_eq!(err, EngineError::DepthLimit { level: 11, max: 10 });
        assert_eq!(sim.level(), 10);
        assert_eq!(sim.population(), 0);

        let mut sim = Simulation::new(Config::default()).unwrap();
        let err = sim.toggle(Coord::MAX, Coord::MAX).unwrap_err();
        assert_eq!(err, EngineError::DepthLimit { level: 63, max: 62 });
    }

    #[test]
    fn far_cells_are_dead() {
        let mut sim = Simulation::new(Config::default()).unwrap();
        sim.toggle(-1, -1).unwrap();

        assert!(sim.cell(-1, -1));
        assert!(!sim.cell(Coord::MAX, 0));
        assert!(!sim.cell(0, Coord::MAX));
        assert!(!sim.cell(Coord::MIN, Coord::MIN));
    }

    #[test]
    fn glider_moves_down_right() {
        let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        let mut sim = Simulation::from_points(Config::default(), &glider).unwrap();

        sim.advance(4).unwrap();

        assert_eq!(sim.generation(), 4);
        assert_eq!(sim.population(), 5);
        for (x, y) in glider {
            assert!(sim.cell(x + 1, y + 1), "({x}, {y})");
        }
    }

    #[test]
    fn base_step() {
        let mut sim = Simulation::from_points(Config::default(), &[(0, 1), (1, 1), (2, 1)])
            .unwrap();

        sim.decrease_base_step();
        assert_eq!(sim.base_step(), 0);

        sim.step().unwrap();
        assert_eq!(sim.generation(), 1);
        assert!(sim.cell(1, 0) && sim.cell(1, 1) && sim.cell(1, 2));

        sim.increase_base_step();
        sim.increase_base_step();
        sim.step().unwrap();
        assert_eq!(sim.generation(), 5);
        assert!(sim.cell(1, 0) && sim.cell(1, 1) && sim.cell(1, 2));

        for _ in 0..100 {
            sim.increase_base_step();
        }
        assert_eq!(sim.base_step(), 63);
    }

    #[test]
    fn clear_keeps_size() {
        let mut sim = Simulation::from_points(Config::default(), &[(0, 0), (12, 3)]).unwrap();
        sim.advance(2).unwrap();

        let level = sim.level();
        sim.clear().unwrap();

        assert_eq!(sim.population(), 0);
        assert_eq!(sim.level(), level);
        assert_eq!(sim.generation(), 2);
    }

    #[test]
    fn expand_at_origin() {
        let mut sim = Simulation::new(Config::default()).unwrap();
        sim.toggle(-2, -1).unwrap();
        sim.toggle(1, 1).unwrap();

        let mut view = Viewport::new(-3, -3, 6, 6);
        view.set(0, 0, true);
        sim.expand(&mut view);

        assert_eq!(view.live_cells().collect::<Vec<_>>(), [(-2, -1), (1, 1)]);
    }
}
