use crate::Coord;
use crate::error::EngineError;
use crate::error::EngineResult;
use crate::quadtree::Node;
use crate::quadtree::NodeStore;
use crate::quadtree::Quad;
use crate::quadtree::Quadrant;

impl NodeStore {
    fn check_bounds(&self, root: Node, x: Coord, y: Coord) -> EngineResult<()> {
        let level = self.level(root);
        let side = 1 << level;

        if !(0..side).contains(&x) || !(0..side).contains(&y) {
            return Err(EngineError::OutOfBounds { x, y, level });
        }

        Ok(())
    }

    /// Toggle the cell at `(x, y)`, relative to the top-left of `root`, and return the new root.
    ///
    /// `root` itself is untouched. Only the nodes on the path down to the cell are rebuilt, so
    /// at most `level(root)` nodes are created.
    pub fn mark(&mut self, root: Node, x: Coord, y: Coord) -> EngineResult<Node> {
        self.check_bounds(root, x, y)?;

        let mut path: Vec<(Quad, Quadrant)> = Vec::with_capacity(self.level(root) as usize);
        let (mut node, mut x, mut y) = (root, x, y);

        while let Some(quad) = self.children(node) {
            let half = 1 << (self.level(node) - 1);
            let quadrant = Quadrant::containing(x, y, half);
            let (dx, dy) = quadrant.offset(half);

            path.push((quad, quadrant));

            node = quad.get(quadrant);
            x -= dx;
            y -= dy;
        }

        let mut node = Node::leaf(node == Node::DEAD);

        for (quad, quadrant) in path.into_iter().rev() {
            node = self.intern(quad.with(quadrant, node))?;
        }

        Ok(node)
    }

    /// Whether the cell at `(x, y)`, relative to the top-left of `root`, is alive.
    pub fn cell(&self, root: Node, x: Coord, y: Coord) -> EngineResult<bool> {
        self.check_bounds(root, x, y)?;

        let (mut node, mut x, mut y) = (root, x, y);

        while let Some(quad) = self.children(node) {
            if self.population(node) == 0 {
                return Ok(false);
            }

            let half = 1 << (self.level(node) - 1);
            let quadrant = Quadrant::containing(x, y, half);
            let (dx, dy) = quadrant.offset(half);

            node = quad.get(quadrant);
            x -= dx;
            y -= dy;
        }

        Ok(node == Node::ALIVE)
    }
}
