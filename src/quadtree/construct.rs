use std::collections::BTreeMap;
use std::collections::HashSet;

use tracing::debug;

use crate::Coord;
use crate::error::EngineError;
use crate::error::EngineResult;
use crate::quadtree::Node;
use crate::quadtree::NodeStore;
use crate::quadtree::Quad;

/// Smallest root `construct` hands out. A 4x4 node is the smallest one that can be stepped.
pub const MIN_ROOT_LEVEL: u8 = 2;

/// Where a sub-pattern sits while the tree is grouped bottom-up. `(x, y)` is measured in units of
/// the current level's side length.
#[derive(Debug, Clone, Copy)]
struct MapNode {
    x: Coord,
    y: Coord,
    node: Node,
}

impl NodeStore {
    /// Build the canonical tree holding exactly the live cells `points`.
    ///
    /// The root's top-left cell is `(0, 0)`; coordinates are not translated. The root is the
    /// smallest square of level at least [`MIN_ROOT_LEVEL`] that covers every point.
    pub fn construct(&mut self, points: &[(Coord, Coord)]) -> EngineResult<Node> {
        self.construct_at_least(points, MIN_ROOT_LEVEL)
    }

    pub(crate) fn construct_at_least(
        &mut self,
        points: &[(Coord, Coord)],
        min_level: u8,
    ) -> EngineResult<Node> {
        let mut seen = HashSet::with_capacity(points.len());
        let mut pattern = Vec::with_capacity(points.len());

        for &(x, y) in points {
            if x < 0 || y < 0 {
                return Err(EngineError::NegativeCoordinate { x, y });
            }

            if !seen.insert((x, y)) {
                return Err(EngineError::DuplicatePoint { x, y });
            }

            pattern.push(MapNode {
                x,
                y,
                node: Node::ALIVE,
            });
        }

        if pattern.is_empty() {
            return self.get_zero(min_level);
        }

        let mut level = 0;

        loop {
            // Done once a single node is left, anchored at the origin
            if let [root] = pattern.as_slice() {
                if level >= min_level && root.x == 0 && root.y == 0 {
                    debug!(points = points.len(), level, "Constructed pattern");
                    return Ok(root.node);
                }
            }

            let z = self.get_zero(level)?;

            // Group by 2x2 block, keyed by the block's coordinates one level up
            let mut blocks: BTreeMap<(Coord, Coord), Quad> = BTreeMap::new();
            for MapNode { x, y, node } in pattern.drain(..) {
                let quad = blocks.entry((x >> 1, y >> 1)).or_insert(Quad::splat(z));

                match (x & 1, y & 1) {
                    (0, 0) => quad.nw = node,
                    (1, 0) => quad.ne = node,
                    (0, 1) => quad.sw = node,
                    _ => quad.se = node,
                }
            }

            for ((x, y), quad) in blocks {
                let node = self.intern(quad)?;
                pattern.push(MapNode { x, y, node });
            }

            level += 1;
        }
    }
}
