use crate::Coord;
use crate::quadtree::Node;
use crate::quadtree::NodeStore;
use crate::viewport::Viewport;

impl NodeStore {
    /// Write the live cells of `node` into `viewport`, with the node's top-left cell placed at
    /// universe coordinate `(x, y)`.
    ///
    /// Cells outside the viewport are skipped. Empty subtrees and subtrees that miss the viewport
    /// are never visited, so the work done is bounded by what is visible rather than by the total
    /// population. Dead cells are left untouched; clear the viewport first if it is reused.
    pub fn expand(&self, node: Node, x: Coord, y: Coord, viewport: &mut Viewport) {
        if self.population(node) == 0 {
            return;
        }

        let level = self.level(node);
        if !viewport.intersects(x, y, 1 << level) {
            return;
        }

        let Some(quad) = self.children(node) else {
            viewport.set(x, y, true);
            return;
        };

        let half: Coord = 1 << (level - 1);

        self.expand(quad.nw, x, y, viewport);
        self.expand(quad.ne, x + half, y, viewport);
        self.expand(quad.sw, x, y + half, viewport);
        self.expand(quad.se, x + half, y + half, viewport);
    }
}
