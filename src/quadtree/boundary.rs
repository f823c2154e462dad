use crate::error::EngineError;
use crate::error::EngineResult;
use crate::quadtree::Node;
use crate::quadtree::NodeStore;

/// Smallest level `pad` and `crop` produce.
const MIN_PADDED_LEVEL: u8 = 3;

// Every operation here keeps the node's centre point fixed in universe coordinates.
impl NodeStore {
    /// Whether the live cells of `node` all sit in its central `2^(k-2)` square, i.e. each corner
    /// quadrant only has population in its innermost grandchild:
    ///
    /// ```notrust
    ///  +---+---+---+---+
    ///  |   |   |   |   |
    ///  +---+---+---+---+
    ///  |   | x | x |   |
    ///  +---+---+---+---+
    ///  |   | x | x |   |
    ///  +---+---+---+---+
    ///  |   |   |   |   |
    ///  +---+---+---+---+
    /// ```
    ///
    /// Always false below level 3.
    pub fn is_padded(&self, node: Node) -> bool {
        if self.level(node) < MIN_PADDED_LEVEL {
            return false;
        }

        let q = self.quad(node);
        let (nw, ne, sw, se) = (
            self.quad(q.nw),
            self.quad(q.ne),
            self.quad(q.sw),
            self.quad(q.se),
        );

        self.population(q.nw) == self.population(self.quad(nw.se).se)
            && self.population(q.ne) == self.population(self.quad(ne.sw).sw)
            && self.population(q.sw) == self.population(self.quad(sw.ne).ne)
            && self.population(q.se) == self.population(self.quad(se.nw).nw)
    }

    /// The centred node one level down.
    pub fn inner(&mut self, node: Node) -> EngineResult<Node> {
        let level = self.level(node);
        if level < 2 {
            return Err(EngineError::LevelTooSmall {
                operation: "inner",
                level,
                min: 2,
            });
        }

        let q = self.quad(node);
        let (nw, ne, sw, se) = (
            self.quad(q.nw),
            self.quad(q.ne),
            self.quad(q.sw),
            self.quad(q.se),
        );

        self.join(nw.se, ne.sw, sw.ne, se.nw)
    }

    /// Embed `node` in the middle of an empty node one level up.
    pub fn centre(&mut self, node: Node) -> EngineResult<Node> {
        let level = self.level(node);
        if level < 1 {
            return Err(EngineError::LevelTooSmall {
                operation: "centre",
                level,
                min: 1,
            });
        }

        let q = self.quad(node);
        let z = self.get_zero(level - 1)?;

        let nw = self.join(z, z, z, q.nw)?;
        let ne = self.join(z, z, q.ne, z)?;
        let sw = self.join(z, q.sw, z, z)?;
        let se = self.join(q.se, z, z, z)?;

        self.join(nw, ne, sw, se)
    }

    /// Centre `node` until it is padded, so that a step cannot push live cells past its edge.
    pub fn pad(&mut self, mut node: Node) -> EngineResult<Node> {
        while !self.is_padded(node) {
            node = self.centre(node)?;
        }

        Ok(node)
    }

    /// Shrink `node` to the smallest centred node of level at least 3 that still holds all of
    /// its live cells. Nodes below level 3 are centred up to it.
    pub fn crop(&mut self, mut node: Node) -> EngineResult<Node> {
        while self.level(node) < MIN_PADDED_LEVEL {
            node = self.centre(node)?;
        }

        while self.level(node) > MIN_PADDED_LEVEL {
            let inner = self.inner(node)?;
            if self.population(inner) != self.population(node) {
                break;
            }

            node = inner;
        }

        Ok(node)
    }
}

#[cfg(test)]
mod test {
    use crate::error::EngineError;
    use crate::quadtree::Node;
    use crate::quadtree::NodeStore;

    #[test]
    fn centre_then_inner() {
        let mut store = NodeStore::new();

        let node = store.construct(&[(0, 0), (3, 1), (2, 3)]).unwrap();
        let centred = store.centre(node).unwrap();

        assert_eq!(store.level(centred), 3);
        assert_eq!(store.population(centred), 3);
        assert_eq!(store.inner(centred).unwrap(), node);

        // (0, 0) moved to the middle of the 8x8
        assert!(store.cell(centred, 2, 2).unwrap());
        assert!(store.cell(centred, 5, 3).unwrap());
        assert!(store.cell(centred, 4, 5).unwrap());
    }

    #[test]
    fn centre_of_a_leaf() {
        let mut store = NodeStore::new();

        assert_eq!(
            store.centre(Node::ALIVE).unwrap_err(),
            EngineError::LevelTooSmall {
                operation: "centre",
                level: 0,
                min: 1
            }
        );
    }

    #[test]
    fn small_nodes_are_never_padded() {
        let mut store = NodeStore::new();

        let z = store.get_zero(2).unwrap();
        assert!(!store.is_padded(z));

        let z = store.get_zero(3).unwrap();
        assert!(store.is_padded(z));
    }

    #[test]
    fn pad_corner_cell() {
        let mut store = NodeStore::new();

        let node = store.construct(&[(0, 0), (7, 7)]).unwrap();
        assert!(!store.is_padded(node));

        let padded = store.pad(node).unwrap();
        assert!(store.is_padded(padded));
        assert_eq!(store.population(padded), 2);

        // One centre leaves the corners in the outer ring, the second one clears it
        assert_eq!(store.level(padded), 5);
    }

    #[test]
    fn crop_undoes_pad() {
        let mut store = NodeStore::new();

        let patterns: [&[(i64, i64)]; 4] = [
            &[(0, 0)],
            &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            &[(0, 0), (7, 7)],
            &[(3, 3), (4, 4)],
        ];

        for points in patterns {
            let node = store.construct(points).unwrap();
            let cropped = store.crop(node).unwrap();

            let mut padded = node;
            for _ in 0..4 {
                padded = store.pad(padded).unwrap();
                assert!(store.is_padded(padded));
                assert_eq!(store.crop(padded).unwrap(), cropped, "{points:?}");

                padded = store.centre(padded).unwrap();
            }
        }
    }

    #[test]
    fn crop_keeps_population_and_centre() {
        let mut store = NodeStore::new();

        // One cell outside the central 8x8
        let node = store.construct(&[(7, 7), (8, 8), (15, 0)]).unwrap();
        let cropped = store.crop(node).unwrap();
        assert_eq!(cropped, node);

        let node = store.construct(&[(7, 7), (8, 8), (9, 9)]).unwrap();
        let node = store.centre(node).unwrap();
        let cropped = store.crop(node).unwrap();

        assert_eq!(store.level(cropped), 3);
        assert_eq!(store.population(cropped), 3);
        // The 32x32 centre (16, 16) maps to the 8x8 centre (4, 4)
        assert!(store.cell(cropped, 3, 3).unwrap());
        assert!(store.cell(cropped, 4, 4).unwrap());
        assert!(store.cell(cropped, 5, 5).unwrap());
    }
}
