use tracing::debug;
use tracing::debug_span;

use crate::error::EngineError;
use crate::error::EngineResult;
use crate::quadtree::Node;
use crate::quadtree::NodeStore;

impl NodeStore {
    /// Next state of the centre cell of a 3x3 neighbourhood of leaves, given row by row.
    pub fn life(&self, cells: [Node; 9]) -> Node {
        let neighbours = cells
            .iter()
            .enumerate()
            .filter(|&(i, &cell)| i != 4 && cell == Node::ALIVE)
            .count() as u32;

        Node::leaf(self.rule().next(cells[4] == Node::ALIVE, neighbours))
    }

    /// One generation of the central 2x2 of a level 2 node.
    ///
    /// ```notrust
    ///  +----+----+----+----+
    ///  | nw | ne | nw | ne |
    ///  +--- a ---+--- b ---+
    ///  | sw | se | sw | se |
    ///  +----+----+----+----+
    ///  | nw | ne | nw | ne |
    ///  +--- c ---+--- d ---+
    ///  | sw | se | sw | se |
    ///  +----+----+----+----+
    /// ```
    ///
    /// Each of `a.se`, `b.sw`, `c.ne` and `d.nw` is computed from the 3x3 window around it.
    pub fn life4x4(&mut self, node: Node) -> EngineResult<Node> {
        let level = self.level(node);
        if level != 2 {
            return Err(EngineError::WrongLevel {
                operation: "life4x4",
                level,
                exp: 2,
            });
        }

        let q = self.quad(node);
        let (a, b, c, d) = (
            self.quad(q.nw),
            self.quad(q.ne),
            self.quad(q.sw),
            self.quad(q.se),
        );

        let nw = self.life([
            a.nw, a.ne, b.nw, //
            a.sw, a.se, b.sw, //
            c.nw, c.ne, d.nw,
        ]);
        let ne = self.life([
            a.ne, b.nw, b.ne, //
            a.se, b.sw, b.se, //
            c.ne, d.nw, d.ne,
        ]);
        let sw = self.life([
            a.sw, a.se, b.sw, //
            c.nw, c.ne, d.nw, //
            c.sw, c.se, d.sw,
        ]);
        let se = self.life([
            a.se, b.sw, b.se, //
            c.ne, d.nw, d.ne, //
            c.se, d.sw, d.se,
        ]);

        self.join(nw, ne, sw, se)
    }

    /// The centre half of `node`, `2^min(j, k - 2)` generations later, where `k` is the level
    /// of `node`.
    ///
    /// The node is split into nine overlapping sub-squares one level down, each of which is
    /// stepped recursively. For a full `2^(k-2)` step their results are regrouped into four
    /// squares and stepped once more; for a smaller step the centres are joined as-is.
    pub fn successor(&mut self, node: Node, j: u8) -> EngineResult<Node> {
        let level = self.level(node);
        if level < 2 {
            return Err(EngineError::LevelTooSmall {
                operation: "successor",
                level,
                min: 2,
            });
        }

        let j = j.min(level - 2);
        let q = self.quad(node);

        if self.population(node) == 0 {
            return Ok(q.nw);
        }

        if self.config().memoize {
            if let Some(&result) = self.results.get(&(node, j)) {
                return Ok(result);
            }
        }

        let result = if level == 2 {
            self.life4x4(node)?
        } else {
            self.successor_split(node, j)?
        };

        if self.config().memoize {
            self.results.insert((node, j), result);
        }

        Ok(result)
    }

    fn successor_split(&mut self, node: Node, j: u8) -> EngineResult<Node> {
        let level = self.level(node);
        let q = self.quad(node);
        let (a, b, c, d) = (
            self.quad(q.nw),
            self.quad(q.ne),
            self.quad(q.sw),
            self.quad(q.se),
        );

        // The nine overlapping sub-squares, row by row
        let n1 = q.nw;
        let n2 = self.join(a.ne, b.nw, a.se, b.sw)?;
        let n3 = q.ne;
        let n4 = self.join(a.sw, a.se, c.nw, c.ne)?;
        let n5 = self.join(a.se, b.sw, c.ne, d.nw)?;
        let n6 = self.join(b.sw, b.se, d.nw, d.ne)?;
        let n7 = q.sw;
        let n8 = self.join(c.ne, d.nw, c.se, d.sw)?;
        let n9 = q.se;

        let mut stepped = [Node::DEAD; 9];
        for (result, sub) in stepped.iter_mut().zip([n1, n2, n3, n4, n5, n6, n7, n8, n9]) {
            *result = self.successor(sub, j)?;
        }

        let [c1, c2, c3, c4, c5, c6, c7, c8, c9] = stepped;

        if j < level - 2 {
            // Already 2^j generations ahead, only the centres are left to pick
            let [c1, c2, c3, c4, c5, c6, c7, c8, c9] = stepped.map(|n| self.quad(n));

            let nw = self.join(c1.se, c2.sw, c4.ne, c5.nw)?;
            let ne = self.join(c2.se, c3.sw, c5.ne, c6.nw)?;
            let sw = self.join(c4.se, c5.sw, c7.ne, c8.nw)?;
            let se = self.join(c5.se, c6.sw, c8.ne, c9.nw)?;

            self.join(nw, ne, sw, se)
        } else {
            let nw = self.join(c1, c2, c4, c5)?;
            let ne = self.join(c2, c3, c5, c6)?;
            let sw = self.join(c4, c5, c7, c8)?;
            let se = self.join(c5, c6, c8, c9)?;

            let nw = self.successor(nw, j)?;
            let ne = self.successor(ne, j)?;
            let sw = self.successor(sw, j)?;
            let se = self.successor(se, j)?;

            self.join(nw, ne, sw, se)
        }
    }

    /// Advance `node` by exactly `generations` generations.
    ///
    /// The centre point of `node` stays fixed in universe coordinates, and the result is cropped
    /// (see [`NodeStore::crop`]). Zero generations returns `node` itself.
    pub fn advance(&mut self, node: Node, generations: u64) -> EngineResult<Node> {
        if generations == 0 {
            return Ok(node);
        }

        let _span = debug_span!("advance", generations).entered();

        let bits = u64::BITS - generations.leading_zeros();

        let mut node = self.pad(node)?;
        for _ in 0..=bits {
            node = self.centre(node)?;
        }

        for j in (0..bits as u8).rev() {
            if (generations >> j) & 1 == 0 {
                continue;
            }

            // Live cells must not reach the edge of the result within 2^j generations
            while self.level(node) < j + 3 || !self.is_padded(node) {
                node = self.centre(node)?;
            }

            node = self.successor(node, j)?;
        }

        let node = self.crop(node)?;

        debug!(
            level = self.level(node),
            population = %self.population(node),
            nodes = self.len(),
            "Advanced"
        );

        Ok(node)
    }
}
