use crate::Coord;
use crate::Population;

/// A handle to a canonical node owned by a [`NodeStore`](super::NodeStore).
///
/// Handles are stable indices assigned in creation order. Since every node is interned, two
/// handles from the same store are equal exactly when they describe the same subtree, so equality
/// and hashing are O(1).
///
/// Handles `0` and `1` are reserved for the two leaves, [`Node::DEAD`] and [`Node::ALIVE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node(pub(crate) u32);

impl Node {
    /// The dead level-0 cell
    pub const DEAD: Node = Node(0);

    /// The live level-0 cell
    pub const ALIVE: Node = Node(1);

    /// Check if the node is one of the two leaves.
    pub const fn is_leaf(self) -> bool {
        self.0 <= Node::ALIVE.0
    }

    /// The leaf for a cell state
    pub const fn leaf(alive: bool) -> Node {
        if alive { Node::ALIVE } else { Node::DEAD }
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the four quadrants of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// The quadrant holding `(x, y)` in a node whose quadrants are `half` cells on a side.
    pub fn containing(x: Coord, y: Coord, half: Coord) -> Self {
        match (x >= half, y >= half) {
            (false, false) => Quadrant::NorthWest,
            (true, false) => Quadrant::NorthEast,
            (false, true) => Quadrant::SouthWest,
            (true, true) => Quadrant::SouthEast,
        }
    }

    /// Offset of the quadrant's top-left cell from its parent's top-left cell.
    pub fn offset(self, half: Coord) -> (Coord, Coord) {
        match self {
            Quadrant::NorthWest => (0, 0),
            Quadrant::NorthEast => (half, 0),
            Quadrant::SouthWest => (0, half),
            Quadrant::SouthEast => (half, half),
        }
    }
}

/// The four children of a node, which is also the key nodes are interned under.
///
/// ```notrust
///  +----+----+
///  | nw | ne |
///  +----+----+
///  | sw | se |
///  +----+----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quad {
    pub nw: Node,
    pub ne: Node,
    pub sw: Node,
    pub se: Node,
}

impl Quad {
    pub const fn new(nw: Node, ne: Node, sw: Node, se: Node) -> Self {
        Self { nw, ne, sw, se }
    }

    /// A quad with the same node in every quadrant
    pub const fn splat(node: Node) -> Self {
        Self::new(node, node, node, node)
    }

    pub const fn get(&self, quadrant: Quadrant) -> Node {
        match quadrant {
            Quadrant::NorthWest => self.nw,
            Quadrant::NorthEast => self.ne,
            Quadrant::SouthWest => self.sw,
            Quadrant::SouthEast => self.se,
        }
    }

    /// Copy of `self` with `quadrant` replaced by `node`.
    pub const fn with(mut self, quadrant: Quadrant, node: Node) -> Self {
        match quadrant {
            Quadrant::NorthWest => self.nw = node,
            Quadrant::NorthEast => self.ne = node,
            Quadrant::SouthWest => self.sw = node,
            Quadrant::SouthEast => self.se = node,
        }

        self
    }

    pub const fn to_array(self) -> [Node; 4] {
        [self.nw, self.ne, self.sw, self.se]
    }
}

/// What the store keeps for every canonical node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeData {
    /// Level `k` is a square of `2^k` cells on a side. Leaves are level 0.
    pub level: u8,

    /// Number of live leaves beneath the node
    pub population: Population,

    /// `None` for the two leaves
    pub quad: Option<Quad>,
}

impl NodeData {
    pub const fn leaf(alive: bool) -> Self {
        Self {
            level: 0,
            population: alive as Population,
            quad: None,
        }
    }
}
