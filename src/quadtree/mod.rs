use std::collections::HashMap;

use tracing::debug;
use tracing::trace;

use crate::Population;
use crate::config::Config;
use crate::error::EngineError;
use crate::error::EngineResult;
use crate::rule_set::RuleSet;

pub use crate::quadtree::construct::MIN_ROOT_LEVEL;
pub use crate::quadtree::node::Node;
pub use crate::quadtree::node::Quad;
pub use crate::quadtree::node::Quadrant;

use crate::quadtree::node::NodeData;

mod boundary;
mod construct;
mod expand;
mod mutate;
mod node;

/// Owns every node of a universe and guarantees that each 4-child tuple has exactly one node.
///
/// All node creation goes through [`NodeStore::intern`]. Nodes are never freed, so a [`Node`]
/// handle stays valid for as long as its store lives. Handles must only be used with the store
/// that created them.
pub struct NodeStore {
    config: Config,

    /// This is where all of our memory goes. Indexed by [`Node`].
    nodes: Vec<NodeData>,

    /// Canonical node for each quad
    index: HashMap<Quad, Node>,

    /// `zeros[k]` is the empty node of level `k`
    zeros: Vec<Node>,

    /// Memoized successors, keyed by node and clamped step exponent
    pub(crate) results: HashMap<(Node, u8), Node>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let config = config.with_max_depth(config.max_depth);

        Self {
            config,
            nodes: vec![NodeData::leaf(false), NodeData::leaf(true)],
            index: HashMap::new(),
            zeros: vec![Node::DEAD],
            results: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rule(&self) -> RuleSet {
        self.config.rule
    }

    /// Switch to another rule. Memoized successors were computed under the old rule, so they
    /// are dropped.
    pub fn set_rule(&mut self, rule: RuleSet) {
        if rule == self.config.rule {
            return;
        }

        debug!(%rule, cached = self.results.len(), "Changing rule");

        self.config.rule = rule;
        self.results.clear();
    }

    /// Number of canonical nodes, leaves included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn data(&self, node: Node) -> &NodeData {
        &self.nodes[node.index()]
    }

    pub fn level(&self, node: Node) -> u8 {
        self.data(node).level
    }

    pub fn population(&self, node: Node) -> Population {
        self.data(node).population
    }

    /// The four children of `node`, or `None` for a leaf.
    pub fn children(&self, node: Node) -> Option<Quad> {
        self.data(node).quad
    }

    /// Like [`NodeStore::children`], for nodes the caller already knows are above level 0.
    pub(crate) fn quad(&self, node: Node) -> Quad {
        match self.data(node).quad {
            Some(quad) => quad,
            None => panic!("leaf {node:?} has no quadrants"),
        }
    }

    /// Return the canonical node for `quad`, creating it if this is the first time it is seen.
    pub fn intern(&mut self, quad: Quad) -> EngineResult<Node> {
        if let Some(&node) = self.index.get(&quad) {
            return Ok(node);
        }

        let levels = quad.to_array().map(|child| self.level(child));
        if levels.iter().any(|&level| level != levels[0]) {
            return Err(EngineError::LevelMismatch { levels });
        }

        let level = levels[0] + 1;
        if level > self.config.max_depth {
            return Err(EngineError::DepthLimit {
                level,
                max: self.config.max_depth,
            });
        }

        let id = u32::try_from(self.nodes.len()).map_err(|_| EngineError::NodeTableFull)?;
        let node = Node(id);
        let population = quad
            .to_array()
            .iter()
            .map(|&child| self.population(child))
            .sum();

        self.nodes.push(NodeData {
            level,
            population,
            quad: Some(quad),
        });

        let previous = self.index.insert(quad, node);
        assert!(
            previous.is_none(),
            "two canonical nodes for {quad:?}: {previous:?} and {node:?}"
        );

        trace!(?node, level, population = %population, "Created node");

        Ok(node)
    }

    /// Canonical node with quadrants `nw`, `ne`, `sw` and `se`.
    pub fn join(&mut self, nw: Node, ne: Node, sw: Node, se: Node) -> EngineResult<Node> {
        self.intern(Quad::new(nw, ne, sw, se))
    }

    /// The empty node of level `level`.
    pub fn get_zero(&mut self, level: u8) -> EngineResult<Node> {
        while self.zeros.len() <= level as usize {
            let z = self.zeros[self.zeros.len() - 1];
            let next = self.intern(Quad::splat(z))?;
            self.zeros.push(next);
        }

        Ok(self.zeros[level as usize])
    }
}
