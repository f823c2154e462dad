use crate::rule_set::B3S23;
use crate::rule_set::RuleSet;

/// Hard ceiling on the depth of a tree. A level-62 node is `2^62` cells on a side, so every cell
/// coordinate of the universe still fits in a [`Coord`](crate::Coord).
pub const MAX_DEPTH: u8 = 62;

/// Per-store engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Deepest level a node may reach. Joining past it fails with
    /// [`EngineError::DepthLimit`](crate::EngineError::DepthLimit).
    pub max_depth: u8,

    /// Cache successor results per `(node, step exponent)`. Trades memory for the amortized
    /// speedup on repeated sub-patterns.
    pub memoize: bool,

    /// Life rules
    pub rule: RuleSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            memoize: true,
            rule: B3S23,
        }
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH);
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn with_rule(mut self, rule: RuleSet) -> Self {
        self.rule = rule;
        self
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use super::MAX_DEPTH;

    #[test]
    fn max_depth_is_clamped() {
        let config = Config::default().with_max_depth(200);
        assert_eq!(config.max_depth, MAX_DEPTH);

        let config = Config::default().with_max_depth(10);
        assert_eq!(config.max_depth, 10);
    }
}
