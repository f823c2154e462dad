pub mod config;
pub mod error;
pub mod hashlife;
pub mod macrocell;
pub mod quadtree;
pub mod rule_set;
pub mod simulation;
pub mod viewport;

mod parse_util;

pub use config::Config;
pub use error::EngineError;
pub use error::EngineResult;
pub use error::ErrorKind;
pub use quadtree::Node;
pub use quadtree::NodeStore;
pub use quadtree::Quad;
pub use quadtree::Quadrant;
pub use rule_set::RuleSet;
pub use simulation::Simulation;
pub use viewport::Viewport;

/// Universe cell coordinate. `x` grows to the right, `y` grows downwards.
pub type Coord = i64;

/// Number of live cells beneath a node
pub type Population = u128;
