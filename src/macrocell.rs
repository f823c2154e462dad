use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::Coord;
use crate::error::EngineError;
use crate::parse_util;
use crate::parse_util::ConvertError;
use crate::quadtree::Node;
use crate::quadtree::NodeStore;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// Level of the 8x8 leaf lines
const LEAF_LEVEL: u8 = 3;

/// Side of the 8x8 leaf lines
const LEAF_SIZE: Coord = 1 << LEAF_LEVEL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacrocellFile {
    /// The last node defined in the file
    pub root: Node,

    /// Rule given by a `#R` line
    pub rule: Option<RuleSet>,

    /// Generation count given by a `#G` line
    pub generation: Option<u128>,

    /// Number of nodes defined in the file
    pub nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacrocellError {
    #[error("Line {line}: {source}")]
    Line {
        line: usize,

        #[source]
        source: MacrocellLineError,
    },

    #[error("File does not define any node")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacrocellLineError {
    #[error("Illegal character '{got}' in leaf")]
    IllegalChar { got: char },

    #[error("Leaf cell ({x}, {y}) lies outside the 8x8 square")]
    IllegalCoordinates { x: Coord, y: Coord },

    #[error("Nodes must be at least level 1, got level {level}")]
    IllegalLevel { level: u8 },

    #[error("Missing {field}")]
    MissingField { field: &'static str },

    #[error("Invalid {field}: {source}")]
    Field {
        field: &'static str,

        #[source]
        source: ConvertError,
    },

    #[error("Unknown node index {index}")]
    UnknownIndex { index: usize },

    #[error("Child {index} has level {got}, expected {exp}")]
    ChildLevel { index: usize, got: u8, exp: u8 },

    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

enum MacrocellLine {
    /// Blank lines, `[M2]` style headers and comments
    Skip,
    Rule { rule: RuleSet },
    Generation { generation: u128 },
    Leaf { points: Vec<(Coord, Coord)> },
    Node { level: u8, children: [usize; 4] },
}

/// Parse the Golly macrocell format, interning every node it defines into `store`.
///
/// See: https://conwaylife.com/wiki/Macrocell
pub fn read_macrocell(
    mut bytes: &[u8],
    store: &mut NodeStore,
) -> Result<MacrocellFile, MacrocellError> {
    let mut rule = None;
    let mut generation = None;

    // `defined[i - 1]` is the node with index `i`
    let mut defined: Vec<Node> = Vec::new();
    let mut line_no = 0;

    while let (Some(line), rest) = parse_util::take_line(bytes) {
        bytes = rest;
        line_no += 1;

        let at_line = |source: MacrocellLineError| MacrocellError::Line {
            line: line_no,
            source,
        };

        match read_line(line).map_err(at_line)? {
            MacrocellLine::Skip => {}
            MacrocellLine::Rule { rule: r } => {
                if rule.is_some() {
                    warn!(line = line_no, "Macrocell rule already defined. Using latest");
                }

                rule = Some(r);
            }
            MacrocellLine::Generation { generation: g } => {
                if generation.is_some() {
                    warn!(
                        line = line_no,
                        "Macrocell generation already defined. Using latest"
                    );
                }

                generation = Some(g);
            }
            MacrocellLine::Leaf { points } => {
                let node = store
                    .construct_at_least(&points, LEAF_LEVEL)
                    .map_err(|e| at_line(e.into()))?;

                defined.push(node);
            }
            MacrocellLine::Node { level, children } => {
                let node = read_node(store, &defined, level, children).map_err(at_line)?;

                defined.push(node);
            }
        }
    }

    let Some(&root) = defined.last() else {
        return Err(MacrocellError::Empty);
    };

    debug!(
        nodes = defined.len(),
        level = store.level(root),
        population = %store.population(root),
        "Read macrocell"
    );

    Ok(MacrocellFile {
        root,
        rule,
        generation,
        nodes: defined.len(),
    })
}

fn read_line(line: &[u8]) -> Result<MacrocellLine, MacrocellLineError> {
    match parse_util::peek_1(line) {
        None | Some(b'[') => Ok(MacrocellLine::Skip),
        Some(b'#') => read_line_comment(line),
        Some(b'.' | b'*' | b'$') => read_line_leaf(line),
        Some(_) if parse_util::take_ws(line).is_empty() => Ok(MacrocellLine::Skip),
        Some(_) => read_line_node(line),
    }
}

/// `#R` and `#G` lines. Every other `#` line is a comment.
fn read_line_comment(line: &[u8]) -> Result<MacrocellLine, MacrocellLineError> {
    let Ok(line) = parse_util::expect(b'#', line) else {
        return Ok(MacrocellLine::Skip);
    };

    let (b, line) = parse_util::take_1(line);
    let line = parse_util::take_ws(line);

    match b {
        Some(b'R') => {
            let rule = parse_util::convert::<String>(line)
                .map_err(|source| MacrocellLineError::Field {
                    field: "rule",
                    source,
                })?
                .parse()?;

            Ok(MacrocellLine::Rule { rule })
        }
        Some(b'G') => {
            let (Some(generation), _) = parse_util::take_until_ws(line) else {
                return Err(MacrocellLineError::MissingField {
                    field: "generation",
                });
            };

            let generation = parse_util::convert(generation).map_err(|source| {
                MacrocellLineError::Field {
                    field: "generation",
                    source,
                }
            })?;

            Ok(MacrocellLine::Generation { generation })
        }
        _ => Ok(MacrocellLine::Skip),
    }
}

/// An 8x8 leaf: `.` is a dead cell, `*` a live one and `$` ends a row. The leaf ends at the
/// first whitespace or control byte.
fn read_line_leaf(line: &[u8]) -> Result<MacrocellLine, MacrocellLineError> {
    let mut points = Vec::new();
    let (mut x, mut y) = (0, 0);

    for &b in line.iter().take_while(|&&b| b > b' ') {
        match b {
            b'.' => x += 1,
            b'*' => {
                if x >= LEAF_SIZE || y >= LEAF_SIZE {
                    return Err(MacrocellLineError::IllegalCoordinates { x, y });
                }

                points.push((x, y));
                x += 1;
            }
            b'$' => {
                x = 0;
                y += 1;
            }
            b => return Err(MacrocellLineError::IllegalChar { got: b as char }),
        }
    }

    Ok(MacrocellLine::Leaf { points })
}

/// `level nw ne sw se`
fn read_line_node(line: &[u8]) -> Result<MacrocellLine, MacrocellLineError> {
    const FIELDS: [&str; 5] = ["level", "nw", "ne", "sw", "se"];

    let mut values = [0usize; 5];
    let mut line = line;

    for (value, field) in values.iter_mut().zip(FIELDS) {
        let (Some(bytes), rest) = parse_util::take_until_ws(parse_util::take_ws(line)) else {
            return Err(MacrocellLineError::MissingField { field });
        };

        *value = parse_util::convert(bytes)
            .map_err(|source| MacrocellLineError::Field { field, source })?;
        line = rest;
    }

    let [level, nw, ne, sw, se] = values;

    let level = u8::try_from(level).map_err(|_| MacrocellLineError::Field {
        field: "level",
        source: ConvertError::ParseError {
            str: level.to_string(),
        },
    })?;

    if level == 0 {
        return Err(MacrocellLineError::IllegalLevel { level });
    }

    Ok(MacrocellLine::Node {
        level,
        children: [nw, ne, sw, se],
    })
}

fn read_node(
    store: &mut NodeStore,
    defined: &[Node],
    level: u8,
    children: [usize; 4],
) -> Result<Node, MacrocellLineError> {
    let zero = store.get_zero(level - 1)?;

    let mut quad = [zero; 4];
    for (child, index) in quad.iter_mut().zip(children) {
        if index == 0 {
            continue;
        }

        let Some(&node) = defined.get(index - 1) else {
            return Err(MacrocellLineError::UnknownIndex { index });
        };

        let got = store.level(node);
        if got != level - 1 {
            return Err(MacrocellLineError::ChildLevel {
                index,
                got,
                exp: level - 1,
            });
        }

        *child = node;
    }

    let [nw, ne, sw, se] = quad;

    Ok(store.join(nw, ne, sw, se)?)
}
