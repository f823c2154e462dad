use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b/s:                  0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    ///
    /// Big endian is used here (i.e. `b = 0b1` means b1, and `b = 0b1_0000_0000` means b8).
    ///
    /// The engine assumes dead space stays dead, so `b` should not include 0. Parsing rejects
    /// such rules with [`RuleError::UnsupportedB0`].
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Whether a cell is alive in the next generation, given its current state and its number of
    /// live neighbours.
    pub fn next(&self, alive: bool, neighbours: u32) -> bool {
        if neighbours > 8 {
            return false;
        }

        let set = if alive {
            self.survivals()
        } else {
            self.births()
        };

        set & (1 << neighbours) != 0
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({self})")
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |set: u16| -> String {
            (0u8..=8)
                .filter(|&n| set & (1u16 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Empty rule")]
    Empty,

    #[error("Expected 'B' before the birth counts")]
    MissingBirth,

    #[error("Expected 'S' before the survival counts")]
    MissingSurvival,

    #[error("Invalid neighbour count '{got}'")]
    InvalidCount { got: char },

    #[error("Unexpected character '{got}'")]
    UnexpectedChar { got: char },

    /// Empty space must stay empty for the dead padding around every node to be correct.
    #[error("Rules with birth on 0 neighbours are not supported")]
    UnsupportedB0,
}

/// Parses rules that look like `B3/S23` or `b3s23`.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[derive(Clone, Copy)]
        enum State {
            Start,
            Birth,
            Survival,
        }

        let rule = s.trim();
        if rule.is_empty() {
            return Err(RuleError::Empty);
        }

        let count = |c: char| match c.to_digit(10) {
            Some(n) if n <= 8 => Ok(1u16 << n),
            _ => Err(RuleError::InvalidCount { got: c }),
        };

        let mut state = State::Start;
        let (mut births, mut survivals) = (0u16, 0u16);

        for c in rule.chars() {
            match (state, c) {
                (State::Start, 'b' | 'B') => state = State::Birth,
                (State::Start, _) => return Err(RuleError::MissingBirth),

                (State::Birth, '/') => {}
                (State::Birth, 's' | 'S') => state = State::Survival,
                (State::Survival, 's' | 'S' | 'b' | 'B' | '/') => {
                    return Err(RuleError::UnexpectedChar { got: c });
                }

                (State::Birth, n) if n.is_ascii_digit() => births |= count(n)?,
                (State::Survival, n) if n.is_ascii_digit() => survivals |= count(n)?,

                (_, c) => return Err(RuleError::UnexpectedChar { got: c }),
            }
        }

        if let State::Birth = state {
            return Err(RuleError::MissingSurvival);
        }

        if births & 1 != 0 {
            return Err(RuleError::UnsupportedB0);
        }

        Ok(RuleSet::new(births, survivals))
    }
}
