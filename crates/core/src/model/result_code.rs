use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::dimension::Dimension::{E, F, I, J, N, P, S, T};
use crate::model::dimension::{Dimension, DimensionPair};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultCodeError {
    #[error("result code must be 4 letters, got {0:?}")]
    InvalidLength(String),

    #[error("letter {letter:?} does not belong to the {pair} axis")]
    WrongAxis { pair: DimensionPair, letter: char },
}

/// Four-letter personality code, one letter per axis in `EI`, `SN`, `TF`, `JP` order.
///
/// A `ResultCode` can only be built from letters on the right axes, so every
/// value is one of the sixteen known codes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResultCode([Dimension; 4]);

const fn code(ei: Dimension, sn: Dimension, tf: Dimension, jp: Dimension) -> ResultCode {
    ResultCode([ei, sn, tf, jp])
}

impl ResultCode {
    /// All sixteen codes in canonical listing order.
    ///
    /// This order is also the tie order when ranking tallies.
    pub const ALL: [Self; 16] = [
        code(I, S, T, J),
        code(I, S, F, J),
        code(I, N, F, J),
        code(I, N, T, J),
        code(I, S, T, P),
        code(I, S, F, P),
        code(I, N, F, P),
        code(I, N, T, P),
        code(E, S, T, P),
        code(E, S, F, P),
        code(E, N, F, P),
        code(E, N, T, P),
        code(E, S, T, J),
        code(E, S, F, J),
        code(E, N, F, J),
        code(E, N, T, J),
    ];

    /// Build a code from one letter per axis.
    ///
    /// # Errors
    ///
    /// Returns `ResultCodeError::WrongAxis` if a letter sits on the wrong axis.
    pub fn from_letters(letters: [Dimension; 4]) -> Result<Self, ResultCodeError> {
        for (pair, letter) in DimensionPair::ALL.into_iter().zip(letters) {
            if !pair.contains(letter) {
                return Err(ResultCodeError::WrongAxis {
                    pair,
                    letter: letter.as_char(),
                });
            }
        }
        Ok(Self(letters))
    }

    /// Build a code by picking one of each axis' two letters.
    ///
    /// `pick` returning the first letter selects it, anything else selects the second.
    #[must_use]
    pub fn from_axes(mut pick: impl FnMut(DimensionPair) -> Dimension) -> Self {
        Self(DimensionPair::ALL.map(|pair| {
            if pick(pair) == pair.first() {
                pair.first()
            } else {
                pair.second()
            }
        }))
    }

    /// Letter chosen on the given axis.
    #[must_use]
    pub fn letter(&self, pair: DimensionPair) -> Dimension {
        self.0[pair.slot()]
    }

    #[must_use]
    pub fn letters(&self) -> [Dimension; 4] {
        self.0
    }

    /// Position of this code within [`ResultCode::ALL`].
    #[must_use]
    pub fn index(&self) -> usize {
        let extravert = self.0[0] == E;
        let judging = self.0[3] == J;
        let core = match (self.0[1], self.0[2]) {
            (S, T) => 0,
            (S, F) => 1,
            (N, F) => 2,
            _ => 3,
        };
        // introverts list J before P, extraverts list P before J
        let block = match (extravert, judging) {
            (false, true) => 0,
            (false, false) => 4,
            (true, false) => 8,
            (true, true) => 12,
        };
        block + core
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.0 {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultCode({self})")
    }
}

impl FromStr for ResultCode {
    type Err = ResultCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        let &[a, b, c, d] = chars.as_slice() else {
            return Err(ResultCodeError::InvalidLength(s.to_string()));
        };
        let mut letters = [E; 4];
        for ((slot, raw), pair) in letters.iter_mut().zip([a, b, c, d]).zip(DimensionPair::ALL) {
            *slot = Dimension::from_char(raw)
                .map_err(|_| ResultCodeError::WrongAxis { pair, letter: raw })?;
        }
        Self::from_letters(letters)
    }
}

impl TryFrom<String> for ResultCode {
    type Error = ResultCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResultCode> for String {
    fn from(value: ResultCode) -> Self {
        value.to_string()
    }
}
