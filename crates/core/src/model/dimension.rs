use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DimensionError {
    #[error("invalid dimension letter: {0:?}")]
    InvalidLetter(char),

    #[error("invalid dimension pair: {0:?}")]
    InvalidPair(String),

    #[error("invalid choice: {0:?}")]
    InvalidChoice(String),
}

//
// ─── DIMENSION ────────────────────────────────────────────────────────────────
//

/// One of the eight trait letters.
///
/// Letters come in four opposing pairs (see [`DimensionPair`]). The first
/// letter of each pair (`E`, `S`, `T`, `J`) wins ties during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Extraversion.
    E,
    /// Introversion.
    I,
    /// Sensing.
    S,
    /// Intuition.
    N,
    /// Thinking.
    T,
    /// Feeling.
    F,
    /// Judging.
    J,
    /// Perceiving.
    P,
}

impl Dimension {
    pub const ALL: [Self; 8] = [
        Self::E,
        Self::I,
        Self::S,
        Self::N,
        Self::T,
        Self::F,
        Self::J,
        Self::P,
    ];

    /// The pair this letter belongs to.
    #[must_use]
    pub const fn pair(self) -> DimensionPair {
        match self {
            Self::E | Self::I => DimensionPair::EI,
            Self::S | Self::N => DimensionPair::SN,
            Self::T | Self::F => DimensionPair::TF,
            Self::J | Self::P => DimensionPair::JP,
        }
    }

    /// The opposing letter of the same pair.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::E => Self::I,
            Self::I => Self::E,
            Self::S => Self::N,
            Self::N => Self::S,
            Self::T => Self::F,
            Self::F => Self::T,
            Self::J => Self::P,
            Self::P => Self::J,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::E => 'E',
            Self::I => 'I',
            Self::S => 'S',
            Self::N => 'N',
            Self::T => 'T',
            Self::F => 'F',
            Self::J => 'J',
            Self::P => 'P',
        }
    }

    /// Parses an uppercase or lowercase trait letter.
    ///
    /// # Errors
    ///
    /// Returns `DimensionError::InvalidLetter` for anything outside `EISNTFJP`.
    pub fn from_char(value: char) -> Result<Self, DimensionError> {
        match value.to_ascii_uppercase() {
            'E' => Ok(Self::E),
            'I' => Ok(Self::I),
            'S' => Ok(Self::S),
            'N' => Ok(Self::N),
            'T' => Ok(Self::T),
            'F' => Ok(Self::F),
            'J' => Ok(Self::J),
            'P' => Ok(Self::P),
            _ => Err(DimensionError::InvalidLetter(value)),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

//
// ─── DIMENSION PAIR ───────────────────────────────────────────────────────────
//

/// One of the four opposing axes, in fixed result order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionPair {
    EI,
    SN,
    TF,
    JP,
}

impl DimensionPair {
    /// Pairs in the order their letters appear in a result code.
    pub const ALL: [Self; 4] = [Self::EI, Self::SN, Self::TF, Self::JP];

    /// Tie-winning letter of the pair.
    #[must_use]
    pub const fn first(self) -> Dimension {
        match self {
            Self::EI => Dimension::E,
            Self::SN => Dimension::S,
            Self::TF => Dimension::T,
            Self::JP => Dimension::J,
        }
    }

    #[must_use]
    pub const fn second(self) -> Dimension {
        self.first().opposite()
    }

    /// Position of this pair's letter inside a result code.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::EI => 0,
            Self::SN => 1,
            Self::TF => 2,
            Self::JP => 3,
        }
    }

    #[must_use]
    pub fn contains(self, dimension: Dimension) -> bool {
        dimension.pair() == self
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EI => "EI",
            Self::SN => "SN",
            Self::TF => "TF",
            Self::JP => "JP",
        }
    }
}

impl fmt::Display for DimensionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DimensionPair {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EI" => Ok(Self::EI),
            "SN" => Ok(Self::SN),
            "TF" => Ok(Self::TF),
            "JP" => Ok(Self::JP),
            _ => Err(DimensionError::InvalidPair(s.to_string())),
        }
    }
}

//
// ─── CHOICE ───────────────────────────────────────────────────────────────────
//

/// Which of a question's two options was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

impl std::str::FromStr for Choice {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            _ => Err(DimensionError::InvalidChoice(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_pairs_with_its_opposite() {
        for dimension in Dimension::ALL {
            let opposite = dimension.opposite();
            assert_ne!(dimension, opposite);
            assert_eq!(dimension.pair(), opposite.pair());
            assert_eq!(opposite.opposite(), dimension);
        }
    }

    #[test]
    fn pair_slots_follow_result_order() {
        let slots: Vec<usize> = DimensionPair::ALL.iter().map(|p| p.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert_eq!(DimensionPair::JP.first(), Dimension::J);
        assert_eq!(DimensionPair::JP.second(), Dimension::P);
    }

    #[test]
    fn letters_parse_case_insensitively() {
        assert_eq!(Dimension::from_char('n').unwrap(), Dimension::N);
        assert_eq!(
            Dimension::from_char('X'),
            Err(DimensionError::InvalidLetter('X'))
        );
    }

    #[test]
    fn letters_serialize_as_single_characters() {
        assert_eq!(serde_json::to_string(&Dimension::F).unwrap(), "\"F\"");
        assert_eq!(serde_json::to_string(&DimensionPair::TF).unwrap(), "\"TF\"");
        assert_eq!(serde_json::to_string(&Choice::B).unwrap(), "\"B\"");
        assert!(serde_json::from_str::<Dimension>("\"Q\"").is_err());
    }

    #[test]
    fn choice_parses_and_flips() {
        assert_eq!(" b ".parse::<Choice>().unwrap(), Choice::B);
        assert_eq!(Choice::A.other(), Choice::B);
        assert!("c".parse::<Choice>().is_err());
    }
}
