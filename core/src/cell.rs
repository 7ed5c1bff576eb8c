use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::*;

const MINE: char = 'x';
const REVEALED: char = 'v';
const HIDDEN: char = 'h';
const QUESTIONED: char = '?';
const FLAGGED: char = '!';
const BLANK: char = ' ';

/// Content of the fixed mine layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MineCell {
    Mine,
    /// Number of mines in the 8-neighborhood, `0..=8`.
    Count(u8),
}

impl MineCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Mine => MINE,
            Self::Count(count) => (b'0' + count) as char,
        }
    }

    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match single_char(symbol) {
            Some(MINE) => Ok(Self::Mine),
            Some(digit @ '0'..='8') => Ok(Self::Count(digit as u8 - b'0')),
            _ => Err(GameError::InvalidSymbol(symbol.into())),
        }
    }
}

impl Default for MineCell {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// Player-visible marking of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverlayCell {
    Hidden,
    Revealed,
    Flagged,
    Questioned,
}

impl OverlayCell {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => HIDDEN,
            Self::Revealed => REVEALED,
            Self::Flagged => FLAGGED,
            Self::Questioned => QUESTIONED,
        }
    }

    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match single_char(symbol) {
            Some(HIDDEN) => Ok(Self::Hidden),
            Some(REVEALED) => Ok(Self::Revealed),
            Some(FLAGGED) => Ok(Self::Flagged),
            Some(QUESTIONED) => Ok(Self::Questioned),
            _ => Err(GameError::InvalidSymbol(symbol.into())),
        }
    }
}

impl Default for OverlayCell {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What a player is allowed to see of a cell. Mine-layer content only shows
/// through for revealed cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewCell {
    Blank,
    Open(MineCell),
    Flag,
    Question,
}

impl ViewCell {
    pub const fn new(mine: MineCell, overlay: OverlayCell) -> Self {
        match overlay {
            OverlayCell::Hidden => Self::Blank,
            OverlayCell::Revealed => Self::Open(mine),
            OverlayCell::Flagged => Self::Flag,
            OverlayCell::Questioned => Self::Question,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Blank => BLANK,
            Self::Open(mine) => mine.symbol(),
            Self::Flag => FLAGGED,
            Self::Question => QUESTIONED,
        }
    }

    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match single_char(symbol) {
            Some(BLANK) => Ok(Self::Blank),
            Some(FLAGGED) => Ok(Self::Flag),
            Some(QUESTIONED) => Ok(Self::Question),
            _ => MineCell::from_symbol(symbol).map(Self::Open),
        }
    }
}

fn single_char(symbol: &str) -> Option<char> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

macro_rules! symbol_serde {
    ($($cell:ty),+) => {
        $(
            impl fmt::Display for $cell {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.symbol())
                }
            }

            impl Serialize for $cell {
                fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
                    serializer.serialize_char(self.symbol())
                }
            }

            impl<'de> Deserialize<'de> for $cell {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
                    let symbol = String::deserialize(deserializer)?;
                    Self::from_symbol(&symbol).map_err(de::Error::custom)
                }
            }
        )+
    };
}

symbol_serde!(MineCell, OverlayCell, ViewCell);
