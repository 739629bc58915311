use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Denomination of a bid, ranked Clubs < Diamonds < Hearts < Spades < NoTrump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Strain {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
    NoTrump = 4,
}

impl Strain {
    pub const ALL: [Strain; 5] = [
        Strain::Clubs,
        Strain::Diamonds,
        Strain::Hearts,
        Strain::Spades,
        Strain::NoTrump,
    ];

    pub const fn trump(self) -> Option<Suit> {
        match self {
            Strain::Clubs => Some(Suit::Clubs),
            Strain::Diamonds => Some(Suit::Diamonds),
            Strain::Hearts => Some(Suit::Hearts),
            Strain::Spades => Some(Suit::Spades),
            Strain::NoTrump => None,
        }
    }

    pub const fn is_major(self) -> bool {
        matches!(self, Strain::Hearts | Strain::Spades)
    }

    pub const fn is_minor(self) -> bool {
        matches!(self, Strain::Clubs | Strain::Diamonds)
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "C" | "CLUBS" | "♣" => Some(Strain::Clubs),
            "D" | "DIAMONDS" | "♦" => Some(Strain::Diamonds),
            "H" | "HEARTS" | "♥" => Some(Strain::Hearts),
            "S" | "SPADES" | "♠" => Some(Strain::Spades),
            "N" | "NT" | "NOTRUMP" => Some(Strain::NoTrump),
            _ => None,
        }
    }
}

impl From<Suit> for Strain {
    fn from(suit: Suit) -> Self {
        match suit {
            Suit::Clubs => Strain::Clubs,
            Suit::Diamonds => Strain::Diamonds,
            Suit::Hearts => Strain::Hearts,
            Suit::Spades => Strain::Spades,
        }
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trump() {
            Some(suit) => write!(f, "{suit}"),
            None => f.write_str("NT"),
        }
    }
}

/// A level-and-strain bid. Field order makes the derived ordering compare
/// level first, then strain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bid {
    pub level: u8,
    pub strain: Strain,
}

impl Bid {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 7;

    pub const fn new(level: u8, strain: Strain) -> Option<Self> {
        if level >= Self::MIN_LEVEL && level <= Self::MAX_LEVEL {
            Some(Self { level, strain })
        } else {
            None
        }
    }

    pub const fn is_valid(self) -> bool {
        self.level >= Self::MIN_LEVEL && self.level <= Self::MAX_LEVEL
    }

    /// All 35 bids in ascending order.
    pub fn all() -> impl Iterator<Item = Bid> {
        (Self::MIN_LEVEL..=Self::MAX_LEVEL)
            .flat_map(|level| Strain::ALL.into_iter().map(move |strain| Bid { level, strain }))
    }

    /// Tricks declarer must take to make this bid.
    pub const fn tricks_required(self) -> u8 {
        self.level + 6
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.level, self.strain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Call {
    Pass,
    Double,
    Redouble,
    Bid(Bid),
}

impl Call {
    pub const fn bid(level: u8, strain: Strain) -> Option<Call> {
        match Bid::new(level, strain) {
            Some(bid) => Some(Call::Bid(bid)),
            None => None,
        }
    }

    pub const fn is_pass(self) -> bool {
        matches!(self, Call::Pass)
    }

    pub const fn as_bid(self) -> Option<Bid> {
        match self {
            Call::Bid(bid) => Some(bid),
            _ => None,
        }
    }
}

impl From<Bid> for Call {
    fn from(bid: Bid) -> Self {
        Call::Bid(bid)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Pass => f.write_str("Pass"),
            Call::Double => f.write_str("X"),
            Call::Redouble => f.write_str("XX"),
            Call::Bid(bid) => write!(f, "{bid}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a call, expected e.g. 1NT, 4S, Pass, X or XX")]
pub struct ParseCallError(pub String);

impl FromStr for Call {
    type Err = ParseCallError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let normalized = text.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "P" | "PASS" => return Ok(Call::Pass),
            "X" | "D" | "DBL" | "DOUBLE" => return Ok(Call::Double),
            "XX" | "R" | "RDBL" | "REDOUBLE" => return Ok(Call::Redouble),
            _ => {}
        }

        let mut chars = normalized.chars();
        let level = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| ParseCallError(text.to_string()))?;
        let strain = Strain::parse(chars.as_str()).ok_or_else(|| ParseCallError(text.to_string()))?;
        Call::bid(level, strain).ok_or_else(|| ParseCallError(text.to_string()))
    }
}

impl TryFrom<String> for Call {
    type Error = ParseCallError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Call> for String {
    fn from(call: Call) -> Self {
        call.to_string()
    }
}
