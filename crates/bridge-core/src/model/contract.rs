use crate::model::bid::{Bid, Strain};
use crate::model::seat::{Partnership, Seat};
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Doubling {
    #[default]
    Undoubled,
    Doubled,
    Redoubled,
}

impl Doubling {
    /// Multiplier applied to trick points.
    pub const fn multiplier(self) -> i32 {
        match self {
            Doubling::Undoubled => 1,
            Doubling::Doubled => 2,
            Doubling::Redoubled => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    pub declarer: Seat,
    pub bid: Bid,
    pub doubling: Doubling,
}

impl Contract {
    pub const fn new(declarer: Seat, bid: Bid, doubling: Doubling) -> Self {
        Self {
            declarer,
            bid,
            doubling,
        }
    }

    pub const fn level(&self) -> u8 {
        self.bid.level
    }

    pub const fn strain(&self) -> Strain {
        self.bid.strain
    }

    pub const fn trump(&self) -> Option<Suit> {
        self.bid.strain.trump()
    }

    pub const fn dummy(&self) -> Seat {
        self.declarer.partner()
    }

    /// The seat on lead to the first trick.
    pub const fn opening_leader(&self) -> Seat {
        self.declarer.next()
    }

    pub const fn declaring_side(&self) -> Partnership {
        self.declarer.partnership()
    }

    pub const fn tricks_required(&self) -> u8 {
        self.bid.tricks_required()
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.doubling {
            Doubling::Undoubled => "",
            Doubling::Doubled => "X",
            Doubling::Redoubled => "XX",
        };
        write!(f, "{}{} by {}", self.bid, suffix, self.declarer)
    }
}
