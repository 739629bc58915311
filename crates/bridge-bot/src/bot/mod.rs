mod bid;
mod play;

pub use bid::{BidDecision, BidPlanner};
pub use play::{PlayPlanner, PlayView};

use bridge_core::eval::Evaluation;
use bridge_core::model::auction::AuctionEntry;
use bridge_core::model::bid::{Bid, Call, Strain};
use bridge_core::model::card::Card;
use bridge_core::model::hand::Hand;
use bridge_core::model::seat::Seat;
use std::sync::OnceLock;

const DIFFICULTY_VAR: &str = "BRIDGE_BOT_DIFFICULTY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    /// Opens on values, otherwise passes; plays its lowest legal card.
    Easy,
    #[default]
    Normal,
}

impl BotDifficulty {
    /// Reads `BRIDGE_BOT_DIFFICULTY` once per process.
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| Self::from_reader(|key| std::env::var(key).ok()))
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        read(DIFFICULTY_VAR)
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "simple" => Some(BotDifficulty::Easy),
            "normal" | "default" | "rules" => Some(BotDifficulty::Normal),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Easy => "easy",
            BotDifficulty::Normal => "normal",
        }
    }
}

/// What a seat knows about the auction when it is asked to call.
#[derive(Debug, Clone)]
pub struct BidContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub eval: Evaluation,
    pub calls: &'a [AuctionEntry],
    pub difficulty: BotDifficulty,
}

impl<'a> BidContext<'a> {
    pub fn new(
        seat: Seat,
        hand: &'a Hand,
        calls: &'a [AuctionEntry],
        difficulty: BotDifficulty,
    ) -> Self {
        Self {
            seat,
            hand,
            eval: Evaluation::of(hand),
            calls,
            difficulty,
        }
    }

    /// Highest bid so far and who made it.
    pub fn last_bid(&self) -> Option<(Seat, Bid)> {
        self.calls
            .iter()
            .rev()
            .find_map(|entry| entry.call.as_bid().map(|bid| (entry.seat, bid)))
    }

    pub fn last_bid_by(&self, seat: Seat) -> Option<Bid> {
        self.calls
            .iter()
            .rev()
            .filter(|entry| entry.seat == seat)
            .find_map(|entry| entry.call.as_bid())
    }

    pub fn first_bid_by(&self, seat: Seat) -> Option<Bid> {
        self.calls
            .iter()
            .filter(|entry| entry.seat == seat)
            .find_map(|entry| entry.call.as_bid())
    }

    pub fn partner_bid(&self) -> Option<Bid> {
        self.last_bid_by(self.seat.partner())
    }

    /// Most recent bid by either opponent.
    pub fn opponent_bid(&self) -> Option<Bid> {
        self.calls
            .iter()
            .rev()
            .filter(|entry| !entry.seat.is_partner_of(self.seat))
            .find_map(|entry| entry.call.as_bid())
    }

    /// Seat that made the first bid of the auction.
    pub fn opener(&self) -> Option<Seat> {
        self.calls
            .iter()
            .find(|entry| entry.call.as_bid().is_some())
            .map(|entry| entry.seat)
    }

    pub fn has_bid(&self) -> bool {
        self.calls
            .iter()
            .any(|entry| entry.seat == self.seat && !entry.call.is_pass())
    }
}

/// Cheapest legal bid in `strain` above `current`.
pub(crate) fn cheapest_bid(strain: Strain, current: Option<Bid>) -> Option<Bid> {
    (Bid::MIN_LEVEL..=Bid::MAX_LEVEL)
        .filter_map(|level| Bid::new(level, strain))
        .find(|bid| current.is_none_or(|current| *bid > current))
}

pub(crate) fn call(level: u8, strain: Strain) -> Option<Call> {
    Call::bid(level, strain)
}

/// Rank first, then suit, so "lowest" means the smallest spot card.
pub(crate) fn card_sort_key(card: Card) -> (u8, u8) {
    (card.rank.value(), card.suit.index() as u8)
}
