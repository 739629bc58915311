use crate::model::auction::AuctionResult;
use crate::model::bid::Call;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::play::TrickTally;
use crate::model::score::{DealScore, Vulnerability};
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential identifier of a deal within one session, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(pub u32);

impl DealId {
    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn next(self) -> DealId {
        DealId(self.0 + 1)
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deal #{}", self.0)
    }
}

/// One entry of the append-only session log. `Dealt` carries the hands so a
/// log replays without the shuffle RNG; `shuffled` marks deals drawn from the
/// session RNG rather than supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    Dealt {
        deal_id: DealId,
        dealer: Seat,
        vulnerability: Vulnerability,
        hands: [Hand; 4],
        #[serde(default)]
        shuffled: bool,
    },
    BidMade {
        seat: Seat,
        call: Call,
    },
    AuctionClosed {
        result: AuctionResult,
    },
    CardPlayed {
        seat: Seat,
        card: Card,
    },
    TrickWon {
        winner: Seat,
        trick_number: u8,
        tally: TrickTally,
    },
    DealScored {
        score: DealScore,
    },
}

impl GameEvent {
    pub const fn kind(&self) -> &'static str {
        match self {
            GameEvent::Dealt { .. } => "dealt",
            GameEvent::BidMade { .. } => "bid_made",
            GameEvent::AuctionClosed { .. } => "auction_closed",
            GameEvent::CardPlayed { .. } => "card_played",
            GameEvent::TrickWon { .. } => "trick_won",
            GameEvent::DealScored { .. } => "deal_scored",
        }
    }

    /// Events that record a decision made by a seat, as opposed to the ones
    /// the engine derives from them.
    pub const fn is_input(&self) -> bool {
        matches!(
            self,
            GameEvent::Dealt { .. } | GameEvent::BidMade { .. } | GameEvent::CardPlayed { .. }
        )
    }
}

/// Receives every event as the session appends it.
pub trait EventObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> EventObserver for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}
