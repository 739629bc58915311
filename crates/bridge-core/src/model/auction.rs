use crate::error::{EngineError, IllegalBidReason};
use crate::model::phase::Phase;
use crate::model::bid::{Bid, Call};
use crate::model::contract::{Contract, Doubling};
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionEntry {
    pub seat: Seat,
    pub call: Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionResult {
    Contract(Contract),
    PassedOut,
}

impl AuctionResult {
    pub const fn contract(&self) -> Option<&Contract> {
        match self {
            AuctionResult::Contract(contract) => Some(contract),
            AuctionResult::PassedOut => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionState {
    AwaitingCall(Seat),
    Complete(AuctionResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auction {
    dealer: Seat,
    calls: Vec<AuctionEntry>,
    state: AuctionState,
    last_bid: Option<(Seat, Bid)>,
    doubling: Doubling,
    trailing_passes: usize,
}

impl Auction {
    pub fn new(dealer: Seat) -> Self {
        Self {
            dealer,
            calls: Vec::new(),
            state: AuctionState::AwaitingCall(dealer),
            last_bid: None,
            doubling: Doubling::Undoubled,
            trailing_passes: 0,
        }
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn calls(&self) -> &[AuctionEntry] {
        &self.calls
    }

    pub fn state(&self) -> AuctionState {
        self.state
    }

    pub fn next_seat(&self) -> Option<Seat> {
        match self.state {
            AuctionState::AwaitingCall(seat) => Some(seat),
            AuctionState::Complete(_) => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, AuctionState::Complete(_))
    }

    pub fn result(&self) -> Option<AuctionResult> {
        match self.state {
            AuctionState::Complete(result) => Some(result),
            AuctionState::AwaitingCall(_) => None,
        }
    }

    /// Highest bid so far together with the seat that made it.
    pub fn last_bid(&self) -> Option<(Seat, Bid)> {
        self.last_bid
    }

    /// Doubling status of the highest bid.
    pub fn doubling(&self) -> Doubling {
        self.doubling
    }

    /// Validates `call` for `seat` without touching the auction.
    pub fn check(&self, seat: Seat, call: Call) -> Result<(), EngineError> {
        let expected = match self.state {
            AuctionState::AwaitingCall(expected) => expected,
            AuctionState::Complete(result) => {
                let phase = match result {
                    AuctionResult::Contract(_) => Phase::Play,
                    AuctionResult::PassedOut => Phase::Complete,
                };
                return Err(EngineError::WrongPhase {
                    operation: "call",
                    phase,
                });
            }
        };
        if seat != expected {
            return Err(EngineError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.legality(seat, call)
            .map_err(|reason| EngineError::IllegalBid { call, reason })
    }

    fn legality(&self, seat: Seat, call: Call) -> Result<(), IllegalBidReason> {
        match call {
            Call::Pass => Ok(()),
            Call::Bid(bid) => {
                if !bid.is_valid() {
                    return Err(IllegalBidReason::LevelOutOfRange(bid.level));
                }
                match self.last_bid {
                    Some((_, current)) if bid <= current => {
                        Err(IllegalBidReason::NotHigher { current })
                    }
                    _ => Ok(()),
                }
            }
            Call::Double => {
                let (bidder, _) = self.last_bid.ok_or(IllegalBidReason::NothingToDouble)?;
                if bidder.is_partner_of(seat) {
                    return Err(IllegalBidReason::OwnSideBid);
                }
                match self.doubling {
                    Doubling::Undoubled => Ok(()),
                    Doubling::Doubled => Err(IllegalBidReason::AlreadyDoubled),
                    Doubling::Redoubled => Err(IllegalBidReason::AlreadyRedoubled),
                }
            }
            Call::Redouble => {
                let (bidder, _) = self.last_bid.ok_or(IllegalBidReason::NotDoubled)?;
                if !bidder.is_partner_of(seat) {
                    return Err(IllegalBidReason::OpponentsBid);
                }
                match self.doubling {
                    Doubling::Undoubled => Err(IllegalBidReason::NotDoubled),
                    Doubling::Doubled => Ok(()),
                    Doubling::Redoubled => Err(IllegalBidReason::AlreadyRedoubled),
                }
            }
        }
    }

    /// Records a legal call. Returns the result once the auction closes.
    pub fn submit(&mut self, seat: Seat, call: Call) -> Result<Option<AuctionResult>, EngineError> {
        self.check(seat, call)?;

        self.calls.push(AuctionEntry { seat, call });
        match call {
            Call::Pass => self.trailing_passes += 1,
            Call::Bid(bid) => {
                self.last_bid = Some((seat, bid));
                self.doubling = Doubling::Undoubled;
                self.trailing_passes = 0;
            }
            Call::Double => {
                self.doubling = Doubling::Doubled;
                self.trailing_passes = 0;
            }
            Call::Redouble => {
                self.doubling = Doubling::Redoubled;
                self.trailing_passes = 0;
            }
        }

        let result = match self.last_bid {
            None if self.trailing_passes == 4 => Some(AuctionResult::PassedOut),
            Some((bidder, bid)) if self.trailing_passes == 3 => {
                let declarer = self.first_to_name(bidder, bid).unwrap_or(bidder);
                Some(AuctionResult::Contract(Contract::new(
                    declarer,
                    bid,
                    self.doubling,
                )))
            }
            _ => None,
        };

        match result {
            Some(result) => {
                self.state = AuctionState::Complete(result);
                event!(
                    target: "bridge_core::auction",
                    Level::DEBUG,
                    dealer = %self.dealer,
                    calls = self.calls.len(),
                    result = ?result,
                    "auction closed"
                );
            }
            None => self.state = AuctionState::AwaitingCall(seat.next()),
        }
        Ok(result)
    }

    /// First member of the bidder's side to have named the final strain.
    fn first_to_name(&self, bidder: Seat, bid: Bid) -> Option<Seat> {
        self.calls
            .iter()
            .find(|entry| {
                entry.seat.is_partner_of(bidder)
                    && entry.call.as_bid().is_some_and(|b| b.strain == bid.strain)
            })
            .map(|entry| entry.seat)
    }

    /// Every call the seat to act may legally make, passes first.
    pub fn legal_calls(&self) -> Vec<Call> {
        let Some(seat) = self.next_seat() else {
            return Vec::new();
        };
        [Call::Pass, Call::Double, Call::Redouble]
            .into_iter()
            .chain(Bid::all().map(Call::Bid))
            .filter(|call| self.legality(seat, *call).is_ok())
            .collect()
    }
}
