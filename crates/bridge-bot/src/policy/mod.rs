mod heuristic;
mod scripted;

pub use heuristic::RuleBasedPolicy;
pub use scripted::ScriptedInput;

use bridge_core::game::event::GameEvent;
use bridge_core::game::session::{GameSession, StateView};
use bridge_core::model::auction::AuctionEntry;
use bridge_core::model::bid::Call;
use bridge_core::model::card::Card;
use bridge_core::model::contract::Contract;
use bridge_core::model::hand::Hand;
use bridge_core::model::seat::Seat;

/// Context provided to policies for decision-making
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    /// Seat whose call or card is due. During play this may be dummy.
    pub seat: Seat,
    /// Seat making the decision: declarer when dummy is to play.
    pub controller: Seat,
    pub hand: &'a Hand,
    pub state: &'a StateView,
    pub calls: &'a [AuctionEntry],
    pub contract: Option<Contract>,
}

impl<'a> PolicyContext<'a> {
    /// Builds the context for whichever seat the session is waiting on.
    pub fn from_session(session: &'a GameSession, state: &'a StateView) -> Option<Self> {
        let seat = state.seat_to_act()?;
        let controller = match state {
            StateView::Play { controller, .. } => *controller,
            _ => seat,
        };
        Some(Self {
            seat,
            controller,
            hand: session.hand(seat)?,
            state,
            calls: session.auction().map(|auction| auction.calls()).unwrap_or(&[]),
            contract: session.contract(),
        })
    }

    pub fn legal_calls(&self) -> &'a [Call] {
        self.state.legal_calls()
    }

    pub fn legal_cards(&self) -> &'a [Card] {
        self.state.legal_cards()
    }
}

/// Unified interface for anything that picks calls and cards for a seat:
/// rule-based bots, scripted input, or a human front end.
pub trait Policy: Send {
    /// Choose a call during the auction. `None` means no decision is
    /// available yet.
    fn choose_call(&mut self, ctx: &PolicyContext) -> Option<Call>;

    /// Choose a card for `ctx.seat` during play.
    fn choose_card(&mut self, ctx: &PolicyContext) -> Option<Card>;

    /// Optional: observe every event the session records.
    fn observe(&mut self, _event: &GameEvent) {}
}
