use super::{Policy, PolicyContext};
use bridge_core::model::bid::Call;
use bridge_core::model::card::Card;
use std::collections::VecDeque;

/// Queued moves standing in for a human at the table. Each request pops the
/// next queued call or card; an empty queue means the human has not decided
/// yet.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    calls: VecDeque<Call>,
    cards: VecDeque<Card>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calls(calls: impl IntoIterator<Item = Call>) -> Self {
        Self {
            calls: calls.into_iter().collect(),
            cards: VecDeque::new(),
        }
    }

    pub fn push_call(&mut self, call: Call) {
        self.calls.push_back(call);
    }

    pub fn push_card(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn pending_calls(&self) -> usize {
        self.calls.len()
    }

    pub fn pending_cards(&self) -> usize {
        self.cards.len()
    }
}

impl Policy for ScriptedInput {
    fn choose_call(&mut self, _ctx: &PolicyContext) -> Option<Call> {
        self.calls.pop_front()
    }

    fn choose_card(&mut self, _ctx: &PolicyContext) -> Option<Card> {
        self.cards.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::ScriptedInput;
    use crate::policy::{Policy, PolicyContext};
    use bridge_core::game::session::GameSession;
    use bridge_core::model::bid::Call;
    use bridge_core::model::score::Vulnerability;
    use bridge_core::model::seat::Seat;

    #[test]
    fn pops_moves_in_order() {
        let mut session = GameSession::with_seed(1);
        session.new_deal(Seat::South, Vulnerability::None).unwrap();
        let state = session.current_state();
        let ctx = PolicyContext::from_session(&session, &state).unwrap();

        let mut input = ScriptedInput::with_calls([Call::Pass, "1C".parse().unwrap()]);
        input.push_card("AS".parse().unwrap());
        assert_eq!(input.pending_calls(), 2);
        assert_eq!(input.choose_call(&ctx), Some(Call::Pass));
        assert_eq!(input.choose_call(&ctx), Some("1C".parse().unwrap()));
        assert_eq!(input.choose_call(&ctx), None);
        assert_eq!(input.choose_card(&ctx), Some("AS".parse().unwrap()));
        assert_eq!(input.pending_cards(), 0);
    }
}
