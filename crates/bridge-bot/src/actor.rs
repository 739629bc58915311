use crate::bot::BotDifficulty;
use crate::policy::{Policy, PolicyContext, RuleBasedPolicy};
use bridge_core::game::event::GameEvent;
use bridge_core::model::bid::Call;
use bridge_core::model::card::Card;
use bridge_core::model::seat::Seat;
use std::fmt;

/// Whoever decides for one seat. The engine validates a move the same way
/// whichever variant produced it.
pub enum SeatActor {
    Human(Box<dyn Policy>),
    RuleBased(RuleBasedPolicy),
}

impl SeatActor {
    pub fn human<P: Policy + 'static>(input: P) -> Self {
        SeatActor::Human(Box::new(input))
    }

    pub fn rule_based(difficulty: BotDifficulty) -> Self {
        SeatActor::RuleBased(RuleBasedPolicy::new(difficulty))
    }

    pub fn is_human(&self) -> bool {
        matches!(self, SeatActor::Human(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeatActor::Human(_) => "human",
            SeatActor::RuleBased(_) => "rule_based",
        }
    }

    fn policy(&mut self) -> &mut dyn Policy {
        match self {
            SeatActor::Human(policy) => policy.as_mut(),
            SeatActor::RuleBased(policy) => policy,
        }
    }
}

impl fmt::Debug for SeatActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatActor::Human(_) => f.write_str("Human"),
            SeatActor::RuleBased(policy) => f.debug_tuple("RuleBased").field(policy).finish(),
        }
    }
}

impl Policy for SeatActor {
    fn choose_call(&mut self, ctx: &PolicyContext) -> Option<Call> {
        self.policy().choose_call(ctx)
    }

    fn choose_card(&mut self, ctx: &PolicyContext) -> Option<Card> {
        self.policy().choose_card(ctx)
    }

    fn observe(&mut self, event: &GameEvent) {
        self.policy().observe(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKind {
    Human,
    Ai,
}

/// Which seats are played by people. The default seats one human in South
/// against three bots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatingPlan {
    kinds: [SeatKind; 4],
}

impl Default for SeatingPlan {
    fn default() -> Self {
        let mut kinds = [SeatKind::Ai; 4];
        kinds[Seat::South.index()] = SeatKind::Human;
        Self { kinds }
    }
}

impl SeatingPlan {
    pub fn all_ai() -> Self {
        Self {
            kinds: [SeatKind::Ai; 4],
        }
    }

    pub fn with(mut self, seat: Seat, kind: SeatKind) -> Self {
        self.kinds[seat.index()] = kind;
        self
    }

    pub fn kind(&self, seat: Seat) -> SeatKind {
        self.kinds[seat.index()]
    }

    pub fn humans(&self) -> impl Iterator<Item = Seat> + '_ {
        Seat::LOOP
            .into_iter()
            .filter(|seat| self.kind(*seat) == SeatKind::Human)
    }

    /// Builds one actor per seat, asking `human` for the input source of each
    /// human seat.
    pub fn build<F>(&self, difficulty: BotDifficulty, mut human: F) -> [SeatActor; 4]
    where
        F: FnMut(Seat) -> Box<dyn Policy>,
    {
        Seat::LOOP.map(|seat| match self.kind(seat) {
            SeatKind::Human => SeatActor::Human(human(seat)),
            SeatKind::Ai => SeatActor::rule_based(difficulty),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{SeatActor, SeatKind, SeatingPlan};
    use crate::bot::BotDifficulty;
    use crate::policy::ScriptedInput;
    use bridge_core::model::seat::Seat;

    #[test]
    fn default_plan_seats_a_human_in_south() {
        let plan = SeatingPlan::default();
        assert_eq!(plan.humans().collect::<Vec<_>>(), vec![Seat::South]);
        assert_eq!(plan.kind(Seat::North), SeatKind::Ai);
    }

    #[test]
    fn build_assigns_actor_kinds() {
        let plan = SeatingPlan::all_ai().with(Seat::East, SeatKind::Human);
        let actors = plan.build(BotDifficulty::Normal, |_| Box::new(ScriptedInput::new()));
        let labels: Vec<_> = actors.iter().map(SeatActor::label).collect();
        assert_eq!(labels, vec!["rule_based", "human", "rule_based", "rule_based"]);
        assert!(actors[Seat::East.index()].is_human());
    }
}
