use crate::actor::SeatActor;
use crate::policy::{Policy, PolicyContext};
use bridge_core::EngineError;
use bridge_core::game::event::DealId;
use bridge_core::game::session::{GameSession, Phase};
use bridge_core::model::auction::AuctionResult;
use bridge_core::model::bid::Call;
use bridge_core::model::card::Card;
use bridge_core::model::play::PlayOutcome;
use bridge_core::model::score::{DealScore, Vulnerability};
use bridge_core::model::seat::Seat;
use thiserror::Error;
use tracing::{Level, event};

/// Upper bound on decisions in one deal: the longest legal auction is 319
/// calls, plus 52 cards.
const MAX_STEPS_PER_DEAL: usize = 400;

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{seat} has no decision ready")]
    NoDecision { seat: Seat },
    #[error("deal did not finish within {0} decisions")]
    Stalled(usize),
}

/// What a single [`Table::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Called {
        seat: Seat,
        call: Call,
        closed: Option<AuctionResult>,
    },
    Played {
        seat: Seat,
        card: Card,
        outcome: PlayOutcome,
    },
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealSummary {
    pub deal_id: DealId,
    pub dealer: Seat,
    pub vulnerability: Vulnerability,
    pub result: AuctionResult,
    pub score: Option<DealScore>,
    pub declarer_tricks: Option<u8>,
    pub calls: usize,
}

/// Driver loop: owns a session and one actor per seat, and turns actor
/// decisions into engine calls.
#[derive(Debug)]
pub struct Table {
    session: GameSession,
    actors: [SeatActor; 4],
}

impl Table {
    pub fn new(session: GameSession, actors: [SeatActor; 4]) -> Self {
        Self { session, actors }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }

    pub fn actor(&self, seat: Seat) -> &SeatActor {
        &self.actors[seat.index()]
    }

    pub fn actor_mut(&mut self, seat: Seat) -> &mut SeatActor {
        &mut self.actors[seat.index()]
    }

    /// Asks whoever controls the seat to act for one decision and submits it.
    /// A rejected move leaves the session unchanged.
    pub fn step(&mut self) -> Result<Step, TableError> {
        let before = self.session.events().len();
        let state = self.session.current_state();
        let Some(ctx) = PolicyContext::from_session(&self.session, &state) else {
            return Ok(Step::Idle);
        };
        let seat = ctx.seat;
        let actor = &mut self.actors[ctx.controller.index()];

        let step = match state.phase() {
            Phase::Auction => {
                let call = actor
                    .choose_call(&ctx)
                    .ok_or(TableError::NoDecision { seat })?;
                let closed = self.session.submit_bid(seat, call)?;
                Step::Called { seat, call, closed }
            }
            Phase::Play => {
                let card = actor
                    .choose_card(&ctx)
                    .ok_or(TableError::NoDecision { seat })?;
                let outcome = self.session.play_card(seat, card)?;
                Step::Played {
                    seat,
                    card,
                    outcome,
                }
            }
            Phase::Idle | Phase::Complete => Step::Idle,
        };
        self.broadcast_from(before);
        Ok(step)
    }

    /// Deals a fresh board and steps until it is scored or passed out.
    pub fn play_deal(
        &mut self,
        dealer: Seat,
        vulnerability: Vulnerability,
    ) -> Result<DealSummary, TableError> {
        let before = self.session.events().len();
        let deal_id = self.session.new_deal(dealer, vulnerability)?;
        self.broadcast_from(before);

        for _ in 0..MAX_STEPS_PER_DEAL {
            if self.session.phase() == Phase::Complete {
                let summary = self.summary(deal_id, dealer, vulnerability);
                event!(
                    target: "bridge_bot::table",
                    Level::DEBUG,
                    deal = deal_id.get(),
                    calls = summary.calls,
                    points = summary.score.map(|score| score.points),
                    "deal finished"
                );
                return Ok(summary);
            }
            self.step()?;
        }
        Err(TableError::Stalled(MAX_STEPS_PER_DEAL))
    }

    fn summary(&self, deal_id: DealId, dealer: Seat, vulnerability: Vulnerability) -> DealSummary {
        let result = self
            .session
            .auction()
            .and_then(|auction| auction.result())
            .unwrap_or(AuctionResult::PassedOut);
        DealSummary {
            deal_id,
            dealer,
            vulnerability,
            result,
            score: self.session.deal_score(),
            declarer_tricks: self.session.play_state().map(|play| play.declarer_tricks()),
            calls: self.session.auction().map_or(0, |auction| auction.calls().len()),
        }
    }

    fn broadcast_from(&mut self, start: usize) {
        let events = self.session.events();
        for event in events.get(start..).unwrap_or_default() {
            for actor in &mut self.actors {
                actor.observe(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Step, Table, TableError};
    use crate::actor::{SeatActor, SeatKind, SeatingPlan};
    use crate::bot::BotDifficulty;
    use crate::policy::ScriptedInput;
    use bridge_core::EngineError;
    use bridge_core::game::session::{GameSession, Phase};
    use bridge_core::model::bid::Call;
    use bridge_core::model::score::Vulnerability;
    use bridge_core::model::seat::Seat;

    fn bots() -> [SeatActor; 4] {
        SeatingPlan::all_ai().build(BotDifficulty::Normal, |_| Box::new(ScriptedInput::new()))
    }

    #[test]
    fn bots_finish_a_deal() {
        let mut table = Table::new(GameSession::with_seed(12), bots());
        let summary = table.play_deal(Seat::North, Vulnerability::None).unwrap();
        assert_eq!(table.session().phase(), Phase::Complete);
        assert!(summary.calls >= 4);
        match summary.result.contract() {
            Some(_) => {
                assert!(summary.score.is_some());
                assert!(summary.declarer_tricks.is_some());
            }
            None => assert!(summary.score.is_none()),
        }
    }

    #[test]
    fn bot_tables_are_deterministic_per_seed() {
        let run = |seed| {
            let mut table = Table::new(GameSession::with_seed(seed), bots());
            for dealer in Seat::LOOP {
                table.play_deal(dealer, Vulnerability::Both).unwrap();
            }
            table.into_session().events().to_vec()
        };
        assert_eq!(run(40), run(40));
    }

    #[test]
    fn idle_table_does_nothing() {
        let mut table = Table::new(GameSession::with_seed(1), bots());
        assert_eq!(table.step().unwrap(), Step::Idle);
    }

    #[test]
    fn human_seat_waits_for_input() {
        let plan = SeatingPlan::all_ai().with(Seat::North, SeatKind::Human);
        let actors = plan.build(BotDifficulty::Normal, |_| Box::new(ScriptedInput::new()));
        let mut session = GameSession::with_seed(6);
        session.new_deal(Seat::North, Vulnerability::None).unwrap();
        let mut table = Table::new(session, actors);

        let err = table.step().unwrap_err();
        assert!(matches!(err, TableError::NoDecision { seat: Seat::North }));

        *table.actor_mut(Seat::North) =
            SeatActor::human(ScriptedInput::with_calls([Call::Double, Call::Pass]));
        let err = table.step().unwrap_err();
        assert!(matches!(
            err,
            TableError::Engine(EngineError::IllegalBid { .. })
        ));
        assert_eq!(table.session().seat_to_act(), Some(Seat::North));

        let step = table.step().unwrap();
        assert_eq!(
            step,
            Step::Called {
                seat: Seat::North,
                call: Call::Pass,
                closed: None
            }
        );
        assert_eq!(table.session().seat_to_act(), Some(Seat::East));
    }
}
