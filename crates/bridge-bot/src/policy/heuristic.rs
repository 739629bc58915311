use super::{Policy, PolicyContext};
use crate::bot::{BidContext, BidPlanner, BotDifficulty, PlayPlanner, PlayView};
use bridge_core::game::session::StateView;
use bridge_core::model::bid::Call;
use bridge_core::model::card::Card;
use bridge_core::model::trick::Trick;
use tracing::{Level, event};

/// Adapter that wraps the bid and play planners to implement the Policy trait
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedPolicy {
    difficulty: BotDifficulty,
}

impl Default for RuleBasedPolicy {
    /// Strength taken from `BRIDGE_BOT_DIFFICULTY`, `Normal` when unset.
    fn default() -> Self {
        Self::new(BotDifficulty::from_env())
    }
}

impl RuleBasedPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self { difficulty }
    }

    pub fn easy() -> Self {
        Self::new(BotDifficulty::Easy)
    }

    pub fn normal() -> Self {
        Self::new(BotDifficulty::Normal)
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }
}

impl Policy for RuleBasedPolicy {
    fn choose_call(&mut self, ctx: &PolicyContext) -> Option<Call> {
        let legal = ctx.legal_calls();
        if legal.is_empty() {
            return None;
        }
        let bid_ctx = BidContext::new(ctx.seat, ctx.hand, ctx.calls, self.difficulty);
        let decision = BidPlanner::choose(&bid_ctx, legal);
        log_bid_decision(ctx, self.difficulty, decision.call, bid_ctx.eval.hcp, decision.reason);
        Some(decision.call)
    }

    fn choose_card(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let legal = ctx.legal_cards();
        let contract = ctx.contract?;

        if matches!(self.difficulty, BotDifficulty::Easy) {
            let chosen = PlayPlanner::lowest(legal, contract.trump())?;
            log_play_decision(ctx, self.difficulty, legal, chosen, "easy_lowest_legal");
            return Some(chosen);
        }

        let empty = Trick::new(ctx.seat);
        let trick = match ctx.state {
            StateView::Play { current_trick, .. } => current_trick,
            _ => &empty,
        };
        let view = PlayView {
            seat: ctx.seat,
            hand: ctx.hand,
            trick,
            trump: contract.trump(),
            declaring: contract.declaring_side().contains(ctx.seat),
        };
        let chosen = PlayPlanner::choose(&view, legal)?;
        log_play_decision(ctx, self.difficulty, legal, chosen, "rule_based_play");
        Some(chosen)
    }
}

fn log_bid_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    chosen: Call,
    hcp: u8,
    reason: &str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    event!(
        target: "bridge_bot::bid",
        Level::DEBUG,
        seat = %ctx.seat,
        difficulty = difficulty.as_str(),
        hcp,
        calls_so_far = ctx.calls.len(),
        legal_count = ctx.legal_calls().len(),
        chosen = %chosen,
        reason,
    );
}

fn log_play_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    legal_moves: &[Card],
    chosen: Card,
    reason: &str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let legal_preview = if legal_moves.len() <= 6 {
        legal_moves
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal_moves.len())
    };

    event!(
        target: "bridge_bot::play",
        Level::DEBUG,
        seat = %ctx.seat,
        controller = %ctx.controller,
        difficulty = difficulty.as_str(),
        legal_count = legal_moves.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        reason,
    );
}
