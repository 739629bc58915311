use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use bridge_core::model::bid::Strain;
use bridge_core::model::contract::{Contract, Doubling};
use bridge_core::model::score::ScoreBoard;
use bridge_core::model::seat::Partnership;

use super::BoardOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractClass {
    Partscore,
    Game,
    Slam,
}

impl ContractClass {
    pub fn of(contract: &Contract) -> Self {
        let level = contract.level();
        if level >= 6 {
            return ContractClass::Slam;
        }
        let game_level = match contract.strain() {
            Strain::NoTrump => 3,
            Strain::Hearts | Strain::Spades => 4,
            Strain::Clubs | Strain::Diamonds => 5,
        };
        if level >= game_level {
            ContractClass::Game
        } else {
            ContractClass::Partscore
        }
    }

    const fn index(self) -> usize {
        match self {
            ContractClass::Partscore => 0,
            ContractClass::Game => 1,
            ContractClass::Slam => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    bid: u32,
    made: u32,
}

/// Aggregates per-board outcomes into the run summary.
#[derive(Debug, Clone)]
pub struct RunReport {
    run_id: String,
    scores: ScoreBoard,
    boards: u32,
    passed_out: u32,
    doubled: u32,
    calls: usize,
    replay_verified: u32,
    by_strain: [Tally; 5],
    by_class: [Tally; 3],
    biggest: Option<(u32, i32, String)>,
}

impl RunReport {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            scores: ScoreBoard::new(),
            boards: 0,
            passed_out: 0,
            doubled: 0,
            calls: 0,
            replay_verified: 0,
            by_strain: [Tally::default(); 5],
            by_class: [Tally::default(); 3],
            biggest: None,
        }
    }

    pub fn record(&mut self, outcome: &BoardOutcome) {
        self.boards += 1;
        self.calls += outcome.summary.calls;
        if outcome.replay_verified {
            self.replay_verified += 1;
        }

        let (Some(contract), Some(score)) =
            (outcome.summary.result.contract(), outcome.summary.score)
        else {
            self.passed_out += 1;
            self.scores.record_passed_out();
            return;
        };

        self.scores.record(&score);
        if contract.doubling != Doubling::Undoubled {
            self.doubled += 1;
        }
        let made = u32::from(score.made());
        let strain = &mut self.by_strain[contract.strain() as usize];
        strain.bid += 1;
        strain.made += made;
        let class = &mut self.by_class[ContractClass::of(contract).index()];
        class.bid += 1;
        class.made += made;

        let swing = score.points.abs();
        if self
            .biggest
            .as_ref()
            .is_none_or(|(_, best, _)| swing > *best)
        {
            self.biggest = Some((outcome.board, swing, contract.to_string()));
        }
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn boards(&self) -> u32 {
        self.boards
    }

    pub fn passed_out(&self) -> u32 {
        self.passed_out
    }

    pub fn replay_verified(&self) -> u32 {
        self.replay_verified
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Self-play summary: {}", self.run_id);
        let _ = writeln!(out);
        let _ = writeln!(out, "| Side | Total |");
        let _ = writeln!(out, "|------|------:|");
        for side in Partnership::BOTH {
            let _ = writeln!(out, "| {side} | {} |", self.scores.total(side));
        }
        let _ = writeln!(out);
        let leader = match self.scores.leader() {
            Some(side) => side.to_string(),
            None => "tied".to_string(),
        };
        let _ = writeln!(out, "- Boards played: {}", self.boards);
        let _ = writeln!(out, "- Leader: {leader}");
        let _ = writeln!(out, "- Passed out: {}", self.passed_out);
        let _ = writeln!(out, "- Doubled contracts: {}", self.doubled);
        let _ = writeln!(out, "- Average calls per auction: {:.1}", self.average_calls());
        let _ = writeln!(
            out,
            "- Replays verified: {}/{}",
            self.replay_verified, self.boards
        );
        if let Some((board, swing, contract)) = self.biggest.as_ref() {
            let _ = writeln!(out, "- Largest score: {swing} on board {board} ({contract})");
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "| Strain | Contracts | Made | Rate |");
        let _ = writeln!(out, "|--------|----------:|-----:|-----:|");
        for strain in Strain::ALL {
            write_tally_row(&mut out, strain_label(strain), self.by_strain[strain as usize]);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "| Level | Contracts | Made | Rate |");
        let _ = writeln!(out, "|-------|----------:|-----:|-----:|");
        for (label, class) in [
            ("Partscore", ContractClass::Partscore),
            ("Game", ContractClass::Game),
            ("Slam", ContractClass::Slam),
        ] {
            write_tally_row(&mut out, label, self.by_class[class.index()]);
        }
        out
    }

    pub fn write_markdown(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.to_markdown())
    }

    fn average_calls(&self) -> f64 {
        if self.boards == 0 {
            0.0
        } else {
            self.calls as f64 / f64::from(self.boards)
        }
    }
}

fn write_tally_row(out: &mut String, label: &str, tally: Tally) {
    let rate = if tally.bid == 0 {
        "-".to_string()
    } else {
        format!("{:.0}%", 100.0 * f64::from(tally.made) / f64::from(tally.bid))
    };
    let _ = writeln!(out, "| {label} | {} | {} | {rate} |", tally.bid, tally.made);
}

fn strain_label(strain: Strain) -> &'static str {
    match strain {
        Strain::Clubs => "Clubs",
        Strain::Diamonds => "Diamonds",
        Strain::Hearts => "Hearts",
        Strain::Spades => "Spades",
        Strain::NoTrump => "No trump",
    }
}

#[cfg(test)]
mod tests {
    use super::{ContractClass, RunReport};
    use crate::runner::BoardOutcome;
    use bridge_bot::DealSummary;
    use bridge_core::game::event::DealId;
    use bridge_core::model::auction::AuctionResult;
    use bridge_core::model::bid::{Bid, Strain};
    use bridge_core::model::contract::{Contract, Doubling};
    use bridge_core::model::score::{Vulnerability, score};
    use bridge_core::model::seat::{Partnership, Seat};

    fn contract(level: u8, strain: Strain) -> Contract {
        Contract::new(Seat::North, Bid::new(level, strain).unwrap(), Doubling::Undoubled)
    }

    fn outcome(board: u32, contract: Option<Contract>, tricks: u8) -> BoardOutcome {
        let result = contract.map_or(AuctionResult::PassedOut, AuctionResult::Contract);
        BoardOutcome {
            board,
            deal_seed: u64::from(board),
            summary: DealSummary {
                deal_id: DealId(1),
                dealer: Seat::North,
                vulnerability: Vulnerability::None,
                result,
                score: contract.map(|c| score(&c, tricks, false)),
                declarer_tricks: contract.map(|_| tricks),
                calls: 4,
            },
            events: 0,
            replay_verified: true,
        }
    }

    #[test]
    fn classifies_contracts_by_level() {
        assert_eq!(ContractClass::of(&contract(2, Strain::Spades)), ContractClass::Partscore);
        assert_eq!(ContractClass::of(&contract(3, Strain::NoTrump)), ContractClass::Game);
        assert_eq!(ContractClass::of(&contract(4, Strain::Diamonds)), ContractClass::Partscore);
        assert_eq!(ContractClass::of(&contract(5, Strain::Clubs)), ContractClass::Game);
        assert_eq!(ContractClass::of(&contract(7, Strain::Hearts)), ContractClass::Slam);
    }

    #[test]
    fn tallies_scores_and_passed_out_boards() {
        let mut report = RunReport::new("unit");
        report.record(&outcome(1, Some(contract(4, Strain::Spades)), 10));
        report.record(&outcome(2, None, 0));
        report.record(&outcome(3, Some(contract(3, Strain::NoTrump)), 8));

        assert_eq!(report.boards(), 3);
        assert_eq!(report.passed_out(), 1);
        assert_eq!(report.replay_verified(), 3);
        assert_eq!(report.scores().deals(), 3);
        // 420 for 4S made, 50 for 3NT down one.
        assert_eq!(report.scores().total(Partnership::NorthSouth), 420);
        assert_eq!(report.scores().total(Partnership::EastWest), 50);

        let markdown = report.to_markdown();
        assert!(markdown.contains("# Self-play summary: unit"));
        assert!(markdown.contains("- Passed out: 1"));
        assert!(markdown.contains("| Spades | 1 | 1 | 100% |"));
        assert!(markdown.contains("| No trump | 1 | 0 | 0% |"));
        assert!(markdown.contains("Largest score: 420 on board 1"));
    }
}
