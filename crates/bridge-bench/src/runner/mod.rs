mod report;

pub use report::{ContractClass, RunReport};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bridge_bot::{BotDifficulty, DealSummary, SeatActor, Table, TableError};
use bridge_core::EngineError;
use bridge_core::game::serialization::EventLog;
use bridge_core::game::session::GameSession;
use bridge_core::model::contract::Doubling;
use bridge_core::model::score::Vulnerability;
use bridge_core::model::seat::{Partnership, Seat};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};

/// Plays a run of self-play boards with rule-based players in every seat.
pub struct DealRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    difficulty: BotDifficulty,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub boards_played: u32,
    pub passed_out: u32,
    pub replays_verified: u32,
    pub north_south: i64,
    pub east_west: i64,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub events_dir: Option<PathBuf>,
}

/// What one board produced, before it is written out.
#[derive(Debug, Clone)]
pub struct BoardOutcome {
    pub board: u32,
    pub deal_seed: u64,
    pub summary: DealSummary,
    pub events: usize,
    pub replay_verified: bool,
}

impl DealRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        Ok(Self {
            difficulty: config.bots.difficulty(),
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        })
    }

    /// Play every configured board, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if let Some(dir) = self.outputs.events_dir.as_ref() {
            fs::create_dir_all(dir)?;
        }

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut report = RunReport::new(&self.config.run_id);
        let mut rows_written = 0usize;

        for index in 0..self.config.deals.count {
            let board = index as u32 + 1;
            let deal_seed = rng.next_u64();
            let (outcome, log) = self.play_board(board, deal_seed)?;

            if let Some(dir) = self.outputs.events_dir.as_ref() {
                write_event_log(dir, board, &log)?;
            }
            write_deal_row(&mut writer, &self.config.run_id, &outcome)?;
            rows_written += 1;
            report.record(&outcome);
        }

        writer.flush()?;
        report.write_markdown(&self.outputs.summary_md)?;

        event!(
            target: "bridge_bench::run",
            Level::INFO,
            run_id = %self.config.run_id,
            boards = report.boards(),
            passed_out = report.passed_out(),
            north_south = report.scores().total(Partnership::NorthSouth),
            east_west = report.scores().total(Partnership::EastWest),
            "run complete"
        );

        Ok(RunSummary {
            boards_played: report.boards(),
            passed_out: report.passed_out(),
            replays_verified: report.replay_verified(),
            north_south: report.scores().total(Partnership::NorthSouth),
            east_west: report.scores().total(Partnership::EastWest),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            events_dir: self.outputs.events_dir.clone(),
        })
    }

    fn play_board(
        &self,
        board: u32,
        deal_seed: u64,
    ) -> Result<(BoardOutcome, EventLog), RunnerError> {
        let dealer = dealer_for_board(board);
        let vulnerability = Vulnerability::for_board(board);
        let actors = Seat::LOOP.map(|_| SeatActor::rule_based(self.difficulty));
        let mut table = Table::new(GameSession::with_seed(deal_seed), actors);

        let summary = table
            .play_deal(dealer, vulnerability)
            .map_err(|source| RunnerError::Table { board, source })?;
        let session = table.into_session();
        let log = EventLog::capture(&session);

        let replay_verified = if self.config.deals.verify_replay {
            verify_replay(board, &session, &log)?;
            true
        } else {
            false
        };

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            let contract = summary
                .result
                .contract()
                .map_or_else(|| "passed out".to_string(), ToString::to_string);
            event!(
                target: "bridge_bench::deal",
                Level::INFO,
                run_id = %self.config.run_id,
                board,
                deal_seed,
                dealer = %dealer,
                vulnerability = %vulnerability,
                contract = %contract,
                points = summary.score.map(|score| score.points),
                calls = summary.calls,
                replay_verified
            );
        }

        let outcome = BoardOutcome {
            board,
            deal_seed,
            summary,
            events: log.events.len(),
            replay_verified,
        };
        Ok((outcome, log))
    }
}

/// Dealer rotates clockwise from North with the board number.
pub fn dealer_for_board(board: u32) -> Seat {
    Seat::LOOP[(board.saturating_sub(1) % 4) as usize]
}

fn verify_replay(board: u32, session: &GameSession, log: &EventLog) -> Result<(), RunnerError> {
    let json = serde_json::to_string(log)?;
    let decoded = EventLog::from_json(&json)?;
    let restored = decoded
        .restore()
        .map_err(|source| RunnerError::Replay { board, source })?;
    if restored.events() != session.events() || restored.scores() != session.scores() {
        return Err(RunnerError::ReplayMismatch { board });
    }
    Ok(())
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_event_log(dir: &Path, board: u32, log: &EventLog) -> Result<(), RunnerError> {
    let path = dir.join(format!("board_{board:05}.json"));
    let json = serde_json::to_string_pretty(log)?;
    fs::write(path, json)?;
    Ok(())
}

fn write_deal_row(
    writer: &mut BufWriter<File>,
    run_id: &str,
    outcome: &BoardOutcome,
) -> Result<(), RunnerError> {
    let summary = &outcome.summary;
    let contract = summary.result.contract();
    let row = DealLogRow {
        run_id,
        board: outcome.board,
        deal_seed: outcome.deal_seed,
        dealer: summary.dealer,
        vulnerability: summary.vulnerability,
        contract: contract.map(|c| format!("{}{}", c.bid, doubling_suffix(c.doubling))),
        declarer: contract.map(|c| c.declarer),
        calls: summary.calls,
        declarer_tricks: summary.declarer_tricks,
        result: summary.score.map(|score| score.result),
        ns_points: summary
            .score
            .map_or(0, |score| score.for_side(Partnership::NorthSouth)),
        ew_points: summary
            .score
            .map_or(0, |score| score.for_side(Partnership::EastWest)),
        events: outcome.events,
        replay_verified: outcome.replay_verified,
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn doubling_suffix(doubling: Doubling) -> &'static str {
    match doubling {
        Doubling::Undoubled => "",
        Doubling::Doubled => "X",
        Doubling::Redoubled => "XX",
    }
}

#[derive(Debug, Serialize)]
struct DealLogRow<'a> {
    run_id: &'a str,
    board: u32,
    deal_seed: u64,
    dealer: Seat,
    vulnerability: Vulnerability,
    contract: Option<String>,
    declarer: Option<Seat>,
    calls: usize,
    declarer_tricks: Option<u8>,
    result: Option<i8>,
    ns_points: i32,
    ew_points: i32,
    events: usize,
    replay_verified: bool,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("board {board} failed to complete: {source}")]
    Table {
        board: u32,
        #[source]
        source: TableError,
    },
    #[error("board {board} could not be replayed: {source}")]
    Replay {
        board: u32,
        #[source]
        source: EngineError,
    },
    #[error("board {board} replayed to a different session")]
    ReplayMismatch { board: u32 },
}

#[cfg(test)]
mod tests {
    use super::dealer_for_board;
    use bridge_core::model::seat::Seat;

    #[test]
    fn dealer_rotates_with_board_number() {
        assert_eq!(dealer_for_board(1), Seat::North);
        assert_eq!(dealer_for_board(2), Seat::East);
        assert_eq!(dealer_for_board(4), Seat::West);
        assert_eq!(dealer_for_board(5), Seat::North);
        assert_eq!(dealer_for_board(16), Seat::West);
    }
}
