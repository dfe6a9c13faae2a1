//! Fixed-depth minimax used to pick the computer's move.
//!
//! Every root move is scored by `evaluate_move`: make the move, then assume
//! the opponent answers with whichever of its first `reply_limit` generated
//! replies is worst for us, recursing `depth` levels. Leaves are scored by a
//! `BoardScorer` from the point of view of the side that made the last move.
//! There is no pruning; the reply cap is what keeps the tree small, and it
//! also defines how strong each difficulty tier plays.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::chess_errors::ChessErrors;
use crate::engines::difficulty::EngineConfig;
use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_generator::all_valid_moves;
use crate::search::board_scoring::{BoardScorer, MaterialScorer};

pub const DEFAULT_REPLY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub best_move: Move,
    /// Score of `best_move` for the searching side; `-inf` when the search
    /// was stopped before any root move finished.
    pub score: f64,
    pub depth: u8,
    pub nodes: u64,
    pub root_moves: usize,
    pub aborted: bool,
    pub elapsed: Duration,
}

pub struct SearchEngine<S: BoardScorer = MaterialScorer> {
    scorer: S,
    depth: u8,
    reply_limit: usize,
    rng: StdRng,
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
    nodes: u64,
    aborted: bool,
}

impl SearchEngine<MaterialScorer> {
    /// Engine for a configured tier: depth, reply cap, jitter and seed.
    pub fn from_config(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut engine = Self::with_scorer(MaterialScorer::new(config.difficulty.jitter()), rng);
        engine.depth = config.depth();
        engine.reply_limit = config.reply_limit;
        engine
    }
}

impl<S: BoardScorer> SearchEngine<S> {
    pub fn with_scorer(scorer: S, rng: StdRng) -> Self {
        Self {
            scorer,
            depth: 2,
            reply_limit: DEFAULT_REPLY_LIMIT,
            rng,
            stop: Arc::new(AtomicBool::new(false)),
            deadline: None,
            nodes: 0,
            aborted: false,
        }
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub fn set_depth(&mut self, depth: u8) {
        self.depth = depth;
    }

    #[inline]
    pub fn set_reply_limit(&mut self, limit: usize) {
        self.reply_limit = limit;
    }

    /// Shared flag; raising it makes the running search return early with the
    /// best root move found so far.
    #[inline]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    #[inline]
    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    pub fn best_move(&mut self, board: &BoardState, color: Color) -> Result<Move, ChessErrors> {
        self.search(board, color).map(|report| report.best_move)
    }

    /// Search for `color`, which must be the side to move on `board`.
    pub fn search(&mut self, board: &BoardState, color: Color) -> Result<SearchReport, ChessErrors> {
        if board.side_to_move != color {
            return Err(ChessErrors::IllegalMove(format!(
                "it is not {}'s turn",
                color.name()
            )));
        }
        if board.status.is_terminal() {
            return Err(ChessErrors::NoLegalMoves);
        }

        let started = Instant::now();
        self.nodes = 0;
        self.aborted = false;

        let mut scratch = board.clone();
        let root_moves: Vec<Move> = all_valid_moves(&mut scratch)
            .into_iter()
            .map(search_form)
            .collect();
        let Some(first) = root_moves.first().copied() else {
            return Err(ChessErrors::NoLegalMoves);
        };

        let mut best_move = first;
        let mut best_score = f64::NEG_INFINITY;

        for mv in &root_moves {
            let score = self.evaluate_move(&mut scratch, mv, self.depth);
            if self.aborted {
                break;
            }
            if score > best_score {
                best_score = score;
                best_move = *mv;
            }
        }

        let report = SearchReport {
            best_move,
            score: best_score,
            depth: self.depth,
            nodes: self.nodes,
            root_moves: root_moves.len(),
            aborted: self.aborted,
            elapsed: started.elapsed(),
        };

        if report.aborted {
            warn!(
                "search for {} stopped early after {} nodes; returning {}{}",
                color.name(),
                report.nodes,
                report.best_move.from,
                report.best_move.to
            );
        } else {
            debug!(
                "search for {} depth {} nodes {} score {:.2} best {}{} in {:?}",
                color.name(),
                report.depth,
                report.nodes,
                report.score,
                report.best_move.from,
                report.best_move.to,
                report.elapsed
            );
        }

        Ok(report)
    }

    /// Score of `mv` for its mover. `board` is restored before returning.
    fn evaluate_move(&mut self, board: &mut BoardState, mv: &Move, depth: u8) -> f64 {
        self.nodes += 1;
        if self.should_stop() {
            self.aborted = true;
            return 0.0;
        }

        let mover = mv.piece.color;
        let undo = make_move(board, mv);

        let score = if depth == 0 {
            self.scorer.score(board, mover, &mut self.rng)
        } else {
            let replies: Vec<Move> = all_valid_moves(board)
                .into_iter()
                .take(self.reply_limit)
                .map(search_form)
                .collect();

            let mut worst = f64::INFINITY;
            for reply in &replies {
                let reply_score = -self.evaluate_move(board, reply, depth - 1);
                if self.aborted {
                    break;
                }
                worst = worst.min(reply_score);
            }

            if worst == f64::INFINITY {
                self.scorer.score(board, mover, &mut self.rng)
            } else {
                worst
            }
        };

        unmake_move(board, undo);
        score
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.aborted
            || self.stop.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Promotions are searched (and played) as queens.
#[inline]
fn search_form(mv: Move) -> Move {
    if mv.kind == MoveKind::Promotion {
        mv.with_promotion(PieceKind::Queen)
    } else {
        mv
    }
}
