//! Background search ownership.
//!
//! A `SearchHandle` runs a `SearchEngine` on a worker thread over its own
//! copy of the board. The caller keeps the handle and must either `join` or
//! `cancel` it; while it exists the game refuses mutations.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_types::Color};
use crate::search::board_scoring::BoardScorer;
use crate::search::minimax::{SearchEngine, SearchReport};

pub struct SearchHandle {
    stop: Arc<AtomicBool>,
    worker: JoinHandle<Result<SearchReport, ChessErrors>>,
}

impl SearchHandle {
    pub fn spawn<S>(mut engine: SearchEngine<S>, board: BoardState, color: Color) -> Self
    where
        S: BoardScorer + 'static,
    {
        let stop = engine.stop_flag();
        stop.store(false, Ordering::Relaxed);
        debug!("spawning background search for {}", color.name());
        let worker = thread::spawn(move || engine.search(&board, color));
        Self { stop, worker }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Ask the worker to wrap up; `join` then returns its best move so far.
    #[inline]
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn join(self) -> Result<SearchReport, ChessErrors> {
        self.worker
            .join()
            .map_err(|_| ChessErrors::SearchWorkerPanicked)?
    }

    /// Stop the worker, wait for it and throw its result away.
    pub fn cancel(self) {
        self.request_stop();
        if self.worker.join().is_err() {
            debug!("cancelled search worker had panicked");
        }
    }
}
