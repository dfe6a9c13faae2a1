//! Game facade owning one board plus everything a front-end needs around it.
//!
//! `ChessGame` is the single serialized entry point for moves: it keeps the
//! starting position, the live board, captured-piece lists, a pending
//! deferred promotion and at most one background search. While a search or a
//! promotion is outstanding every mutation is refused, so no move can land on
//! a board some other party is still reasoning about.

use log::info;

use crate::chess_errors::ChessErrors;
use crate::engines::difficulty::EngineConfig;
use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_generator::{all_valid_moves, valid_moves};
use crate::move_generation::move_executor::{execute_move, find_legal_move};
use crate::search::minimax::{SearchEngine, SearchReport};
use crate::search::search_control::SearchHandle;
use crate::utils::notation::encode_move;
use crate::utils::pgn::{read_pgn, write_pgn};

/// Supplies the piece for a promoting move at the moment it is applied.
pub trait PromotionChooser {
    fn choose_promotion(&mut self, board: &BoardState, mv: &Move) -> PieceKind;
}

impl<F> PromotionChooser for F
where
    F: FnMut(&BoardState, &Move) -> PieceKind,
{
    fn choose_promotion(&mut self, board: &BoardState, mv: &Move) -> PieceKind {
        self(board, mv)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The move as executed, promotion choice included.
    pub mv: Move,
    pub notation: String,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Applied(MoveOutcome),
    /// The move promotes; call `complete_promotion` to finish it.
    AwaitingPromotion(Move),
}

/// Everything a renderer needs after a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub squares: Grid,
    pub side_to_move: Color,
    pub status: GameStatus,
    pub last_move: Option<Move>,
    pub pending_promotion: Option<Move>,
    pub fen: String,
}

pub struct ChessGame {
    initial: BoardState,
    board: BoardState,
    /// Indexed by the capturing color.
    captured: [Vec<Piece>; 2],
    pending_promotion: Option<Move>,
    search: Option<SearchHandle>,
    config: EngineConfig,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for ChessGame {
    fn drop(&mut self) {
        if let Some(handle) = self.search.take() {
            handle.cancel();
        }
    }
}

impl ChessGame {
    pub fn new(config: EngineConfig) -> Self {
        Self::from_board(BoardState::new_game(), config)
    }

    pub fn from_fen(fen: &str, config: EngineConfig) -> Result<Self, ChessErrors> {
        Ok(Self::from_board(BoardState::from_fen(fen)?, config))
    }

    /// Rebuild a game from PGN, replaying every move.
    pub fn from_pgn(pgn: &str, config: EngineConfig) -> Result<Self, ChessErrors> {
        let parsed = read_pgn(pgn)?;
        let mut game = Self::from_board(parsed.initial_state, config);
        let (board, captured) = replay(&game.initial, &parsed.moves)?;
        game.board = board;
        game.captured = captured;
        Ok(game)
    }

    fn from_board(board: BoardState, config: EngineConfig) -> Self {
        let mut initial = board;
        initial.history.clear();
        Self {
            board: initial.clone(),
            initial,
            captured: [Vec::new(), Vec::new()],
            pending_promotion: None,
            search: None,
            config,
        }
    }

    #[inline]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[inline]
    pub fn initial_board(&self) -> &BoardState {
        &self.initial
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Change an engine option; takes effect from the next search.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ChessErrors> {
        self.config.set_option(name, value)
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.board.status
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    pub fn valid_moves(&self, square: Square) -> Vec<Move> {
        let mut scratch = self.board.clone();
        valid_moves(&mut scratch, square)
    }

    pub fn all_valid_moves(&self) -> Vec<Move> {
        let mut scratch = self.board.clone();
        all_valid_moves(&mut scratch)
    }

    /// Display notation of every executed move, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.board.history.iter().map(encode_move).collect()
    }

    #[inline]
    pub fn history_moves(&self) -> &[Move] {
        &self.board.history
    }

    /// Pieces taken by `color` so far.
    #[inline]
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    #[inline]
    pub fn pending_promotion(&self) -> Option<Move> {
        self.pending_promotion
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            squares: self.board.squares,
            side_to_move: self.board.side_to_move,
            status: self.board.status,
            last_move: self.board.history.last().copied(),
            pending_promotion: self.pending_promotion,
            fen: self.board.get_fen(),
        }
    }

    /// Apply `mv` with an up-front promotion choice.
    pub fn apply(
        &mut self,
        mv: &Move,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, ChessErrors> {
        self.ensure_mutable()?;
        self.commit(mv, promotion)
    }

    /// Apply `mv`, asking `chooser` for the piece only if the move promotes
    /// and carries no choice of its own.
    pub fn apply_with_chooser<C>(&mut self, mv: &Move, chooser: &mut C) -> Result<MoveOutcome, ChessErrors>
    where
        C: PromotionChooser + ?Sized,
    {
        self.ensure_mutable()?;
        let legal = find_legal_move(&self.board, mv)?;
        let promotion = match (legal.kind, mv.promotion) {
            (MoveKind::Promotion, None) => Some(chooser.choose_promotion(&self.board, &legal)),
            (_, carried) => carried,
        };
        self.commit(&legal, promotion)
    }

    /// Deferred form of `apply`: a promoting move without a choice is parked
    /// and the turn does not advance until `complete_promotion`.
    pub fn submit(&mut self, mv: &Move) -> Result<Submission, ChessErrors> {
        self.ensure_mutable()?;
        let legal = find_legal_move(&self.board, mv)?;
        if legal.kind == MoveKind::Promotion && mv.promotion.is_none() {
            self.pending_promotion = Some(legal);
            return Ok(Submission::AwaitingPromotion(legal));
        }
        self.commit(&legal, mv.promotion).map(Submission::Applied)
    }

    /// Finish the parked promotion. An out-of-set choice keeps it parked so
    /// the caller can ask again.
    pub fn complete_promotion(&mut self, choice: PieceKind) -> Result<MoveOutcome, ChessErrors> {
        let Some(pending) = self.pending_promotion else {
            return Err(ChessErrors::IllegalMove("no promotion is pending".to_owned()));
        };
        if self.search.is_some() {
            return Err(ChessErrors::SearchInProgress);
        }
        let outcome = self.commit(&pending, Some(choice))?;
        self.pending_promotion = None;
        Ok(outcome)
    }

    /// Drop the parked promotion, leaving the board as it was.
    #[inline]
    pub fn cancel_promotion(&mut self) -> Option<Move> {
        self.pending_promotion.take()
    }

    /// Synchronous search for `color` at the configured tier, or at `depth`.
    pub fn best_move(&self, color: Color, depth: Option<u8>) -> Result<Move, ChessErrors> {
        let mut config = self.config;
        if depth.is_some() {
            config.depth_override = depth;
        }
        SearchEngine::from_config(&config).best_move(&self.board, color)
    }

    /// Search for the side to move and play the result.
    pub fn play_best_move(&mut self) -> Result<MoveOutcome, ChessErrors> {
        self.ensure_mutable()?;
        let mv = self.best_move(self.board.side_to_move, None)?;
        self.commit(&mv, mv.promotion)
    }

    /// Start searching for the side to move on a worker thread. Until the
    /// search is finished or cancelled, mutations fail with
    /// `SearchInProgress`.
    pub fn start_search(&mut self) -> Result<(), ChessErrors> {
        self.ensure_mutable()?;
        if self.board.status.is_terminal() {
            return Err(ChessErrors::NoLegalMoves);
        }
        let engine = SearchEngine::from_config(&self.config);
        self.search = Some(SearchHandle::spawn(
            engine,
            self.board.clone(),
            self.board.side_to_move,
        ));
        Ok(())
    }

    #[inline]
    pub fn search_in_progress(&self) -> bool {
        self.search.is_some()
    }

    /// Whether the worker has produced its result and `finish_search` will
    /// return without blocking.
    pub fn search_ready(&self) -> bool {
        self.search.as_ref().is_some_and(SearchHandle::is_finished)
    }

    /// Ask a running search to return its best move so far.
    pub fn stop_search(&self) {
        if let Some(handle) = &self.search {
            handle.request_stop();
        }
    }

    /// Wait for the background search and release the board. `None` when no
    /// search was running.
    pub fn finish_search(&mut self) -> Option<Result<SearchReport, ChessErrors>> {
        self.search.take().map(SearchHandle::join)
    }

    /// Stop and discard the background search. Returns whether one was
    /// running.
    pub fn cancel_search(&mut self) -> bool {
        match self.search.take() {
            Some(handle) => {
                handle.cancel();
                info!("background search cancelled");
                true
            }
            None => false,
        }
    }

    /// Take back the last move by replaying the rest of the history from the
    /// starting position.
    pub fn undo(&mut self) -> Result<Move, ChessErrors> {
        self.ensure_mutable()?;
        let Some((last, earlier)) = self.board.history.split_last() else {
            return Err(ChessErrors::NothingToUndo);
        };
        let last = *last;
        let (board, captured) = replay(&self.initial, earlier)?;
        self.board = board;
        self.captured = captured;
        info!("took back {}", encode_move(&last));
        Ok(last)
    }

    /// Reset to the standard starting position.
    pub fn new_game(&mut self) -> Result<(), ChessErrors> {
        self.reset_to(BoardState::new_game())
    }

    /// Replace the game with the position described by `fen`.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessErrors> {
        let board = BoardState::from_fen(fen)?;
        self.reset_to(board)
    }

    pub fn to_pgn(&self) -> String {
        write_pgn(&self.initial, &self.board.history, self.board.status)
    }

    fn reset_to(&mut self, board: BoardState) -> Result<(), ChessErrors> {
        if self.search.is_some() {
            return Err(ChessErrors::SearchInProgress);
        }
        let config = self.config;
        *self = Self::from_board(board, config);
        info!("new game from {}", self.board.get_fen());
        Ok(())
    }

    fn ensure_mutable(&self) -> Result<(), ChessErrors> {
        if self.search.is_some() {
            return Err(ChessErrors::SearchInProgress);
        }
        if self.pending_promotion.is_some() {
            return Err(ChessErrors::PromotionPending);
        }
        Ok(())
    }

    fn commit(&mut self, mv: &Move, promotion: Option<PieceKind>) -> Result<MoveOutcome, ChessErrors> {
        let executed = execute_move(&mut self.board, mv, promotion)?;
        if let Some(piece) = executed.captured {
            self.captured[executed.piece.color.index()].push(piece);
        }
        Ok(MoveOutcome {
            mv: executed,
            notation: encode_move(&executed),
            status: self.board.status,
        })
    }
}

/// Play `moves` from `initial`, collecting captures along the way.
fn replay(initial: &BoardState, moves: &[Move]) -> Result<(BoardState, [Vec<Piece>; 2]), ChessErrors> {
    let mut board = initial.clone();
    let mut captured: [Vec<Piece>; 2] = [Vec::new(), Vec::new()];
    for mv in moves {
        let executed = execute_move(&mut board, mv, mv.promotion)?;
        if let Some(piece) = executed.captured {
            captured[executed.piece.color.index()].push(piece);
        }
    }
    Ok((board, captured))
}
