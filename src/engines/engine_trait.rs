//! Move-source abstraction for computer players.
//!
//! The console and the game facade only ever talk to `dyn Engine`, so the
//! search-based player and the simple capture-preferring player are
//! interchangeable at runtime.

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_types::Move};

#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> Result<(), ChessErrors> {
        Err(ChessErrors::InvalidConfig(format!(
            "{} has no option '{name}'",
            self.name()
        )))
    }

    /// Pick a move for the side to move on `board`. `best_move` is `None`
    /// only when that side has no legal moves.
    fn choose_move(
        &mut self,
        board: &BoardState,
        params: &GoParams,
    ) -> Result<EngineOutput, ChessErrors>;
}
