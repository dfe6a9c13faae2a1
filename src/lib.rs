//! Crate root module declarations for the Parlor Chess engine.
//!
//! Exposes the rules engine (board state, attack and move generation, move
//! execution, status evaluation), the minimax search and its engines, the
//! notation helpers, and the interactive console used by the binary.

pub mod chess_errors;

pub mod game_state {
    pub mod board_state;
    pub mod chess_game;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod undo_state;
}

pub mod move_generation {
    pub mod attack_generator;
    pub mod game_status;
    pub mod legal_move_apply;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod move_executor;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod minimax;
    pub mod search_control;
}

pub mod engines {
    pub mod difficulty;
    pub mod engine_greedy;
    pub mod engine_minimax;
    pub mod engine_trait;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod notation;
    pub mod pgn;
    pub mod render_game_state;
}

pub mod console {
    pub mod console_top;
}
