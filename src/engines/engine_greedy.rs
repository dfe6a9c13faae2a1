use rand::prelude::IndexedRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::chess_errors::ChessErrors;
use crate::engines::difficulty::{Difficulty, EngineConfig};
use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_generator::all_valid_moves;

/// Plays a random capture when one exists, otherwise any random legal move.
/// On the easy tier captures get no preference at all.
/// Search options in the config are accepted but unused.
pub struct GreedyEngine {
    config: EngineConfig,
    rng: StdRng,
}

impl GreedyEngine {
    pub fn new(difficulty: Difficulty, seed: Option<u64>) -> Self {
        Self::from_config(EngineConfig {
            difficulty,
            seed,
            ..EngineConfig::default()
        })
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            rng: seeded(config.seed),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for GreedyEngine {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

impl Engine for GreedyEngine {
    fn name(&self) -> &str {
        "Parlor Greedy"
    }

    fn new_game(&mut self) {
        self.rng = seeded(self.config.seed);
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ChessErrors> {
        let seed = self.config.seed;
        self.config.set_option(name, value)?;
        if self.config.seed != seed {
            self.rng = seeded(self.config.seed);
        }
        Ok(())
    }

    fn choose_move(
        &mut self,
        board: &BoardState,
        _params: &GoParams,
    ) -> Result<EngineOutput, ChessErrors> {
        let mut scratch = board.clone();
        let legal_moves = all_valid_moves(&mut scratch);

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string greedy_engine legal_moves {}",
            legal_moves.len()
        ));

        let captures: Vec<Move> = legal_moves
            .iter()
            .filter(|mv| mv.is_capture())
            .copied()
            .collect();

        let pool = if !captures.is_empty() && self.config.difficulty != Difficulty::Easy {
            &captures
        } else {
            &legal_moves
        };

        out.best_move = pool.as_slice().choose(&mut self.rng).map(|mv| {
            if mv.kind == MoveKind::Promotion {
                mv.with_promotion(PieceKind::Queen)
            } else {
                *mv
            }
        });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_captures_above_easy() {
        // The e4 pawn can take d5; everything else is quiet.
        let board = BoardState::from_fen("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1").expect("FEN");
        let mut engine = GreedyEngine::new(Difficulty::Medium, Some(11));
        for _ in 0..10 {
            let out = engine
                .choose_move(&board, &GoParams::default())
                .expect("engine output");
            let mv = out.best_move.expect("a move");
            assert!(mv.is_capture());
        }
    }

    #[test]
    fn easy_tier_picks_any_legal_move() {
        let board = BoardState::from_fen("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1").expect("FEN");
        let mut engine = GreedyEngine::new(Difficulty::Easy, Some(3));
        let mut seen_quiet = false;
        for _ in 0..50 {
            let out = engine
                .choose_move(&board, &GoParams::default())
                .expect("engine output");
            seen_quiet |= !out.best_move.expect("a move").is_capture();
        }
        assert!(seen_quiet);
    }

    #[test]
    fn options_share_config_validation() {
        let mut engine = GreedyEngine::new(Difficulty::Medium, Some(4));
        assert!(matches!(
            engine.set_option("seed", "junk"),
            Err(ChessErrors::InvalidConfig(_))
        ));
        assert_eq!(engine.config().seed, Some(4));

        engine.set_option("seed", "none").expect("seed");
        assert_eq!(engine.config().seed, None);
        engine.set_option("difficulty", "easy").expect("difficulty");
        assert_eq!(engine.config().difficulty, Difficulty::Easy);
        assert!(engine.set_option("hash", "16").is_err());
    }

    #[test]
    fn same_seed_replays_same_choice() {
        let board = BoardState::new_game();
        let mut a = GreedyEngine::new(Difficulty::Hard, Some(99));
        let mut b = GreedyEngine::new(Difficulty::Hard, Some(99));
        let pick_a = a.choose_move(&board, &GoParams::default()).expect("a").best_move;
        let pick_b = b.choose_move(&board, &GoParams::default()).expect("b").best_move;
        assert_eq!(pick_a, pick_b);
    }
}
