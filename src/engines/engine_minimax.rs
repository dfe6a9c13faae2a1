use std::time::{Duration, Instant};

use crate::chess_errors::ChessErrors;
use crate::engines::difficulty::{EngineConfig, MAX_SEARCH_DEPTH};
use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::board_state::BoardState;
use crate::search::minimax::SearchEngine;
use crate::utils::long_algebraic::move_to_long_algebraic;

/// The tiered minimax player.
pub struct MinimaxEngine {
    config: EngineConfig,
    search: SearchEngine,
}

impl MinimaxEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            search: SearchEngine::from_config(&config),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for MinimaxEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        "Parlor Minimax"
    }

    fn new_game(&mut self) {
        self.search = SearchEngine::from_config(&self.config);
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ChessErrors> {
        self.config.set_option(name, value)?;
        self.search = SearchEngine::from_config(&self.config);
        Ok(())
    }

    fn choose_move(
        &mut self,
        board: &BoardState,
        params: &GoParams,
    ) -> Result<EngineOutput, ChessErrors> {
        let mut out = EngineOutput::default();

        let depth = params
            .depth
            .map_or(self.config.depth(), |depth| depth.clamp(1, MAX_SEARCH_DEPTH));
        self.search.set_depth(depth);
        self.search.set_deadline(
            params
                .movetime_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
        );

        let report = match self.search.search(board, board.side_to_move) {
            Ok(report) => report,
            Err(ChessErrors::NoLegalMoves) => {
                out.info_lines
                    .push("info string minimax_engine no legal moves".to_owned());
                return Ok(out);
            }
            Err(err) => return Err(err),
        };

        out.info_lines.push(format!(
            "info depth {} nodes {} score {:.2} time {} pv {}",
            report.depth,
            report.nodes,
            report.score,
            report.elapsed.as_millis(),
            move_to_long_algebraic(&report.best_move)
        ));
        if report.aborted {
            out.info_lines
                .push("info string minimax_engine stopped early".to_owned());
        }
        out.best_move = Some(report.best_move);
        Ok(out)
    }
}
