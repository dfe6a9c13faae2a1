//! Difficulty tiers and engine configuration.
//!
//! A tier is an opaque knob mapping to a search depth and a leaf jitter
//! magnitude. `EngineConfig` bundles the tier with the remaining search
//! parameters and accepts string options from the console.

use std::fmt;
use std::str::FromStr;

use crate::chess_errors::ChessErrors;
use crate::search::minimax::DEFAULT_REPLY_LIMIT;

/// Deepest search the options accept. The reply cap keeps each extra ply
/// roughly ten times the cost of the one before.
pub const MAX_SEARCH_DEPTH: u8 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[inline]
    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// Half-width of the uniform noise added to every leaf score.
    #[inline]
    pub const fn jitter(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 0.25,
            Difficulty::Hard => 0.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ChessErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ChessErrors::InvalidConfig(format!(
                "unknown difficulty '{other}' (expected easy, medium or hard)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    /// Opponent replies examined per node.
    pub reply_limit: usize,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Overrides the tier's depth when set.
    pub depth_override: Option<u8>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            reply_limit: DEFAULT_REPLY_LIMIT,
            seed: None,
            depth_override: None,
        }
    }
}

impl EngineConfig {
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth_override.unwrap_or(self.difficulty.depth())
    }

    /// Apply a named option. Names are case-insensitive; `seed` and `depth`
    /// accept `none` / `auto` to clear them.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ChessErrors> {
        let value = value.trim();
        let invalid = |what: &str| {
            ChessErrors::InvalidConfig(format!("invalid {what} value '{value}'"))
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "difficulty" | "level" => {
                self.difficulty = value.parse()?;
            }
            "seed" => {
                self.seed = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.parse::<u64>().map_err(|_| invalid("seed"))?)
                };
            }
            "replies" | "reply_limit" => {
                let parsed = value.parse::<usize>().map_err(|_| invalid("replies"))?;
                if parsed == 0 {
                    return Err(invalid("replies"));
                }
                self.reply_limit = parsed;
            }
            "depth" => {
                self.depth_override = if value.eq_ignore_ascii_case("auto") {
                    None
                } else {
                    let parsed = value.parse::<u8>().map_err(|_| invalid("depth"))?;
                    if !(1..=MAX_SEARCH_DEPTH).contains(&parsed) {
                        return Err(ChessErrors::InvalidConfig(format!(
                            "depth must be between 1 and {MAX_SEARCH_DEPTH}, got {parsed}"
                        )));
                    }
                    Some(parsed)
                };
            }
            other => {
                return Err(ChessErrors::InvalidConfig(format!("unknown option '{other}'")));
            }
        }

        Ok(())
    }

    /// One line per option, for the console's `show` output.
    pub fn describe(&self) -> String {
        format!(
            "difficulty {} depth {} replies {} seed {}",
            self.difficulty,
            self.depth(),
            self.reply_limit,
            self.seed
                .map(|seed| seed.to_string())
                .unwrap_or_else(|| "none".to_owned())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_map_to_depth_and_jitter() {
        assert_eq!(Difficulty::Easy.depth(), 2);
        assert_eq!(Difficulty::Medium.depth(), 3);
        assert_eq!(Difficulty::Hard.depth(), 4);
        assert!(Difficulty::Easy.jitter() > Difficulty::Medium.jitter());
        assert_eq!(Difficulty::Hard.jitter(), 0.0);
    }

    #[test]
    fn parses_tier_names() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!(matches!(
            "grandmaster".parse::<Difficulty>(),
            Err(ChessErrors::InvalidConfig(_))
        ));
    }

    #[test]
    fn options_update_config() {
        let mut config = EngineConfig::default();
        assert_eq!(config.depth(), 3);

        config.set_option("difficulty", "easy").expect("difficulty");
        config.set_option("seed", "17").expect("seed");
        config.set_option("replies", "4").expect("replies");
        assert_eq!(config.depth(), 2);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.reply_limit, 4);

        config.set_option("depth", "1").expect("depth");
        assert_eq!(config.depth(), 1);
        config.set_option("depth", "auto").expect("depth");
        assert_eq!(config.depth(), 2);
        config.set_option("Seed", "none").expect("seed");
        assert_eq!(config.seed, None);
    }

    #[test]
    fn bad_options_leave_config_alone() {
        let mut config = EngineConfig::default();
        let before = config;
        assert!(config.set_option("replies", "0").is_err());
        assert!(config.set_option("seed", "-3").is_err());
        assert!(config.set_option("hash", "64").is_err());
        assert_eq!(config, before);
    }

    #[test]
    fn depth_is_bounded() {
        let mut config = EngineConfig::default();
        assert!(matches!(
            config.set_option("depth", "200"),
            Err(ChessErrors::InvalidConfig(_))
        ));
        assert!(config.set_option("depth", "0").is_err());
        assert_eq!(config.depth_override, None);
        config
            .set_option("depth", &MAX_SEARCH_DEPTH.to_string())
            .expect("deepest allowed depth");
        assert_eq!(config.depth(), MAX_SEARCH_DEPTH);
    }
}
