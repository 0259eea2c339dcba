//! Command-line configuration.

use crate::game_repr::{EngineError, ShakmatyEngine};
use clap::Parser;
use std::path::PathBuf;

/// Space left between the window and the edges of the smaller monitor side.
pub const MONITOR_MARGIN: u32 = 100;

/// Window side used when the monitor size is unknown.
pub const FALLBACK_WINDOW_SIDE: u32 = 800;

/// Two players, one mouse, one board.
#[derive(Debug, Clone, Parser)]
#[command(name = "chess-board", version, about)]
pub struct Config {
    /// Directory holding the piece images, the background and the window icon
    #[arg(long, value_name = "DIR", default_value = "assets")]
    pub assets: PathBuf,

    /// Start from this position instead of the standard one
    #[arg(long, value_name = "FEN")]
    pub fen: Option<String>,

    /// Initial window width; defaults to a square fitted to the monitor
    #[arg(
        long,
        value_name = "PX",
        requires = "height",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub width: Option<u32>,

    /// Initial window height
    #[arg(
        long,
        value_name = "PX",
        requires = "width",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub height: Option<u32>,
}

impl Config {
    /// The window size requested on the command line, if any.
    pub fn window_size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    /// The engine at the configured starting position.
    pub fn engine(&self) -> Result<ShakmatyEngine, EngineError> {
        match &self.fen {
            Some(fen) => ShakmatyEngine::from_fen(fen),
            None => Ok(ShakmatyEngine::new()),
        }
    }
}

/// Initial window size: the requested one, or a square `MONITOR_MARGIN`
/// pixels smaller than the monitor's shorter side.
pub fn initial_window_size(requested: Option<(u32, u32)>, monitor: Option<(u32, u32)>) -> (u32, u32) {
    if let Some(size) = requested {
        return size;
    }

    let side = monitor
        .map(|(w, h)| w.min(h).saturating_sub(MONITOR_MARGIN).max(1))
        .unwrap_or(FALLBACK_WINDOW_SIDE);
    (side, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_repr::{Color, RulesEngine};

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["chess-board"]).unwrap();
        assert_eq!(config.assets, PathBuf::from("assets"));
        assert_eq!(config.fen, None);
        assert_eq!(config.window_size(), None);
        assert_eq!(config.engine().unwrap().side_to_move(), Color::White);
    }

    #[test]
    fn test_fen_and_size() {
        let config = Config::try_parse_from([
            "chess-board",
            "--assets",
            "/tmp/pieces",
            "--fen",
            "4k3/8/8/8/8/8/4p3/K6R b - - 0 1",
            "--width",
            "1024",
            "--height",
            "768",
        ])
        .unwrap();

        assert_eq!(config.assets, PathBuf::from("/tmp/pieces"));
        assert_eq!(config.window_size(), Some((1024, 768)));
        assert_eq!(config.engine().unwrap().side_to_move(), Color::Black);
    }

    #[test]
    fn test_width_requires_height() {
        assert!(Config::try_parse_from(["chess-board", "--width", "800"]).is_err());
        assert!(Config::try_parse_from(["chess-board", "--width", "0", "--height", "5"]).is_err());
    }

    #[test]
    fn test_bad_fen_is_an_engine_error() {
        let config = Config::try_parse_from(["chess-board", "--fen", "nonsense"]).unwrap();
        assert!(matches!(config.engine(), Err(EngineError::InvalidFen { .. })));
    }

    #[test]
    fn test_initial_window_size() {
        assert_eq!(initial_window_size(Some((640, 480)), Some((1920, 1080))), (640, 480));
        assert_eq!(initial_window_size(None, Some((1920, 1080))), (980, 980));
        assert_eq!(initial_window_size(None, Some((50, 50))), (1, 1));
        assert_eq!(initial_window_size(None, None), (800, 800));
    }
}
