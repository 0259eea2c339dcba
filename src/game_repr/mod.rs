//! Chess vocabulary shared by the controller and the renderer, plus the
//! rules engine seam.

mod moves;
mod piece;
mod square;

pub mod engine;
pub mod shakmaty_engine;

pub use engine::{EngineError, RulesEngine};
pub use moves::*;
pub use piece::*;
pub use shakmaty_engine::ShakmatyEngine;
pub use square::*;
