//! Two-player game representations.

mod extensive;
mod strategic;

pub use extensive::{ExtensiveGame, GameNode};
pub use strategic::StrategicGame;
