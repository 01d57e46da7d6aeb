pub mod makeunmake;
pub mod movegen;
pub mod ordering;
pub mod types;

pub use types::{Move, MoveList, MAX_MOVES};
