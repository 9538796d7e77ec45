//! Pure building blocks of the engine communication layer: the UCI line
//! parser, the evaluation data model, and best-move ranking. No I/O here.

pub use shakmaty;

pub mod board;
pub mod compare;
pub mod eval;
pub mod ranking;
pub mod uci;
