//! Board helpers: side-to-move extraction and coordinate-move replay.
//!
//! The engine layer treats a FEN as an opaque key; the only field it reads
//! itself is the side to move. Full position parsing happens once per
//! finished analysis, to validate the engine's moves before they are handed
//! back to the caller.

use shakmaty::{fen::Fen, CastlingMode, Chess, Color, Move, Position};
use thiserror::Error;

use crate::eval::{MoveAndEvaluation, PieceMove};

#[derive(Error, Debug)]
pub enum PositionError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },
}

/// Side to move from FEN field 2. The rest of the string is not validated.
pub fn side_to_move(fen: &str) -> Result<Color, PositionError> {
    match fen.split_whitespace().nth(1) {
        Some("w") => Ok(Color::White),
        Some("b") => Ok(Color::Black),
        _ => Err(PositionError::InvalidFen(fen.to_string())),
    }
}

/// Parse a FEN into a playable position.
pub fn position_from_fen(fen: &str) -> Result<Chess, PositionError> {
    let parsed: Fen = fen
        .parse()
        .map_err(|_| PositionError::InvalidFen(fen.to_string()))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|_| PositionError::InvalidFen(fen.to_string()))
}

/// Find the legal move whose coordinate text matches `mv`.
pub fn matching_legal_move(pos: &Chess, mv: &PieceMove) -> Option<Move> {
    let uci = mv.uci();
    pos.legal_moves()
        .into_iter()
        .find(|m| m.to_uci(CastlingMode::Standard).to_string() == uci)
}

/// Replay each ranked move against the position at `fen`, stamping it with
/// the mover's color. Fails if any move is not legal in the position, which
/// means the engine's response did not match the request.
pub fn decorate_moves(
    fen: &str,
    moves: &mut [MoveAndEvaluation],
) -> Result<(), PositionError> {
    if moves.is_empty() {
        return Ok(());
    }
    let pos = position_from_fen(fen)?;
    let color = pos.turn();
    for entry in moves.iter_mut() {
        if matching_legal_move(&pos, &entry.mv).is_none() {
            return Err(PositionError::IllegalMove {
                mv: entry.mv.uci(),
                fen: fen.to_string(),
            });
        }
        entry.mv.color = color;
    }
    Ok(())
}
