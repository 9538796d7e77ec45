//! JSON-facing views of evaluation snapshots, for callers that cache or
//! ship evaluations out of process.

use serde::Serialize;
use shakmaty::Color;

use engine_core::eval::{EvaluatedPosition, MateSide};

/// One evaluated position, flattened for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct PositionReport {
    pub fen: String,
    pub side_to_move: String,
    pub best_moves: Vec<RankedMoveReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedMoveReport {
    #[serde(rename = "move")]
    pub move_uci: String,
    pub eval: String,
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_cp: Option<i32>,
    /// Signed mate distance: positive when the mover mates, negative when
    /// the mover gets mated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mate_in: Option<i32>,
}

impl From<&EvaluatedPosition> for PositionReport {
    fn from(position: &EvaluatedPosition) -> Self {
        Self {
            fen: position.fen.clone(),
            side_to_move: match position.color {
                Color::White => "white".to_string(),
                Color::Black => "black".to_string(),
            },
            best_moves: position
                .best_moves
                .iter()
                .map(|entry| RankedMoveReport {
                    move_uci: entry.mv.uci(),
                    eval: entry.evaluation.display(),
                    depth: entry.evaluation.depth,
                    score_cp: entry.evaluation.score,
                    mate_in: entry.evaluation.forced_mate.map(|fm| match fm.for_side {
                        MateSide::Player => fm.in_moves as i32,
                        MateSide::Opponent => -(fm.in_moves as i32),
                    }),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::eval::{Evaluation, MoveAndEvaluation, PieceMove};

    #[test]
    fn test_report_shape() {
        let position = EvaluatedPosition {
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
            color: Color::White,
            best_moves: vec![MoveAndEvaluation {
                mv: PieceMove {
                    color: Color::White,
                    from: "e2".to_string(),
                    to: "e4".to_string(),
                    promotion: None,
                },
                evaluation: Evaluation {
                    score: Some(35),
                    depth: 18,
                    ..Evaluation::default()
                },
            }],
        };

        let report = PositionReport::from(&position);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["side_to_move"], "white");
        assert_eq!(json["best_moves"][0]["move"], "e2e4");
        assert_eq!(json["best_moves"][0]["eval"], "+0.35");
        assert_eq!(json["best_moves"][0]["score_cp"], 35);
        assert!(json["best_moves"][0].get("mate_in").is_none());
    }
}
