//! Evaluation value types and their normalization from parsed info lines.
//!
//! Centipawn scores are stored relative to White (positive favors White,
//! whoever is to move). Mate distances are stored relative to the side to
//! move of the evaluated position.

use std::fmt;

use shakmaty::Color;

use crate::uci::{Info, Score};

/// Whose mate a mate evaluation belongs to, judged from the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MateSide {
    Player,
    Opponent,
}

/// Forced mate in `in_moves` moves for `for_side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedMate {
    pub in_moves: u32,
    pub for_side: MateSide,
}

/// One analysis verdict. At most one of `score`, `forced_mate`, and `mate`
/// is populated; `depth` is always present (0 when the engine reported none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// Centipawns, positive favors White.
    pub score: Option<i32>,
    pub forced_mate: Option<ForcedMate>,
    /// Mate already on the board for this side.
    pub mate: Option<MateSide>,
    pub depth: u32,
}

impl Evaluation {
    /// Normalize a parsed info line into the White-relative model.
    ///
    /// `color` is the side to move of the evaluated position. Centipawn
    /// scores arrive relative to that side and are flipped for Black;
    /// mate distances stay relative to the mover.
    pub fn from_info(info: &Info, color: Color) -> Evaluation {
        let depth = info.depth.unwrap_or(0);
        match info.score {
            Some(Score::Cp(cp)) => Evaluation {
                score: Some(if color == Color::White { cp } else { -cp }),
                depth,
                ..Evaluation::default()
            },
            Some(Score::Mate(m)) if m != 0 => Evaluation {
                forced_mate: Some(ForcedMate {
                    in_moves: m.unsigned_abs(),
                    for_side: if m > 0 {
                        MateSide::Player
                    } else {
                        MateSide::Opponent
                    },
                }),
                depth,
                ..Evaluation::default()
            },
            // mate 0: the mover is already checkmated
            Some(Score::Mate(_)) => Evaluation {
                mate: Some(MateSide::Opponent),
                depth,
                ..Evaluation::default()
            },
            None => Evaluation {
                depth,
                ..Evaluation::default()
            },
        }
    }

    /// Display string for evaluation badges: `+0.35`, `-1.20`, `M5`, `-M3`,
    /// `#` for mate on the board.
    pub fn display(&self) -> String {
        if let Some(fm) = self.forced_mate {
            return match fm.for_side {
                MateSide::Player => format!("M{}", fm.in_moves),
                MateSide::Opponent => format!("-M{}", fm.in_moves),
            };
        }
        if self.mate.is_some() {
            return "#".to_string();
        }
        match self.score {
            Some(cp) => format!("{:+.2}", f64::from(cp) / 100.0),
            None => "?".to_string(),
        }
    }
}

/// A move in coordinate notation, stamped with the color that plays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMove {
    pub color: Color,
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
}

impl PieceMove {
    /// Coordinate-notation text, e.g. `e2e4` or `e7e8q`. Two moves are the
    /// same move exactly when this text matches.
    pub fn uci(&self) -> String {
        match self.promotion {
            Some(p) => format!("{}{}{}", self.from, self.to, p),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for PieceMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uci())
    }
}

/// A candidate move paired with its evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveAndEvaluation {
    pub mv: PieceMove,
    pub evaluation: Evaluation,
}

impl MoveAndEvaluation {
    /// First move of the principal variation paired with the normalized
    /// evaluation. `None` when the info line carries no pv.
    pub fn from_info(info: &Info, color: Color) -> Option<MoveAndEvaluation> {
        let first = info.pv.as_ref()?.first()?;
        let from = first.get(0..2)?.to_string();
        let to = first.get(2..4)?.to_string();
        let promotion = first.chars().nth(4);
        Some(MoveAndEvaluation {
            mv: PieceMove {
                color,
                from,
                to,
                promotion,
            },
            evaluation: Evaluation::from_info(info, color),
        })
    }
}

/// Ranked analysis snapshot for one position; `best_moves` is best-first.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedPosition {
    pub fen: String,
    /// Side to move at `fen`.
    pub color: Color,
    pub best_moves: Vec<MoveAndEvaluation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uci::parse_info;

    #[test]
    fn test_cp_score_is_white_relative() {
        let info = parse_info("info depth 14 score cp 50");
        let white = Evaluation::from_info(&info, Color::White);
        assert_eq!(white.score, Some(50));
        assert_eq!(white.depth, 14);
        let black = Evaluation::from_info(&info, Color::Black);
        assert_eq!(black.score, Some(-50));
    }

    #[test]
    fn test_mate_score_is_mover_relative() {
        let info = parse_info("info depth 14 score mate 5");
        let eval = Evaluation::from_info(&info, Color::White);
        assert_eq!(
            eval.forced_mate,
            Some(ForcedMate {
                in_moves: 5,
                for_side: MateSide::Player
            })
        );
        assert_eq!(eval.score, None);

        let info = parse_info("info depth 14 score mate -10");
        let eval = Evaluation::from_info(&info, Color::White);
        assert_eq!(
            eval.forced_mate,
            Some(ForcedMate {
                in_moves: 10,
                for_side: MateSide::Opponent
            })
        );

        // same direction regardless of the mover's color
        let eval = Evaluation::from_info(&info, Color::Black);
        assert_eq!(
            eval.forced_mate,
            Some(ForcedMate {
                in_moves: 10,
                for_side: MateSide::Opponent
            })
        );
    }

    #[test]
    fn test_mate_zero_marks_the_mover_mated() {
        let info = parse_info("info depth 0 score mate 0");
        let eval = Evaluation::from_info(&info, Color::White);
        assert_eq!(eval.mate, Some(MateSide::Opponent));
        assert_eq!(eval.forced_mate, None);
        assert_eq!(eval.score, None);
    }

    #[test]
    fn test_scoreless_info_keeps_depth_only() {
        let info = parse_info("info depth 3 currmove e2e4 currmovenumber 1");
        let eval = Evaluation::from_info(&info, Color::White);
        assert_eq!(eval, Evaluation { depth: 3, ..Evaluation::default() });
    }

    #[test]
    fn test_move_from_pv() {
        let info = parse_info("info depth 20 score cp 35 pv e2e4 e7e5");
        let entry = MoveAndEvaluation::from_info(&info, Color::White).unwrap();
        assert_eq!(entry.mv.from, "e2");
        assert_eq!(entry.mv.to, "e4");
        assert_eq!(entry.mv.promotion, None);
        assert_eq!(entry.mv.uci(), "e2e4");
        assert_eq!(entry.evaluation.score, Some(35));
    }

    #[test]
    fn test_move_from_pv_with_promotion() {
        let info = parse_info("info depth 20 score cp 900 pv e7e8q");
        let entry = MoveAndEvaluation::from_info(&info, Color::White).unwrap();
        assert_eq!(entry.mv.uci(), "e7e8q");
        assert_eq!(entry.mv.promotion, Some('q'));
    }

    #[test]
    fn test_missing_pv_yields_no_move() {
        let info = parse_info("info depth 20 score cp 35");
        assert!(MoveAndEvaluation::from_info(&info, Color::White).is_none());
        let info = parse_info("info depth 20 score cp 35 pv");
        assert!(MoveAndEvaluation::from_info(&info, Color::White).is_none());
    }

    #[test]
    fn test_display_strings() {
        let eval = Evaluation { score: Some(35), depth: 20, ..Evaluation::default() };
        assert_eq!(eval.display(), "+0.35");
        let eval = Evaluation { score: Some(-120), depth: 20, ..Evaluation::default() };
        assert_eq!(eval.display(), "-1.20");
        let eval = Evaluation {
            forced_mate: Some(ForcedMate { in_moves: 5, for_side: MateSide::Player }),
            depth: 20,
            ..Evaluation::default()
        };
        assert_eq!(eval.display(), "M5");
        let eval = Evaluation {
            forced_mate: Some(ForcedMate { in_moves: 3, for_side: MateSide::Opponent }),
            depth: 20,
            ..Evaluation::default()
        };
        assert_eq!(eval.display(), "-M3");
        let eval = Evaluation { mate: Some(MateSide::Opponent), ..Evaluation::default() };
        assert_eq!(eval.display(), "#");
    }
}
