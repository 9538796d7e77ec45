//! Best-move ranking: deduplication, depth filtering, and color-relative
//! ordering of candidate moves.

use std::collections::HashMap;

use shakmaty::Color;

use crate::compare::by_keys;
use crate::eval::{MateSide, MoveAndEvaluation};

/// Order candidates best-first for the given side to move.
///
/// Candidates arrive in engine message order; when the same move is reported
/// more than once the later report wins (later messages refine earlier ones).
/// Only candidates at the deepest search depth present in the deduplicated
/// set survive. Ties keep their deduplicated order.
pub fn select_best_moves(
    color: Color,
    candidates: &[MoveAndEvaluation],
) -> Vec<MoveAndEvaluation> {
    let mut deduped: Vec<MoveAndEvaluation> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for candidate in candidates {
        match slots.get(&candidate.mv.uci()) {
            Some(&slot) => deduped[slot] = candidate.clone(),
            None => {
                slots.insert(candidate.mv.uci(), deduped.len());
                deduped.push(candidate.clone());
            }
        }
    }

    let Some(max_depth) = deduped.iter().map(|c| c.evaluation.depth).max() else {
        return Vec::new();
    };
    deduped.retain(|c| c.evaluation.depth == max_depth);

    let factor = match color {
        Color::White => 1.0,
        Color::Black => -1.0,
    };
    let comparator = by_keys::<MoveAndEvaluation>(vec![
        // fastest mate delivered by the mover first
        Box::new(|c| match c.evaluation.forced_mate {
            Some(fm) if fm.for_side == MateSide::Player => f64::from(fm.in_moves),
            _ => f64::INFINITY,
        }),
        // then the best color-relative score
        Box::new(move |c| match c.evaluation.score {
            Some(cp) => -(f64::from(cp) * factor),
            None => f64::INFINITY,
        }),
        // then the furthest-off mate against the mover
        Box::new(|c| match c.evaluation.forced_mate {
            Some(fm) if fm.for_side == MateSide::Opponent => -f64::from(fm.in_moves),
            _ => f64::INFINITY,
        }),
    ]);
    deduped.sort_by(|a, b| comparator(a, b));

    // re-derive the surviving depth from the sorted head and drop stragglers
    if let Some(front) = deduped.first() {
        let depth = front.evaluation.depth;
        deduped.retain(|c| c.evaluation.depth >= depth);
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{Evaluation, ForcedMate, PieceMove};

    fn candidate(uci: &str, evaluation: Evaluation) -> MoveAndEvaluation {
        MoveAndEvaluation {
            mv: PieceMove {
                color: Color::White,
                from: uci[0..2].to_string(),
                to: uci[2..4].to_string(),
                promotion: uci.chars().nth(4),
            },
            evaluation,
        }
    }

    fn scored(uci: &str, cp: i32, depth: u32) -> MoveAndEvaluation {
        candidate(uci, Evaluation { score: Some(cp), depth, ..Evaluation::default() })
    }

    fn mating(uci: &str, in_moves: u32, for_side: MateSide, depth: u32) -> MoveAndEvaluation {
        candidate(
            uci,
            Evaluation {
                forced_mate: Some(ForcedMate { in_moves, for_side }),
                depth,
                ..Evaluation::default()
            },
        )
    }

    #[test]
    fn test_higher_score_ranks_first_for_white() {
        let ranked = select_best_moves(
            Color::White,
            &[scored("d2d4", 10, 14), scored("e2e4", 30, 14)],
        );
        assert_eq!(ranked[0].mv.uci(), "e2e4");
        assert_eq!(ranked[1].mv.uci(), "d2d4");
    }

    #[test]
    fn test_score_sign_flips_for_black() {
        // scores are White-relative, so Black prefers the most negative
        let ranked = select_best_moves(
            Color::Black,
            &[scored("e7e5", -40, 14), scored("d7d5", 25, 14)],
        );
        assert_eq!(ranked[0].mv.uci(), "e7e5");
    }

    #[test]
    fn test_score_outranks_losing_side_of_forced_mate() {
        let good_score = scored("e2e4", 200, 14);
        let losing_mate = mating("d2d4", 10, MateSide::Opponent, 14);
        let ranked = select_best_moves(Color::White, &[good_score.clone(), losing_mate.clone()]);
        assert_eq!(ranked, vec![good_score, losing_mate]);
    }

    #[test]
    fn test_faster_mate_for_the_mover_ranks_first() {
        let ranked = select_best_moves(
            Color::White,
            &[
                mating("d2d4", 10, MateSide::Player, 14),
                mating("e2e4", 5, MateSide::Player, 14),
            ],
        );
        assert_eq!(ranked[0].mv.uci(), "e2e4");
    }

    #[test]
    fn test_mate_for_the_mover_outranks_any_score() {
        let ranked = select_best_moves(
            Color::White,
            &[scored("d2d4", 900, 14), mating("e2e4", 12, MateSide::Player, 14)],
        );
        assert_eq!(ranked[0].mv.uci(), "e2e4");
    }

    #[test]
    fn test_furthest_losing_mate_ranks_first_among_losing_mates() {
        let ranked = select_best_moves(
            Color::White,
            &[
                mating("d2d4", 3, MateSide::Opponent, 14),
                mating("e2e4", 8, MateSide::Opponent, 14),
            ],
        );
        assert_eq!(ranked[0].mv.uci(), "e2e4");
        assert_eq!(ranked[1].mv.uci(), "d2d4");
    }

    #[test]
    fn test_shallower_candidates_are_dropped() {
        let ranked = select_best_moves(
            Color::White,
            &[scored("e2e4", 500, 11), scored("d2d4", 10, 12)],
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].mv.uci(), "d2d4");
    }

    #[test]
    fn test_duplicate_move_keeps_the_later_report() {
        let ranked = select_best_moves(
            Color::White,
            &[
                scored("e2e4", 30, 12),
                scored("d2d4", 20, 12),
                scored("e2e4", -15, 12),
            ],
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].mv.uci(), "d2d4");
        assert_eq!(ranked[1].mv.uci(), "e2e4");
        assert_eq!(ranked[1].evaluation.score, Some(-15));
    }

    #[test]
    fn test_duplicate_at_deeper_depth_supersedes() {
        // the refined report raises the max depth, evicting stale peers
        let ranked = select_best_moves(
            Color::White,
            &[
                scored("e2e4", 30, 11),
                scored("d2d4", 40, 11),
                scored("e2e4", 35, 12),
            ],
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].mv.uci(), "e2e4");
        assert_eq!(ranked[0].evaluation.depth, 12);
    }

    #[test]
    fn test_promotion_distinguishes_moves() {
        let ranked = select_best_moves(
            Color::White,
            &[scored("e7e8q", 900, 12), scored("e7e8n", 150, 12)],
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].mv.uci(), "e7e8q");
    }

    #[test]
    fn test_empty_input() {
        assert!(select_best_moves(Color::White, &[]).is_empty());
    }
}
