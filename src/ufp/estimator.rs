//! Deterministic match outcome estimate from two teams' goal figures.
//!
//! Each side's expected goals (xG) is the average of its own scoring rate and
//! the opponent's conceding rate:
//!
//! ```text
//!   xg_home = (home.scored + away.conceded) / 2
//!   xg_away = (away.scored + home.conceded) / 2
//! ```
//!
//! Win probabilities are each side's share of the total xG, rounded half-up
//! to two decimals. The draw figure is whatever is left after subtracting the
//! two *rounded* win figures, so the three values need not sum to exactly
//! 1.00 before that final subtraction.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{ExpectedGoals, MatchEstimate, Scoreline, TeamStats};

/// Each side must exceed this xG for "both teams to score".
const BTTS_THRESHOLD: f64 = 0.8;

/// Total xG must exceed this for "over 2.5 goals".
const OVER_LINE: f64 = 2.5;

/// Binary noise below this many decimals is dropped before the half-up step,
/// so 0.145 (stored as 0.14499..) still rounds to 0.15.
const NOISE_DP: u32 = 9;

/// Compute the outcome bundle for `home` vs `away`.
///
/// Total and deterministic. When the combined xG is zero (only possible when
/// all four figures are zero) the 1X2 triple falls back to uniform thirds.
pub fn estimate(home: &TeamStats, away: &TeamStats) -> MatchEstimate {
    let xg_home = (home.goals_scored + away.goals_conceded) / 2.0;
    let xg_away = (away.goals_scored + home.goals_conceded) / 2.0;
    let total = xg_home + xg_away;

    let (share_home, share_away) = if total > 0.0 && total.is_finite() {
        (xg_home / total, xg_away / total)
    } else {
        (1.0 / 3.0, 1.0 / 3.0)
    };

    let home_win = round2(share_home);
    let away_win = round2(share_away);
    // Independent rounding can push the two win figures to 1.01; the clamp
    // takes precedence over the subtraction.
    let draw = round2(1.0 - home_win - away_win).max(0.0);

    MatchEstimate {
        home_win,
        draw,
        away_win,
        both_teams_to_score: xg_home > BTTS_THRESHOLD && xg_away > BTTS_THRESHOLD,
        over_2_5: total > OVER_LINE,
        predicted_score: Scoreline {
            home: whole_goals(xg_home),
            away: whole_goals(xg_away),
        },
        expected_goals: ExpectedGoals {
            home: round2(xg_home),
            away: round2(xg_away),
        },
    }
}

/// Half-up to two decimals; never returns `-0.0`.
fn round2(x: f64) -> f64 {
    half_up(x, 2)
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| (x * 100.0).round() / 100.0)
        + 0.0
}

fn whole_goals(xg: f64) -> u32 {
    half_up(xg.max(0.0), 0)
        .and_then(|d| d.to_u32())
        .unwrap_or(0)
}

/// Decimal half-up rounding of `x` to `dp` places. `None` for non-finite or
/// out-of-range input.
fn half_up(x: f64, dp: u32) -> Option<Decimal> {
    let d = Decimal::from_f64(x)?.round_dp(NOISE_DP);
    Some(d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats(scored: f64, conceded: f64) -> TeamStats {
        TeamStats::new(scored, conceded)
    }

    #[test]
    fn test_reference_example() {
        let e = estimate(&stats(2.0, 1.0), &stats(1.0, 1.0));
        assert_relative_eq!(e.home_win, 0.6, epsilon = 1e-9);
        assert_relative_eq!(e.away_win, 0.4, epsilon = 1e-9);
        assert_relative_eq!(e.draw, 0.0, epsilon = 1e-9);
        assert!(e.both_teams_to_score);
        assert!(!e.over_2_5, "2.5 exactly is not over");
        assert_eq!(e.predicted_score, Scoreline { home: 2, away: 1 });
        assert_relative_eq!(e.expected_goals.home, 1.5, epsilon = 1e-9);
        assert_relative_eq!(e.expected_goals.away, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_draw_is_remainder_of_rounded_wins() {
        let inputs = [
            (1.3, 0.7, 0.9, 1.6),
            (2.0, 2.0, 2.0, 2.0),
            (0.1, 3.0, 2.7, 0.4),
            (5.0, 0.0, 0.0, 5.0),
            (1.0, 1.0, 0.0, 0.0),
        ];
        for (a_s, a_c, b_s, b_c) in inputs {
            let e = estimate(&stats(a_s, a_c), &stats(b_s, b_c));
            assert!((0.0..=1.0).contains(&e.home_win));
            assert!((0.0..=1.0).contains(&e.away_win));
            assert_relative_eq!(e.draw, round2(1.0 - e.home_win - e.away_win), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = stats(1.7, 0.9);
        let b = stats(1.2, 1.4);
        assert_eq!(estimate(&a, &b), estimate(&a, &b));
    }

    #[test]
    fn test_zero_total_falls_back_to_thirds() {
        let e = estimate(&stats(0.0, 0.0), &stats(0.0, 0.0));
        assert_relative_eq!(e.home_win, 0.33, epsilon = 1e-9);
        assert_relative_eq!(e.away_win, 0.33, epsilon = 1e-9);
        assert_relative_eq!(e.draw, 0.34, epsilon = 1e-9);
        assert!(!e.both_teams_to_score);
        assert!(!e.over_2_5);
        assert_eq!(e.predicted_score, Scoreline { home: 0, away: 0 });
    }

    #[test]
    fn test_btts_boundary_is_strict() {
        // xg_home = (0.8 + 0.8) / 2 = 0.8
        let e = estimate(&stats(0.8, 1.0), &stats(1.0, 0.8));
        assert!(!e.both_teams_to_score);

        let e = estimate(&stats(0.9, 1.0), &stats(1.0, 0.8));
        assert!(e.both_teams_to_score);
    }

    #[test]
    fn test_over_line_is_strict() {
        // total = 1.5 + 1.0 = 2.5
        assert!(!estimate(&stats(2.0, 1.0), &stats(1.0, 1.0)).over_2_5);
        // total = 1.5 + 1.25 = 2.75
        assert!(estimate(&stats(2.0, 1.5), &stats(1.0, 1.0)).over_2_5);
    }

    #[test]
    fn test_draw_clamped_when_rounding_overshoots() {
        // shares 0.125 / 0.875 round to 0.13 / 0.88
        let e = estimate(&stats(1.0, 7.0), &stats(7.0, 1.0));
        assert_relative_eq!(e.home_win, 0.13, epsilon = 1e-9);
        assert_relative_eq!(e.away_win, 0.88, epsilon = 1e-9);
        assert_relative_eq!(e.draw, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_one_sided_match() {
        // xg_home = 3.0, xg_away = 0.0
        let e = estimate(&stats(3.0, 0.0), &stats(0.0, 3.0));
        assert_relative_eq!(e.home_win, 1.0, epsilon = 1e-9);
        assert_relative_eq!(e.away_win, 0.0, epsilon = 1e-9);
        assert_relative_eq!(e.draw, 0.0, epsilon = 1e-9);
        assert!(e.draw.is_sign_positive());
        assert_eq!(e.predicted_score, Scoreline { home: 3, away: 0 });
    }

    #[test]
    fn test_round2_half_up() {
        assert_relative_eq!(round2(0.125), 0.13, epsilon = 1e-9);
        assert_relative_eq!(round2(1.0 / 3.0), 0.33, epsilon = 1e-9);
        assert!(round2(-1e-17).is_sign_positive());
    }

    #[test]
    fn test_round2_decimal_ties() {
        // neither tie is exact in binary
        assert_relative_eq!(round2(0.145), 0.15, epsilon = 1e-9);
        assert_relative_eq!(round2(0.575), 0.58, epsilon = 1e-9);
        assert_relative_eq!(round2(1.005), 1.01, epsilon = 1e-9);
    }

    #[test]
    fn test_decimal_tie_share_rounds_up() {
        // xg 0.29 / 1.71, shares 0.145 / 0.855
        let e = estimate(&stats(0.29, 1.71), &stats(1.71, 0.29));
        assert_relative_eq!(e.home_win, 0.15, epsilon = 1e-9);
        assert_relative_eq!(e.away_win, 0.86, epsilon = 1e-9);
        assert_relative_eq!(e.draw, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_whole_goals_rounds_half_up() {
        assert_eq!(whole_goals(1.5), 2);
        assert_eq!(whole_goals(2.49), 2);
        assert_eq!(whole_goals(0.0), 0);
        assert_eq!(whole_goals(-0.4), 0);
        assert_eq!(whole_goals(f64::NAN), 0);
    }
}
