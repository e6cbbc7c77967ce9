//! Demand shares, aggregate demand and price adjustment.

use super::score::ScoreMatrix;

/// Turn one household's option utilities into choice shares summing to one.
///
/// Feasible options share demand by a logit on utility with the given
/// `sensitivity`; infeasible options (`None`) get nothing. When every option
/// is infeasible the shares are uniform. Equal utilities get equal shares.
#[must_use]
pub fn choice_shares(utilities: &[Option<f64>], sensitivity: f64) -> Vec<f64> {
    if utilities.is_empty() {
        return Vec::new();
    }
    let best = utilities
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if best == f64::NEG_INFINITY {
        let uniform = 1.0 / utilities.len() as f64;
        return vec![uniform; utilities.len()];
    }
    // Shift by the best utility so the largest weight is exactly one.
    let weights: Vec<f64> = utilities
        .iter()
        .map(|u| u.map_or(0.0, |u| (sensitivity * (u - best)).exp()))
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Expected number of households choosing each dwelling row.
///
/// The reservation option, when present, absorbs its share without adding to
/// any row.
#[must_use]
pub fn aggregate_demand(scores: &ScoreMatrix, counts: &[u64], sensitivity: f64) -> Vec<f64> {
    let rows = scores.housing().len();
    let offset = usize::from(scores.has_reservation());
    let mut demand = vec![0.0; rows];
    for (col, &count) in counts.iter().enumerate() {
        let shares = choice_shares(&scores.column(col), sensitivity);
        let weight = count as f64;
        for (row, slot) in demand.iter_mut().enumerate() {
            *slot += shares[row + offset] * weight;
        }
    }
    demand
}

/// Relative excess demand, clipped to `[-1, 1]`.
#[must_use]
pub fn imbalance(demand: f64, supply: f64) -> f64 {
    if supply <= 0.0 {
        return if demand > 0.0 { 1.0 } else { 0.0 };
    }
    ((demand - supply) / supply).clamp(-1.0, 1.0)
}

/// Move a price in the direction of excess demand.
#[must_use]
pub fn adjust_price(price: f64, imbalance: f64, step_size: f64) -> f64 {
    (price * (1.0 + imbalance * step_size)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(shares: &[f64]) -> f64 {
        shares.iter().sum()
    }

    #[test]
    fn shares_sum_to_one() {
        let shares = choice_shares(&[Some(1.2), Some(0.4), None, Some(2.0)], 3.0);
        assert!((total(&shares) - 1.0).abs() < 1e-12);
        assert_eq!(shares[2], 0.0);
        assert!(shares[3] > shares[0] && shares[0] > shares[1]);
    }

    #[test]
    fn all_infeasible_is_uniform() {
        let shares = choice_shares(&[None, None, None, None], 5.0);
        assert_eq!(shares, vec![0.25; 4]);
    }

    #[test]
    fn ties_split_evenly() {
        let shares = choice_shares(&[Some(0.7), Some(0.7), None], 50.0);
        assert_eq!(shares[0], shares[1]);
        assert!((shares[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn large_utility_gaps_do_not_overflow() {
        let shares = choice_shares(&[Some(1000.0), Some(0.0)], 10.0);
        assert!((shares[0] - 1.0).abs() < 1e-12);
        assert!(shares.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn zero_sensitivity_ignores_utility() {
        let shares = choice_shares(&[Some(3.0), Some(0.1)], 0.0);
        assert_eq!(shares, vec![0.5, 0.5]);
    }

    #[test]
    fn imbalance_is_clipped() {
        assert_eq!(imbalance(500.0, 100.0), 1.0);
        assert_eq!(imbalance(0.0, 100.0), -1.0);
        assert!((imbalance(110.0, 100.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn price_moves_with_imbalance() {
        assert!((adjust_price(200.0, 0.1, 0.5) - 210.0).abs() < 1e-9);
        assert!((adjust_price(200.0, -0.1, 0.5) - 190.0).abs() < 1e-9);
        assert_eq!(adjust_price(200.0, 0.0, 0.5), 200.0);
    }
}
