use std::f64::consts::PI;

// clicks lost per step down the slot list
const POSITION_DECAY: f64 = 0.75;

/// Expected top-slot clicks in round `t`; the curve repeats every 48 rounds.
pub fn top_slot_clicks(t: usize) -> f64 {
    return (30.0 * (PI * t as f64 / 24.0).cos() + 50.0).round();
}

pub fn expected_clicks(t: usize, slot: usize) -> f64 {
    return top_slot_clicks(t) * POSITION_DECAY.powi(slot as i32);
}

/// Fraction of the remaining click volume expected in round `t` of a `num_rounds` auction.
/// `None` once no rounds remain.
pub fn pacing_share(t: usize, num_rounds: usize) -> Option<f64> {
    if t >= num_rounds {
        return None;
    }
    let remaining: f64 = (t..num_rounds).map(top_slot_clicks).sum();
    if remaining <= 0.0 {
        return None;
    }
    return Some(top_slot_clicks(t) / remaining);
}

#[cfg(test)]
mod tests {
    use crate::auction::pacing::{expected_clicks, pacing_share, top_slot_clicks};

    #[test]
    fn test_curve_shape() {
        assert_eq!(top_slot_clicks(0), 80.0);
        assert_eq!(top_slot_clicks(24), 20.0);
        assert_eq!(top_slot_clicks(48), 80.0);
        assert_eq!(expected_clicks(0, 2), 45.0);
    }

    #[test]
    fn test_last_round_takes_everything() {
        assert_eq!(pacing_share(47, 48), Some(1.0));
    }

    #[test]
    fn test_no_rounds_remaining() {
        assert_eq!(pacing_share(48, 48), None);
    }

    #[test]
    fn test_shares_are_fractions() {
        for t in 0..48 {
            let share = pacing_share(t, 48).unwrap();
            assert!(share > 0.0 && share <= 1.0);
        }
    }
}
