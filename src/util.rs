use crate::core_models::entities::Bandwidth;

/// Splits `total` into `parts` integral shares that differ by at most one and sum to `total`.
/// A fractional remainder of `total` goes to the first share.
pub fn even_split(total: Bandwidth, parts: usize) -> Vec<Bandwidth> {
    if parts == 0 || total <= 0.0 {
        return vec![0.0; parts];
    }
    let whole = total.floor();
    let base = (whole / parts as f64).floor();
    let leftover = (whole - base * parts as f64) as usize;
    let mut shares: Vec<Bandwidth> = (0..parts)
        .map(|idx| if idx < leftover { base + 1.0 } else { base })
        .collect();
    shares[0] += total - whole;
    return shares;
}

/// Number of regular unchoke slots for a given upload capacity.
pub fn unchoke_slots(capacity: Bandwidth) -> usize {
    if capacity < 1.0 {
        return 0;
    }
    return capacity.sqrt().floor() as usize;
}

pub fn argmax_index(values: &[f64]) -> Option<usize> {
    return values.iter()
        .enumerate()
        .filter(|(_idx, value)| !value.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (idx, value)| match best {
            Some((_, best_value)) if best_value >= *value => best,
            _ => Some((idx, *value)),
        })
        .map(|(idx, _value)| idx);
}
