//! Простая описательная статистика по выборкам f64.

pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

pub fn median(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (xs.len() - 1) as f64).sqrt())
}

/// Pearson correlation; `None` when lengths differ, n < 2 or a side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Trailing mean over `window` values; `None` until the window is full.
pub fn rolling_mean(xs: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; xs.len()];
    }
    (0..xs.len())
        .map(|i| {
            (i + 1 >= window).then(|| xs[i + 1 - window..=i].iter().sum::<f64>() / window as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn std_uses_sample_denominator() {
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).expect("std");
        assert_relative_eq!(s, 2.138089935299395, epsilon = 1e-12);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn pearson_perfect_and_degenerate() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert_relative_eq!(pearson(&x, &y).expect("r"), 1.0, epsilon = 1e-12);
        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert_relative_eq!(pearson(&x, &neg).expect("r"), -1.0, epsilon = 1e-12);
        assert_eq!(pearson(&x, &[1.0, 1.0, 1.0, 1.0]), None);
    }

    #[test]
    fn rolling_mean_waits_for_full_window() {
        let r = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(r, vec![None, None, Some(2.0), Some(3.0)]);
    }
}
