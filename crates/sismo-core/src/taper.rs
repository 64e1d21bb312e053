//! Taper windows for suppressing truncation leakage at record edges.
//!
//! A taper of half-length `wlen` samples is taken from a symmetric window of
//! length `2 * wlen + 1`: its rising half multiplies the first `wlen` samples,
//! its falling half the last `wlen`, and everything in between is left alone.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window shape used for the taper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaperKind {
    /// Parzen (de la Vallée Poussin) window, cubic B-spline shape.
    #[default]
    Parzen,
    /// Hann window (raised cosine)
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// Sine ("cosine") window
    Cosine,
}

impl TaperKind {
    /// Symmetric window coefficients of length `size`.
    ///
    /// A window of length one is `[1.0]`.
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        if size <= 1 {
            return vec![1.0; size];
        }
        let m = size as f64;
        let span = m - 1.0;
        match self {
            TaperKind::Parzen => {
                let half = m / 2.0;
                let quarter = span / 4.0;
                (0..size)
                    .map(|i| {
                        let n = (i as f64 - span / 2.0).abs();
                        let r = n / half;
                        if n > quarter {
                            2.0 * (1.0 - r).powi(3)
                        } else {
                            1.0 - 6.0 * r * r + 6.0 * r * r * r
                        }
                    })
                    .collect()
            }
            TaperKind::Hann => (0..size)
                .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / span).cos())
                .collect(),
            TaperKind::Hamming => (0..size)
                .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / span).cos())
                .collect(),
            TaperKind::Blackman => (0..size)
                .map(|i| {
                    let x = 2.0 * PI * i as f64 / span;
                    0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
                })
                .collect(),
            TaperKind::Cosine => (0..size)
                .map(|i| (PI * (i as f64 + 0.5) / m).sin())
                .collect(),
        }
    }
}

/// Which edges of the trace are tapered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaperSide {
    /// Start of the trace only.
    Left,
    /// End of the trace only.
    Right,
    /// Both ends.
    #[default]
    Both,
}

/// Per-sample taper weights for a trace of `npts` samples with a half-length
/// of `wlen` samples. `wlen` is clamped to `npts / 2`.
pub fn taper_weights(kind: TaperKind, side: TaperSide, npts: usize, wlen: usize) -> Vec<f64> {
    let wlen = wlen.min(npts / 2);
    let mut weights = vec![1.0; npts];
    if wlen == 0 {
        return weights;
    }

    let sides_len = if 2 * wlen == npts { 2 * wlen } else { 2 * wlen + 1 };
    let sides = kind.coefficients(sides_len);

    if matches!(side, TaperSide::Left | TaperSide::Both) {
        weights[..wlen].copy_from_slice(&sides[..wlen]);
    }
    if matches!(side, TaperSide::Right | TaperSide::Both) {
        weights[npts - wlen..].copy_from_slice(&sides[sides_len - wlen..]);
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_symmetric() {
        for kind in [
            TaperKind::Parzen,
            TaperKind::Hann,
            TaperKind::Hamming,
            TaperKind::Blackman,
            TaperKind::Cosine,
        ] {
            let w = kind.coefficients(21);
            for i in 0..21 {
                assert!(
                    (w[i] - w[20 - i]).abs() < 1e-12,
                    "{kind:?} not symmetric at {i}"
                );
            }
            assert!((w[10] - 1.0).abs() < 1e-12, "{kind:?} peak is {}", w[10]);
        }
    }

    #[test]
    fn parzen_matches_reference_values() {
        // scipy.signal.windows.parzen(5)
        let w = TaperKind::Parzen.coefficients(5);
        let expected = [0.016, 0.424, 1.0, 0.424, 0.016];
        for (a, b) in w.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn hann_edges_are_zero() {
        let w = TaperKind::Hann.coefficients(11);
        assert!(w[0].abs() < 1e-12);
        assert!(w[10].abs() < 1e-12);
    }

    #[test]
    fn weights_only_touch_requested_side() {
        let left = taper_weights(TaperKind::Hann, TaperSide::Left, 100, 10);
        assert!(left[0] < 1e-12);
        assert_eq!(left[99], 1.0);
        assert!(left[10..].iter().all(|&w| w == 1.0));

        let right = taper_weights(TaperKind::Hann, TaperSide::Right, 100, 10);
        assert_eq!(right[0], 1.0);
        assert!(right[99] < 1e-12);
        assert!(right[..90].iter().all(|&w| w == 1.0));
    }

    #[test]
    fn half_length_clamped_to_half_trace() {
        let w = taper_weights(TaperKind::Parzen, TaperSide::Both, 10, 50);
        assert_eq!(w.len(), 10);
        assert!(w[0] < 0.1);
        assert!(w[9] < 0.1);
    }

    #[test]
    fn zero_length_is_identity() {
        let w = taper_weights(TaperKind::Parzen, TaperSide::Both, 10, 0);
        assert_eq!(w, vec![1.0; 10]);
    }
}
