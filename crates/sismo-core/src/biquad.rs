//! Biquad (second-order section) filter structure.
//!
//! The Butterworth designs in [`crate::butterworth`] are realised as a cascade
//! of these sections.

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// A first-order section is a biquad with `b2 = a2 = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f64,
    b1: f64,
    b2: f64,

    /// Feedback coefficients
    a1: f64,
    a2: f64,

    /// Input delay line: x[n-1], x[n-2]
    x1: f64,
    x2: f64,

    /// Output delay line: y[n-1], y[n-2]
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Creates a biquad from coefficients, normalizing by `a0`.
    pub fn from_coefficients(b: [f64; 3], a: [f64; 3]) -> Self {
        let mut biquad = Self::new();
        biquad.set_coefficients(b[0], b[1], b[2], a[0], a[1], a[2]);
        biquad
    }

    /// Sets the biquad coefficients.
    ///
    /// # Arguments
    ///
    /// * `b0, b1, b2` - Feedforward coefficients
    /// * `a0, a1, a2` - Feedback coefficients (a0 is typically 1.0)
    ///
    /// Note: This function normalizes by a0 internally.
    pub fn set_coefficients(&mut self, b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Normalized coefficients as `([b0, b1, b2], [1, a1, a2])`.
    pub fn coefficients(&self) -> ([f64; 3], [f64; 3]) {
        ([self.b0, self.b1, self.b2], [1.0, self.a1, self.a2])
    }

    /// Multiplies the feedforward coefficients by `gain`.
    pub fn scale(&mut self, gain: f64) {
        self.b0 *= gain;
        self.b1 *= gain;
        self.b2 *= gain;
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Filters a buffer in place, starting from the current state.
    pub fn process_block(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the filter state (delay lines).
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        let mut bq = Biquad::new();
        for x in [1.0, -2.0, 0.5] {
            assert_eq!(bq.process(x), x);
        }
    }

    #[test]
    fn test_normalizes_by_a0() {
        let bq = Biquad::from_coefficients([2.0, 4.0, 6.0], [2.0, 1.0, 0.5]);
        let (b, a) = bq.coefficients();
        assert_eq!(b, [1.0, 2.0, 3.0]);
        assert_eq!(a, [1.0, 0.5, 0.25]);
    }

    #[test]
    fn test_one_pole_impulse_response() {
        // y[n] = x[n] + 0.5 y[n-1]
        let mut bq = Biquad::from_coefficients([1.0, 0.0, 0.0], [1.0, -0.5, 0.0]);
        let mut buf = vec![1.0, 0.0, 0.0, 0.0];
        bq.process_block(&mut buf);
        assert_eq!(buf, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_clear_resets_state() {
        let mut bq = Biquad::from_coefficients([1.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        bq.process(3.0);
        bq.clear();
        assert_eq!(bq.process(1.0), 1.0);
    }
}
