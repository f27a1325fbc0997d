// Joystick input curves
//
// Applied to each stick axis before mixing. Every curve is odd and passes
// through zero. All but `SquareRoot` keep |f(x)| <= |x| inside [-1, 1].

use serde::{Deserialize, Serialize};

/// Shaping function for stick input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputCurve {
    /// f(x) = x
    Linear,
    /// f(x) = sign(x) * x^2
    #[default]
    Squared,
    /// f(x) = x^3
    Cubic,
    /// f(x) = sign(x) * sqrt(|x|)
    ///
    /// Note: boosts small inputs, so it does not satisfy |f(x)| <= |x|.
    SquareRoot,
    /// Zero inside |x| < threshold, linear outside
    Deadband { threshold: f64 },
}

impl InputCurve {
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            InputCurve::Linear => x,
            InputCurve::Squared => shaped(x),
            InputCurve::Cubic => x * x * x,
            InputCurve::SquareRoot => x.signum() * x.abs().sqrt(),
            InputCurve::Deadband { threshold } => {
                if x.abs() < threshold {
                    0.0
                } else {
                    x
                }
            }
        }
    }
}

/// Sign-preserving square, the default drive curve
pub fn shaped(x: f64) -> f64 {
    let value = x * x;
    if x < 0.0 { -value } else { value }
}
