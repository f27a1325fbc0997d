// Mecanum mixing for two-stick teleop
// Converts raw stick axes into four normalized wheel powers.

use super::curve::InputCurve;
use crate::motor::WheelPowers;

/// Largest wheel power the mixer will output
const MAX_POWER: f64 = 1.0;

/// Mix stick axes into wheel powers
///
/// Axis mapping: right X strafes, left X turns, and both Y axes add into
/// forward translation. Either stick alone drives straight; together they
/// double up before normalization.
///
/// # Arguments
/// * `left_x`, `left_y`, `right_x`, `right_y` - stick axes, nominally in [-1, 1]
/// * `curve` - shaping applied to every axis before mixing, if any
///
/// # Returns
/// Powers ordered front-left, front-right, rear-left, rear-right. If any wheel
/// would exceed 1.0 all four are scaled by the same factor, so the ratio
/// between wheels (and with it the turning rate) is kept.
pub fn mix(
    left_x: f64,
    left_y: f64,
    right_x: f64,
    right_y: f64,
    curve: Option<&InputCurve>,
) -> WheelPowers {
    let mut move_x = right_x;
    let mut move_y1 = left_y;
    let mut turn = left_x;
    let mut move_y2 = right_y;

    if let Some(curve) = curve {
        move_x = curve.apply(move_x);
        move_y1 = curve.apply(move_y1);
        turn = curve.apply(turn);
        move_y2 = curve.apply(move_y2);
    }

    let raw = WheelPowers::new(
        move_y1 + move_x + turn + move_y2,
        move_y1 - move_x - turn + move_y2,
        move_y1 + move_x - turn + move_y2,
        move_y1 - move_x + turn + move_y2,
    );

    normalize(raw)
}

/// Scale all wheels down together if any exceeds unit magnitude
///
/// A mix that overflowed to infinity has no usable ratio and yields zero.
pub fn normalize(powers: WheelPowers) -> WheelPowers {
    let max = powers.max_abs();
    if !powers.as_array().iter().all(|v| v.is_finite()) {
        WheelPowers::zero()
    } else if max > MAX_POWER {
        WheelPowers::from(powers.as_array().map(|v| v / max))
    } else {
        powers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn raw(left_x: f64, left_y: f64, right_x: f64, right_y: f64) -> [f64; 4] {
        let (x, y1, t, y2) = (right_x, left_y, left_x, right_y);
        [
            y1 + x + t + y2,
            y1 - x - t + y2,
            y1 + x - t + y2,
            y1 - x + t + y2,
        ]
    }

    #[test]
    fn test_zero_input() {
        let wheels = mix(0.0, 0.0, 0.0, 0.0, None);
        assert_eq!(wheels, WheelPowers::zero());
    }

    #[test]
    fn test_both_sticks_forward_normalizes_to_one() {
        // Raw mix is 2.0 on every wheel, scaled back to 1.0
        let wheels = mix(0.0, 1.0, 0.0, 1.0, None);
        assert_eq!(wheels.as_array(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_pure_turn() {
        let wheels = mix(1.0, 0.0, 0.0, 0.0, None);
        assert_eq!(wheels.as_array(), [1.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_pure_strafe() {
        let wheels = mix(0.0, 0.0, 0.5, 0.0, None);
        assert_eq!(wheels.as_array(), [0.5, -0.5, 0.5, -0.5]);
    }

    #[test]
    fn test_in_range_passes_through_unchanged() {
        let inputs = [
            (0.1, 0.2, 0.3, 0.1),
            (-0.25, 0.25, 0.0, 0.25),
            (0.0, -0.4, 0.2, -0.3),
        ];
        for (lx, ly, rx, ry) in inputs {
            let expected = raw(lx, ly, rx, ry);
            assert!(expected.iter().all(|v| v.abs() <= 1.0));
            assert_eq!(mix(lx, ly, rx, ry, None).as_array(), expected);
        }
    }

    #[test]
    fn test_output_bounded_and_ratios_kept() {
        let steps = [-1.0, -0.6, -0.2, 0.0, 0.3, 0.7, 1.0];
        for lx in steps {
            for ly in steps {
                for rx in steps {
                    for ry in steps {
                        let before = raw(lx, ly, rx, ry);
                        let after = mix(lx, ly, rx, ry, None).as_array();
                        let max = after.iter().fold(0.0f64, |m, v| m.max(v.abs()));
                        assert!(max <= 1.0 + EPS, "max {} for {:?}", max, (lx, ly, rx, ry));

                        for i in 0..4 {
                            for j in 0..4 {
                                if before[j].abs() > EPS {
                                    let r_before = before[i] / before[j];
                                    let r_after = after[i] / after[j];
                                    assert!(
                                        (r_before - r_after).abs() < 1e-9,
                                        "ratio v{}/v{} changed for {:?}",
                                        i + 1,
                                        j + 1,
                                        (lx, ly, rx, ry)
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_overflowing_mix_is_zeroed() {
        // 1e308 + 1e308 overflows to infinity before normalization
        let wheels = mix(0.0, 1e308, 0.0, 1e308, None);
        assert_eq!(wheels, WheelPowers::zero());

        let wheels = mix(-1e308, 0.0, 0.0, -1e308, None);
        assert!(wheels.as_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_huge_finite_input_still_normalized() {
        let wheels = mix(0.0, 1e300, 0.0, 0.0, None);
        assert_eq!(wheels.as_array(), [1.0; 4]);
    }

    #[test]
    fn test_curve_applied_before_mixing() {
        let wheels = mix(0.0, 0.5, 0.0, 0.0, Some(&InputCurve::Squared));
        println!("Half stick with squared curve: {:?}", wheels);
        assert_eq!(wheels.as_array(), [0.25, 0.25, 0.25, 0.25]);

        let wheels = mix(-0.5, 0.0, 0.0, 0.0, Some(&InputCurve::Squared));
        assert_eq!(wheels.as_array(), [-0.25, 0.25, 0.25, -0.25]);
    }
}
