//! Degree-based angle helpers
//!
//! All rotations in the simulation are stored in degrees in [0, 360).
//! Turning always takes the shortest (≤180°) path.

/// Wrap an angle into [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest difference `target - current`, in [-180, 180]
#[inline]
pub fn shortest_angle_diff(current: f32, target: f32) -> f32 {
    let mut diff = (target - current).rem_euclid(360.0);
    if diff > 180.0 {
        diff -= 360.0;
    }
    diff
}

/// Turn `current` toward `target` by at most `max_step` degrees.
/// Result is normalized to [0, 360).
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = shortest_angle_diff(current, target);
    if diff.abs() <= max_step {
        normalize_degrees(target)
    } else {
        normalize_degrees(current + max_step.copysign(diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < EPSILON);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < EPSILON);
        assert!((normalize_degrees(720.0)).abs() < EPSILON);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(f32::NAN), 0.0);
    }

    #[test]
    fn test_normalize_tiny_negative_stays_in_range() {
        let a = normalize_degrees(-1e-7);
        assert!((0.0..360.0).contains(&a));
    }

    #[test]
    fn test_shortest_diff_wraps() {
        assert!((shortest_angle_diff(350.0, 10.0) - 20.0).abs() < EPSILON);
        assert!((shortest_angle_diff(10.0, 350.0) + 20.0).abs() < EPSILON);
        assert!((shortest_angle_diff(0.0, 180.0).abs() - 180.0).abs() < EPSILON);
        assert!((shortest_angle_diff(90.0, -90.0).abs() - 180.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotate_towards_caps_step() {
        let r = rotate_towards(0.0, 90.0, 30.0);
        assert!((r - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotate_towards_crosses_zero() {
        // 350 -> 20 should go up through 0, not down through 180
        let r = rotate_towards(350.0, 20.0, 15.0);
        assert!((r - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotate_towards_snaps_when_close() {
        let r = rotate_towards(100.0, 105.0, 30.0);
        assert!((r - 105.0).abs() < EPSILON);
        let r = rotate_towards(100.0, -170.0, 120.0);
        assert!((r - 190.0).abs() < EPSILON);
    }
}
