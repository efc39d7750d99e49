use crate::error::{RepError, RepResult};
use crate::pose::Point;

/// これより短いベクトルは向きが定まらない
const MIN_ARM_LENGTH: f32 = 1e-6;

/// 関節角度（度）
///
/// `b` を支点とした a-b-c の内角を [0, 180] で返す。
/// B→A と B→C の方向角の差を取り、負なら +360、180 を超えたら 360 から引く。
/// a と c を入れ替えても結果は変わらない。
///
/// 点が重なっている、または非有限の座標を含む場合は `DegenerateGeometry`。
/// NaN は返さない。
pub fn joint_angle(a: Point, b: Point, c: Point) -> RepResult<f32> {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Err(RepError::DegenerateGeometry);
    }
    if a.distance(&b) < MIN_ARM_LENGTH || c.distance(&b) < MIN_ARM_LENGTH {
        return Err(RepError::DegenerateGeometry);
    }

    let to_a = f32::atan2(a.y - b.y, a.x - b.x);
    let to_c = f32::atan2(c.y - b.y, c.x - b.x);

    let mut degrees = (to_c - to_a).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    finite(degrees.clamp(0.0, 180.0))
}

/// 線分の水平からの傾き（度, [0, 90]）
///
/// 画像座標の上下・左右の向きには依存しない。
pub fn inclination_from_horizontal(from: Point, to: Point) -> RepResult<f32> {
    if !(from.is_finite() && to.is_finite()) {
        return Err(RepError::DegenerateGeometry);
    }
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if dx < MIN_ARM_LENGTH && dy < MIN_ARM_LENGTH {
        return Err(RepError::DegenerateGeometry);
    }
    finite(f32::atan2(dy, dx).to_degrees())
}

fn finite(degrees: f32) -> RepResult<f32> {
    if degrees.is_finite() {
        Ok(degrees)
    } else {
        Err(RepError::DegenerateGeometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_straight_limb() {
        let angle = joint_angle(p(0.0, 0.0), p(0.5, 0.0), p(1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(p(0.0, 0.0), p(0.5, 0.0), p(0.5, 0.5)).unwrap();
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_folded_limb() {
        let angle = joint_angle(p(1.0, 0.0), p(0.0, 0.0), p(2.0, 0.0)).unwrap();
        assert!(angle.abs() < 1e-3);
    }

    #[test]
    fn test_reflex_is_normalized() {
        // 方向角の差が 270° になるケース → 90°
        let angle = joint_angle(p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-3);
        // 差が -200° 付近になるケース
        let angle = joint_angle(p(-1.0, 0.1), p(0.0, 0.0), p(1.0, 0.1)).unwrap();
        assert!(angle > 0.0 && angle < 180.0);
    }

    #[test]
    fn test_swap_endpoints_symmetric() {
        let triples = [
            (p(0.3, 0.1), p(0.5, 0.5), p(0.9, 0.7)),
            (p(-2.0, 3.0), p(1.0, 1.0), p(4.0, -5.0)),
            (p(0.45, 0.52), p(0.5, 0.7), p(0.48, 0.9)),
            (p(10.0, 0.0), p(0.0, 0.0), p(-10.0, -0.01)),
        ];
        for (a, b, c) in triples {
            let forward = joint_angle(a, b, c).unwrap();
            let backward = joint_angle(c, b, a).unwrap();
            assert!((0.0..=180.0).contains(&forward), "out of range: {}", forward);
            assert!((forward - backward).abs() < 1e-3, "{} vs {}", forward, backward);
        }
    }

    #[test]
    fn test_range_over_circle() {
        let b = p(0.0, 0.0);
        let a = p(1.0, 0.0);
        for step in 0..72 {
            let theta = (step as f32 * 5.0).to_radians();
            let c = p(theta.cos(), theta.sin());
            let angle = joint_angle(a, b, c).unwrap();
            assert!((0.0..=180.0).contains(&angle), "step {}: {}", step, angle);
        }
    }

    #[test]
    fn test_degenerate_points() {
        assert_eq!(
            joint_angle(p(0.5, 0.5), p(0.5, 0.5), p(1.0, 0.0)),
            Err(RepError::DegenerateGeometry)
        );
        assert_eq!(
            joint_angle(p(0.0, 0.0), p(0.5, 0.5), p(0.5, 0.5)),
            Err(RepError::DegenerateGeometry)
        );
    }

    #[test]
    fn test_non_finite_points_rejected() {
        let bad = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY];
        for v in bad {
            assert_eq!(
                joint_angle(p(0.5, 0.5), p(0.5, 0.7), p(v, 0.9)),
                Err(RepError::DegenerateGeometry)
            );
            assert_eq!(
                joint_angle(p(0.5, 0.5), p(0.5, v), p(0.5, 0.9)),
                Err(RepError::DegenerateGeometry)
            );
            assert_eq!(
                inclination_from_horizontal(p(0.5, 0.2), p(v, 0.6)),
                Err(RepError::DegenerateGeometry)
            );
        }
        // 有限だが巨大な座標でも NaN は出さない
        let angle = joint_angle(p(f32::MAX, 0.0), p(0.0, 0.0), p(0.0, f32::MAX)).unwrap();
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_inclination() {
        let upright = inclination_from_horizontal(p(0.5, 0.3), p(0.5, 0.6)).unwrap();
        assert!((upright - 90.0).abs() < 1e-3);
        let flat = inclination_from_horizontal(p(0.2, 0.5), p(0.7, 0.5)).unwrap();
        assert!(flat.abs() < 1e-3);
        // 向きに依存しない
        let a = inclination_from_horizontal(p(0.0, 0.0), p(1.0, 2.0)).unwrap();
        let b = inclination_from_horizontal(p(1.0, 2.0), p(0.0, 0.0)).unwrap();
        assert!((a - b).abs() < 1e-6);
        assert!(inclination_from_horizontal(p(0.1, 0.1), p(0.1, 0.1)).is_err());
    }
}
