/// EMAベースの関節角度平滑化フィルタ
///
/// alpha = 1.0 で素通し。計測する関節が切り替わったら `reset` すること。
/// 非有限の入力は履歴に残さない。
#[derive(Debug, Clone, Default)]
pub struct AngleSmoother {
    prev: Option<f32>,
}

impl AngleSmoother {
    pub fn new() -> Self {
        Self { prev: None }
    }

    pub fn apply(&mut self, angle: f32, alpha: f32) -> f32 {
        if !angle.is_finite() {
            return self.prev.unwrap_or(angle);
        }
        let result = match self.prev {
            Some(prev) => alpha * angle + (1.0 - alpha) * prev,
            None => angle,
        };
        self.prev = Some(result);
        result
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_first_frame_passthrough() {
        let mut s = AngleSmoother::new();
        assert_eq!(s.apply(120.0, 0.3), 120.0);
    }

    #[test]
    fn test_no_smoothing() {
        let mut s = AngleSmoother::new();
        s.apply(170.0, 1.0);
        assert_eq!(s.apply(80.0, 1.0), 80.0);
    }

    #[test]
    fn test_half_smoothing() {
        let mut s = AngleSmoother::new();
        s.apply(170.0, 0.5);
        assert!(approx_eq_f32(s.apply(90.0, 0.5), 130.0, 1e-4));
        assert!(approx_eq_f32(s.apply(90.0, 0.5), 110.0, 1e-4));
    }

    #[test]
    fn test_non_finite_input_not_kept() {
        let mut s = AngleSmoother::new();
        s.apply(170.0, 1.0);
        assert_eq!(s.apply(f32::NAN, 1.0), 170.0);
        assert_eq!(s.apply(80.0, 1.0), 80.0);

        let mut s = AngleSmoother::new();
        assert!(s.apply(f32::INFINITY, 0.5).is_infinite());
        assert_eq!(s.apply(120.0, 0.5), 120.0);
    }

    #[test]
    fn test_reset() {
        let mut s = AngleSmoother::new();
        s.apply(170.0, 0.1);
        s.reset();
        // After reset, next frame should pass through
        assert_eq!(s.apply(60.0, 0.1), 60.0);
    }
}
