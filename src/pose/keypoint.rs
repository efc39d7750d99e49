/// COCO の 17 キーポイントインデックス (YOLO pose の出力順)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub const ALL: [KeypointIndex; KeypointIndex::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// snake_case のラベル (ログ・JSON 用)
    pub fn label(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.label() == label)
    }
}

/// 2D 座標
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 1人分のキーポイント集合
///
/// 信頼度はここでは扱わない。検出器の出力は `from_scored` で
/// 「有る / 無い」に落としてから渡す。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub keypoints: [Option<Point>; KeypointIndex::COUNT],
}

impl Pose {
    pub fn new(keypoints: [Option<Point>; KeypointIndex::COUNT]) -> Self {
        Self { keypoints }
    }

    /// 検出器の (x, y, confidence) 列から作成
    ///
    /// 閾値未満・非有限値・null は欠損扱い。17個を超える要素は無視する。
    pub fn from_scored(raw: &[Option<[f32; 3]>], min_confidence: f32) -> Self {
        let mut pose = Pose::default();
        for (slot, entry) in pose.keypoints.iter_mut().zip(raw.iter()) {
            *slot = match entry {
                Some([x, y, confidence])
                    if *confidence >= min_confidence && x.is_finite() && y.is_finite() =>
                {
                    Some(Point::new(*x, *y))
                }
                _ => None,
            };
        }
        pose
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> Option<Point> {
        self.keypoints[index as usize]
    }

    pub fn set(&mut self, index: KeypointIndex, point: Option<Point>) {
        self.keypoints[index as usize] = point;
    }

    pub fn with(mut self, index: KeypointIndex, x: f32, y: f32) -> Self {
        self.set(index, Some(Point::new(x, y)));
        self
    }

    pub fn is_present(&self, index: KeypointIndex) -> bool {
        self.get(index).is_some()
    }

    pub fn present_count(&self) -> usize {
        self.keypoints.iter().filter(|k| k.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_index_count() {
        assert_eq!(KeypointIndex::COUNT, 17);
        assert_eq!(KeypointIndex::ALL.len(), KeypointIndex::COUNT);
    }

    #[test]
    fn test_keypoint_index_from_index() {
        assert_eq!(KeypointIndex::from_index(0), Some(KeypointIndex::Nose));
        assert_eq!(KeypointIndex::from_index(16), Some(KeypointIndex::RightAnkle));
        assert_eq!(KeypointIndex::from_index(17), None);
        for (i, k) in KeypointIndex::ALL.iter().enumerate() {
            assert_eq!(*k as usize, i);
        }
    }

    #[test]
    fn test_keypoint_label_lookup() {
        assert_eq!(KeypointIndex::LeftShoulder.label(), "left_shoulder");
        assert_eq!(KeypointIndex::from_label("right_knee"), Some(KeypointIndex::RightKnee));
        assert_eq!(KeypointIndex::from_label("tail"), None);
    }

    #[test]
    fn test_from_scored_drops_low_confidence() {
        let mut raw = vec![Some([0.5, 0.5, 0.9]); KeypointIndex::COUNT];
        raw[KeypointIndex::LeftHip as usize] = Some([0.4, 0.6, 0.2]);
        raw[KeypointIndex::RightHip as usize] = None;
        raw[KeypointIndex::Nose as usize] = Some([f32::NAN, 0.1, 0.9]);

        let pose = Pose::from_scored(&raw, 0.5);
        assert!(!pose.is_present(KeypointIndex::LeftHip));
        assert!(!pose.is_present(KeypointIndex::RightHip));
        assert!(!pose.is_present(KeypointIndex::Nose));
        assert_eq!(pose.get(KeypointIndex::LeftKnee), Some(Point::new(0.5, 0.5)));
        assert_eq!(pose.present_count(), KeypointIndex::COUNT - 3);
    }

    #[test]
    fn test_from_scored_short_input() {
        let raw = vec![Some([1.0, 2.0, 1.0]); 3];
        let pose = Pose::from_scored(&raw, 0.5);
        assert_eq!(pose.present_count(), 3);
        assert!(!pose.is_present(KeypointIndex::RightAnkle));
    }

    #[test]
    fn test_midpoint() {
        let center = Point::new(0.4, 0.2).midpoint(&Point::new(0.6, 0.4));
        assert!((center.x - 0.5).abs() < 1e-6);
        assert!((center.y - 0.3).abs() < 1e-6);
        assert!(center.is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }
}
