use serde::{Deserialize, Serialize};

use crate::error::{RepError, RepResult};
use crate::geometry::inclination_from_horizontal;
use crate::pose::{KeypointIndex, Point, Pose};

/// 種目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    #[default]
    Unknown,
    Squat,
    PushUp,
}

impl Exercise {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Squat => "squat",
            Self::PushUp => "pushup",
        }
    }

    /// 角度を測る関節 (端点, 支点, 端点)
    ///
    /// スクワット: 腰-膝-足首、腕立て: 肩-肘-手首
    pub fn joint_triple(self, side: BodySide) -> Option<JointTriple> {
        use KeypointIndex::*;
        let triple = match (self, side) {
            (Self::Squat, BodySide::Right) => JointTriple::new(RightHip, RightKnee, RightAnkle),
            (Self::Squat, BodySide::Left) => JointTriple::new(LeftHip, LeftKnee, LeftAnkle),
            (Self::PushUp, BodySide::Right) => {
                JointTriple::new(RightShoulder, RightElbow, RightWrist)
            }
            (Self::PushUp, BodySide::Left) => JointTriple::new(LeftShoulder, LeftElbow, LeftWrist),
            (Self::Unknown, _) => return None,
        };
        Some(triple)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySide {
    Left,
    Right,
}

/// 角度計測に使う側
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointSide {
    #[default]
    Right,
    Left,
    /// 右優先、右が欠けていれば左
    Auto,
}

impl JointSide {
    fn candidates(self) -> &'static [BodySide] {
        match self {
            Self::Right => &[BodySide::Right],
            Self::Left => &[BodySide::Left],
            Self::Auto => &[BodySide::Right, BodySide::Left],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTriple {
    pub first: KeypointIndex,
    pub pivot: KeypointIndex,
    pub last: KeypointIndex,
}

impl JointTriple {
    pub fn new(first: KeypointIndex, pivot: KeypointIndex, last: KeypointIndex) -> Self {
        Self { first, pivot, last }
    }

    pub fn indices(&self) -> [KeypointIndex; 3] {
        [self.first, self.pivot, self.last]
    }

    /// 3点すべて揃っていれば座標を返す
    pub fn points(&self, pose: &Pose) -> Option<[Point; 3]> {
        Some([
            pose.get(self.first)?,
            pose.get(self.pivot)?,
            pose.get(self.last)?,
        ])
    }

    fn missing(&self, pose: &Pose) -> Vec<KeypointIndex> {
        self.indices()
            .into_iter()
            .filter(|&k| !pose.is_present(k))
            .collect()
    }
}

/// 胴体の向きによる種目判定
#[derive(Debug, Clone)]
pub struct ExerciseClassifier {
    torso_threshold: f32,
}

impl ExerciseClassifier {
    pub fn new(torso_threshold: f32) -> Self {
        Self { torso_threshold }
    }

    /// 肩中心→腰中心の水平からの傾き（度, [0, 90]）
    ///
    /// 左右の肩・腰の4点すべてが必要。欠けていれば `MissingKeypoints`。
    pub fn torso_angle(&self, pose: &Pose) -> RepResult<f32> {
        use KeypointIndex::*;
        let torso = [LeftShoulder, RightShoulder, LeftHip, RightHip];
        match torso.map(|k| pose.get(k)) {
            [Some(ls), Some(rs), Some(lh), Some(rh)] => {
                inclination_from_horizontal(ls.midpoint(&rs), lh.midpoint(&rh))
            }
            _ => {
                let missing = torso.into_iter().filter(|&k| !pose.is_present(k)).collect();
                Err(RepError::missing("torso orientation", missing))
            }
        }
    }

    /// 立位ならスクワット、水平に近ければ腕立て
    ///
    /// 閾値ちょうどは腕立て側。
    pub fn classify(&self, pose: &Pose) -> RepResult<Exercise> {
        let angle = self.torso_angle(pose)?;
        if angle > self.torso_threshold {
            Ok(Exercise::Squat)
        } else {
            Ok(Exercise::PushUp)
        }
    }

    /// 種目に応じた関節3点を選ぶ
    pub fn select_joints(
        &self,
        exercise: Exercise,
        side: JointSide,
        pose: &Pose,
    ) -> RepResult<(JointTriple, [Point; 3])> {
        let mut first_missing = None;
        for &body_side in side.candidates() {
            let Some(triple) = exercise.joint_triple(body_side) else {
                return Err(RepError::missing("joint angle", Vec::new()));
            };
            match triple.points(pose) {
                Some(points) => return Ok((triple, points)),
                None => {
                    first_missing.get_or_insert_with(|| triple.missing(pose));
                }
            }
        }
        Err(RepError::missing("joint angle", first_missing.unwrap_or_default()))
    }
}

impl Default for ExerciseClassifier {
    fn default() -> Self {
        Self::new(45.0)
    }
}
