use serde::{Deserialize, Serialize};

use crate::config::CounterConfig;
use crate::error::RepResult;
use crate::exercise::{Exercise, ExerciseClassifier, JointSide, JointTriple, RepCounter, Stage};
use crate::geometry::joint_angle;
use crate::pose::Pose;

use super::smooth::AngleSmoother;

/// 外部トラッカーが割り当てる人物ID
pub type TrackId = u32;

/// 全員に共通の判定ルール
#[derive(Debug, Clone)]
pub struct CountingRules {
    pub classifier: ExerciseClassifier,
    pub counter: RepCounter,
    pub side: JointSide,
    pub smoothing: f32,
}

impl CountingRules {
    /// 設定を検証してから作成
    pub fn from_config(config: &CounterConfig) -> RepResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier: ExerciseClassifier::new(config.torso_threshold),
            counter: RepCounter::new(config.down_angle, config.up_angle),
            side: config.side,
            smoothing: config.smoothing,
        })
    }
}

impl Default for CountingRules {
    fn default() -> Self {
        Self {
            classifier: ExerciseClassifier::default(),
            counter: RepCounter::default(),
            side: JointSide::default(),
            smoothing: 1.0,
        }
    }
}

/// 種目別のレップ数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepCounts {
    pub squat: u32,
    pub push_up: u32,
}

impl RepCounts {
    fn increment(&mut self, exercise: Exercise) {
        match exercise {
            Exercise::Squat => self.squat += 1,
            Exercise::PushUp => self.push_up += 1,
            Exercise::Unknown => {}
        }
    }
}

/// 1フレーム分の更新結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub exercise: Exercise,
    pub joint: JointTriple,
    pub angle: f32,
    pub stage: Stage,
    pub rep_completed: bool,
}

/// 1人分の状態
///
/// `exercise` は毎フレーム判定し直す。`stage` と `count` は閾値を跨いだときだけ動く。
/// `count` を減らす経路は無い。
#[derive(Debug, Clone)]
pub struct PersonState {
    identity: TrackId,
    exercise: Exercise,
    stage: Stage,
    angle: f32,
    count: u32,
    counts: RepCounts,
    frames_seen: u64,
    last_seen_frame: u64,
    joint: Option<JointTriple>,
    smoother: AngleSmoother,
}

impl PersonState {
    pub fn new(identity: TrackId) -> Self {
        Self {
            identity,
            exercise: Exercise::Unknown,
            stage: Stage::Unknown,
            angle: 0.0,
            count: 0,
            counts: RepCounts::default(),
            frames_seen: 0,
            last_seen_frame: 0,
            joint: None,
            smoother: AngleSmoother::new(),
        }
    }

    /// `frame` 時点で作られた状態。見えていない期間はここから数える
    pub(crate) fn created_at(identity: TrackId, frame: u64) -> Self {
        Self {
            last_seen_frame: frame,
            ..Self::new(identity)
        }
    }

    pub fn identity(&self) -> TrackId {
        self.identity
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// 最後に計算できた関節角度（度）
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn counts(&self) -> RepCounts {
        self.counts
    }

    /// 最後に角度を測った関節
    pub fn joint(&self) -> Option<JointTriple> {
        self.joint
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn last_seen_frame(&self) -> u64 {
        self.last_seen_frame
    }

    pub(crate) fn mark_seen(&mut self, frame: u64) {
        self.frames_seen += 1;
        self.last_seen_frame = frame;
    }

    /// 1フレーム分のキーポイントで状態を進める
    ///
    /// エラー時は何も変更しない。ただし種目判定に成功した後で
    /// 関節が欠けていた場合は `exercise` だけ更新される。
    pub fn observe(&mut self, pose: &Pose, rules: &CountingRules) -> RepResult<Observation> {
        let exercise = rules.classifier.classify(pose)?;
        self.exercise = exercise;

        let (joint, [a, b, c]) = rules.classifier.select_joints(exercise, rules.side, pose)?;
        let raw_angle = joint_angle(a, b, c)?;

        // 関節が変わったら段階はやり直し。別の関節で Down→Up を完結させない
        if self.joint != Some(joint) {
            self.smoother.reset();
            self.stage = Stage::Unknown;
            self.joint = Some(joint);
        }
        let angle = self.smoother.apply(raw_angle, rules.smoothing);

        let step = rules.counter.step(self.stage, angle);
        self.angle = angle;
        self.stage = step.stage;
        if step.rep_completed {
            self.count += 1;
            self.counts.increment(exercise);
        }

        Ok(Observation {
            exercise,
            joint,
            angle,
            stage: step.stage,
            rep_completed: step.rep_completed,
        })
    }

    pub fn snapshot(&self) -> PersonSnapshot {
        PersonSnapshot {
            id: self.identity,
            exercise: self.exercise,
            stage: self.stage,
            angle: self.angle,
            count: self.count,
            squat_count: self.counts.squat,
            push_up_count: self.counts.push_up,
        }
    }
}

/// 描画側に渡す1人分の状態
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSnapshot {
    pub id: TrackId,
    pub exercise: Exercise,
    pub stage: Stage,
    pub angle: f32,
    pub count: u32,
    pub squat_count: u32,
    pub push_up_count: u32,
}

impl PersonSnapshot {
    /// オーバーレイのカウント欄
    pub fn count_text(&self) -> String {
        format!("Squats:{} Push-ups:{}", self.squat_count, self.push_up_count)
    }

    /// オーバーレイの段階欄
    pub fn stage_text(&self) -> String {
        format!(
            "{} ({}) [Person-ID {}]",
            self.stage.label(),
            self.exercise.label(),
            self.id
        )
    }

    /// コンソール用の1行サマリ
    pub fn summary_line(&self) -> String {
        format!(
            "[ID {}] {} {} stage={} angle={:.1}",
            self.id,
            self.exercise.label(),
            self.count_text(),
            self.stage.label(),
            self.angle
        )
    }
}
