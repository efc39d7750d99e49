use serde::{Deserialize, Serialize};

/// レップの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Unknown,
    Up,
    Down,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "-",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// 1フレーム分の遷移結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub stage: Stage,
    /// Down→Up の瞬間のみ true
    pub rep_completed: bool,
}

/// 2閾値ヒステリシスの段階遷移
///
/// - Unknown / Up で angle <= down_angle → Down
/// - Down で angle >= up_angle → Up（レップ完了）
/// - それ以外は据え置き
///
/// 2つの閾値の間は不感帯なので、境界付近のジッターで二重カウントしない。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepCounter {
    down_angle: f32,
    up_angle: f32,
}

impl RepCounter {
    /// `down_angle < up_angle` は呼び出し側（設定の検証）で保証する
    pub fn new(down_angle: f32, up_angle: f32) -> Self {
        debug_assert!(down_angle < up_angle);
        Self { down_angle, up_angle }
    }

    pub fn step(&self, stage: Stage, angle: f32) -> Step {
        match stage {
            Stage::Unknown | Stage::Up if angle <= self.down_angle => Step {
                stage: Stage::Down,
                rep_completed: false,
            },
            Stage::Down if angle >= self.up_angle => Step {
                stage: Stage::Up,
                rep_completed: true,
            },
            _ => Step {
                stage,
                rep_completed: false,
            },
        }
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(90.0, 160.0)
    }
}
