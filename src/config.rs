use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{RepError, RepResult};
use crate::exercise::JointSide;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CounterConfig {
    /// この角度以下で Down（度）
    #[serde(default = "default_down_angle")]
    pub down_angle: f32,
    /// この角度以上で Up、Down からならレップ加算（度）
    #[serde(default = "default_up_angle")]
    pub up_angle: f32,
    /// 胴体の水平からの傾きがこれを超えたらスクワット（度）
    #[serde(default = "default_torso_threshold")]
    pub torso_threshold: f32,
    /// 角度計測に使う手足の左右
    #[serde(default)]
    pub side: JointSide,
    /// 関節角度のEMA係数 (1.0 = 平滑化なし)
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    /// これ未満の信頼度のキーポイントは欠損扱い
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct RegistryConfig {
    /// このフレーム数より長く見えない人物を破棄 (0 = 破棄しない)
    #[serde(default)]
    pub max_missing_frames: u64,
}

fn default_down_angle() -> f32 { 90.0 }
fn default_up_angle() -> f32 { 160.0 }
fn default_torso_threshold() -> f32 { 45.0 }
fn default_smoothing() -> f32 { 1.0 }
fn default_min_confidence() -> f32 { 0.5 }

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            down_angle: default_down_angle(),
            up_angle: default_up_angle(),
            torso_threshold: default_torso_threshold(),
            side: JointSide::default(),
            smoothing: default_smoothing(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
        }
    }
}

impl CounterConfig {
    /// フレーム処理開始前に呼ぶ。違反は致命的エラー
    pub fn validate(&self) -> RepResult<()> {
        let invalid = |msg: String| Err(RepError::InvalidConfiguration(msg));

        for (name, value) in [("down_angle", self.down_angle), ("up_angle", self.up_angle)] {
            if !value.is_finite() || !(0.0..=180.0).contains(&value) {
                return invalid(format!("{} must be within [0, 180], got {}", name, value));
            }
        }
        if self.down_angle >= self.up_angle {
            return invalid(format!(
                "down_angle ({}) must be less than up_angle ({})",
                self.down_angle, self.up_angle
            ));
        }
        if !self.torso_threshold.is_finite() || !(0.0..=90.0).contains(&self.torso_threshold) {
            return invalid(format!(
                "torso_threshold must be within [0, 90], got {}",
                self.torso_threshold
            ));
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return invalid(format!("smoothing must be within (0, 1], got {}", self.smoothing));
        }
        Ok(())
    }
}

impl InputConfig {
    pub fn validate(&self) -> RepResult<()> {
        if !self.min_confidence.is_finite() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(RepError::InvalidConfiguration(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

impl Config {
    /// CLIの上書きを反映した後に呼ぶ
    pub fn validate(&self) -> RepResult<()> {
        self.counter.validate()?;
        self.input.validate()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// ファイルが無ければデフォルト。あるのに壊れている場合はエラー
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found, using default config", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// 読み込むだけで検証はしない (`validate` を参照)
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
