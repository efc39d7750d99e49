use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::CounterConfig;
use crate::error::{RepError, RepResult};
use crate::pose::Pose;

use super::person::{CountingRules, Observation, PersonSnapshot, PersonState, TrackId};

/// 1フレーム分の処理結果
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub frame: u64,
    /// 状態を更新できた人数
    pub updated: usize,
    /// 今回スキップした人物と理由
    pub skipped: Vec<(TrackId, RepError)>,
    /// 今回レップが完了した人物
    pub completed: Vec<TrackId>,
}

/// 人物ID → 状態の対応表
///
/// 全員の状態をここが排他的に所有する。人物間で共有する可変状態は無い。
#[derive(Debug)]
pub struct PersonRegistry {
    rules: CountingRules,
    people: HashMap<TrackId, PersonState>,
    frame: u64,
}

impl PersonRegistry {
    /// 設定の検証に失敗した場合はフレーム処理前にエラーを返す
    pub fn new(config: &CounterConfig) -> RepResult<Self> {
        Ok(Self::with_rules(CountingRules::from_config(config)?))
    }

    pub fn with_rules(rules: CountingRules) -> Self {
        Self {
            rules,
            people: HashMap::new(),
            frame: 0,
        }
    }

    /// 現在のフレーム番号 (最初のフレームが 1)
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// 既存の状態を返す。初見のIDなら現在のフレームで初期状態を作成
    pub fn resolve(&mut self, identity: TrackId) -> &mut PersonState {
        let frame = self.frame;
        Self::entry(&mut self.people, identity, frame)
    }

    fn entry(
        people: &mut HashMap<TrackId, PersonState>,
        identity: TrackId,
        frame: u64,
    ) -> &mut PersonState {
        people.entry(identity).or_insert_with(|| {
            debug!(id = identity, frame = frame, "new person");
            PersonState::created_at(identity, frame)
        })
    }

    /// 1人分のキーポイントで状態を進める
    ///
    /// エラーはこの人物のこのフレームだけに留まる。
    pub fn update(&mut self, identity: TrackId, pose: &Pose) -> RepResult<Observation> {
        let frame = self.frame;
        let person = Self::entry(&mut self.people, identity, frame);
        person.mark_seen(frame);

        let observation = person.observe(pose, &self.rules)?;
        if observation.rep_completed {
            info!(
                id = identity,
                exercise = observation.exercise.label(),
                count = person.count(),
                "rep completed"
            );
        }
        Ok(observation)
    }

    /// 1フレーム分の (ID, キーポイント) をまとめて処理
    ///
    /// 誰かが失敗しても他の人物・次のフレームの処理は続ける。
    pub fn process_frame<'a, I>(&mut self, people: I) -> FrameReport
    where
        I: IntoIterator<Item = (TrackId, &'a Pose)>,
    {
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        for (identity, pose) in people {
            match self.update(identity, pose) {
                Ok(observation) => {
                    report.updated += 1;
                    if observation.rep_completed {
                        report.completed.push(identity);
                    }
                }
                Err(err) => {
                    debug!(id = identity, frame = self.frame, error = %err, "skipped");
                    report.skipped.push((identity, err));
                }
            }
        }
        report
    }

    pub fn get(&self, identity: TrackId) -> Option<&PersonState> {
        self.people.get(&identity)
    }

    pub fn all_states(&self) -> &HashMap<TrackId, PersonState> {
        &self.people
    }

    /// ID順に並べたスナップショット
    pub fn snapshots(&self) -> Vec<PersonSnapshot> {
        let mut snapshots: Vec<_> = self.people.values().map(PersonState::snapshot).collect();
        snapshots.sort_by_key(|s| s.id);
        snapshots
    }

    /// トラッカーが消失を通知したIDを破棄
    pub fn evict(&mut self, identity: TrackId) -> Option<PersonState> {
        let removed = self.people.remove(&identity);
        if removed.is_some() {
            debug!(id = identity, "evicted");
        }
        removed
    }

    /// `max_missing_frames` より長く見えていない人物を破棄
    pub fn evict_stale(&mut self, max_missing_frames: u64) -> Vec<TrackId> {
        let now = self.frame;
        let mut stale: Vec<TrackId> = self
            .people
            .values()
            .filter(|p| now.saturating_sub(p.last_seen_frame()) > max_missing_frames)
            .map(PersonState::identity)
            .collect();
        stale.sort_unstable();
        for identity in &stale {
            self.evict(*identity);
        }
        stale
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl Default for PersonRegistry {
    fn default() -> Self {
        Self::with_rules(CountingRules::default())
    }
}
