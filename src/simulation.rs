//! # Simulation モジュール
//!
//! 掃引ドライバー（`SweepEngine`）を提供します。
//!
//! シナリオ設定からレーダー・ターゲット・領域を構築し、方向列の各方向について
//! `SearchController` によるスキャンを実行します。結果のログ出力、位置サンプルの
//! 再生（任意のペーシング付き）、統計の集計はすべてこのモジュールが担当し、
//! 探知アルゴリズム自体はログも待ち時間も持ちません。
//!
//! ## 照準の決め方
//!
//! - 既定: `DirectionSweepGenerator` が生成する方向列をそのまま使用
//! - `follow_rotation: true`: レーダーの初期方位から始め、各スキャン結果の
//!   `next_direction`（回転方式に従う）を次のスキャンに渡す
//!
//! ## 使用例
//!
//! ```rust
//! use radarsim::scenario::ScenarioConfig;
//! use radarsim::simulation::SweepEngine;
//!
//! let config = ScenarioConfig::default_scenario();
//! let mut engine = SweepEngine::new(config).unwrap();
//! let summary = engine.run();
//! assert!(summary.hits > 0);
//! ```

use std::time::Duration;

use crate::models::*;
use crate::scenario::{ScenarioConfig, ScenarioError, SweepMode};
use crate::search::{ScanOutcome, ScanReport, SearchController, SearchParams, EchoOutcome};
use tracing::{info, warn, debug, trace};

/// ペーシングなし
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

impl IPacer for NoPacing {
    fn pace(&mut self) {}
}

/// 位置サンプルごとに実時間で待つペーサー
#[derive(Debug, Clone, Copy)]
pub struct SleepPacer {
    pub delay: Duration,
}

impl SleepPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl IPacer for SleepPacer {
    fn pace(&mut self) {
        std::thread::sleep(self.delay);
    }
}

/// 掃引全体の統計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSummary {
    /// 実行したスキャン数（スキップを含む）
    pub scans: u32,
    pub hits: u32,
    pub returned: u32,
    pub lost: u32,
    pub misses: u32,
    /// 方向が定まらずスキップしたスキャン数
    pub skipped: u32,
    /// 最初に命中した方位（度）
    pub first_hit_heading: Option<f64>,
    /// 命中した全方位（度）
    pub hit_headings: Vec<f64>,
}

impl SweepSummary {
    fn record(&mut self, report: &ScanReport) {
        self.scans += 1;
        match report.outcome {
            ScanOutcome::Miss => self.misses += 1,
            ScanOutcome::Hit(echo) => {
                self.hits += 1;
                match echo {
                    EchoOutcome::Returned => self.returned += 1,
                    EchoOutcome::Lost => self.lost += 1,
                }
                let heading = report.direction.heading_deg();
                self.first_hit_heading.get_or_insert(heading);
                self.hit_headings.push(heading);
            }
        }
    }
}

pub struct SweepEngine {
    pub radar: Radar,
    pub target: Target,
    pub volume: BoundedVolume,
    pub sweep: DirectionSweepGenerator,
    pub params: SearchParams,
    pub mode: SweepMode,
    pub follow_rotation: bool,

    pacer: Box<dyn IPacer>,
    reports: Vec<ScanReport>,
}

impl SweepEngine {
    /// シナリオ設定から掃引エンジンを構築
    pub fn new(scenario: ScenarioConfig) -> Result<Self, ScenarioError> {
        scenario.validate()?;

        let pacer: Box<dyn IPacer> = match scenario.sim.pacing_ms {
            Some(ms) if ms > 0 => Box::new(SleepPacer::new(Duration::from_millis(ms))),
            _ => Box::new(NoPacing),
        };

        let radar = scenario.build_radar()?;
        let target = scenario.build_target()?;
        let volume = scenario.build_volume()?;
        let params = scenario.search_params();
        // ステップ数上限を含むパラメータ検証
        SearchController::new(&radar, &volume, &target, params)?;

        Ok(Self {
            radar,
            target,
            volume,
            sweep: scenario.build_sweep()?,
            params,
            mode: scenario.sweep.mode,
            follow_rotation: scenario.sweep.follow_rotation,
            pacer,
            reports: Vec::new(),
        })
    }

    /// ペーシングフックを差し替える
    pub fn with_pacer(mut self, pacer: Box<dyn IPacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// 直近の `run` で得られたスキャン結果
    pub fn reports(&self) -> &[ScanReport] {
        &self.reports
    }

    /// 掃引を実行
    ///
    /// 単一スキャンでの `GeometryError` は警告としてログに残し、
    /// スキップとして数えて掃引を続行します。
    pub fn run(&mut self) -> SweepSummary {
        info!("=== 掃引開始 ===");
        debug!(
            "レーダー {} / ターゲット {} / 領域中心 {} / 方向数 {}",
            self.radar.position,
            self.target.position(),
            self.volume.center(),
            self.sweep.len()
        );

        self.reports.clear();
        let mut summary = SweepSummary::default();
        let mut aim = if self.follow_rotation {
            self.radar.pulse_direction
        } else {
            self.sweep.direction_at(0).unwrap_or(self.radar.pulse_direction)
        };

        for index in 0..self.sweep.len() as u32 {
            if !self.follow_rotation {
                if let Some(direction) = self.sweep.direction_at(index) {
                    aim = direction;
                }
            }
            self.radar.pulse_direction = aim;

            let scanned = SearchController::new(&self.radar, &self.volume, &self.target, self.params)
                .and_then(|controller| controller.scan(aim, index));
            let report = match scanned {
                Ok(report) => report,
                Err(err) => {
                    warn!("スキャン {} をスキップ (方向 {}): {}", index, aim, err);
                    summary.scans += 1;
                    summary.skipped += 1;
                    aim = Radar::next_heading(aim, index, self.params.rotation);
                    continue;
                }
            };

            self.replay_trace(index, &report);
            self.log_report(index, &report);
            summary.record(&report);

            aim = report.next_direction;
            let stop = self.mode == SweepMode::UntilHit && report.outcome.is_hit();
            self.reports.push(report);

            if stop {
                info!("命中したため掃引を終了します (スキャン {})", index);
                break;
            }
        }

        info!("=== 掃引完了 ===");
        info!(
            "スキャン数: {} 命中: {} (帰還 {} / 消失 {}) 失探: {} スキップ: {}",
            summary.scans, summary.hits, summary.returned, summary.lost, summary.misses, summary.skipped
        );
        summary
    }

    fn log_report(&self, index: u32, report: &ScanReport) {
        let heading = report.direction.heading_deg();
        match (report.outcome, report.hit_position) {
            (ScanOutcome::Hit(echo), Some(hit)) => {
                info!(
                    "スキャン {}: 方位 {:.1}° 命中 位置 {} エコー {:?} (往路 {} / 復路 {} ステップ, {:.2}秒)",
                    index, heading, hit, echo, report.steps_out, report.steps_back, report.elapsed_s
                );
            }
            _ => {
                debug!(
                    "スキャン {}: 方位 {:.1}° {} ({} ステップ)",
                    index, heading, report.outcome, report.steps_out
                );
            }
        }
    }

    /// 位置サンプルを trace レベルで再生する。サンプル間でペーシングを挟む
    fn replay_trace(&mut self, index: u32, report: &ScanReport) {
        for (i, sample) in report.trace.iter().enumerate() {
            if i > 0 {
                self.pacer.pace();
            }
            trace!(
                "スキャン {} {:?} ステップ {} 時刻 {:.2}秒 位置 {}",
                index, sample.phase, sample.step, sample.time, sample.position
            );
        }
    }
}
