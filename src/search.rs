//! # Search モジュール
//!
//! 1方向ぶんのスキャンを実行する探知コントローラーを提供します。
//!
//! ## 状態遷移
//!
//! ```text
//! Outbound ──┬─> Miss
//!            └─> Hit ──> Echo ──┬─> Returned
//!                               └─> Lost
//! ```
//!
//! 往路・復路ともステップ数は `max_steps` で打ち切られ、打ち切りはそれぞれ
//! `Miss` / `Lost` として扱われます。コントローラーはログを出力せず、
//! 結果はすべて `ScanReport` として呼び出し側に返されます。

use crate::models::{
    validate_extent, BoundedVolume, GeometryError, IMovable, Radar, RotationPolicy, Signal, Target,
    Vector3,
};

/// エコー到達判定の既定距離
pub const DEFAULT_RETURN_THRESHOLD: f64 = 1.0;

/// 片道あたりのステップ数上限の上限値
pub const MAX_STEP_BUDGET: u64 = 10_000_000;

/// スキャンのパラメータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// 時間刻み（秒）
    pub time_step: f64,
    /// エコーがレーダーに戻ったとみなす距離
    pub return_threshold: f64,
    /// 位置サンプルを記録するか
    pub record_trace: bool,
    /// スキャン後の照準の進め方
    pub rotation: RotationPolicy,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            time_step: 0.1,
            return_threshold: DEFAULT_RETURN_THRESHOLD,
            record_trace: true,
            rotation: RotationPolicy::default(),
        }
    }
}

/// スキャン中のフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// 往路
    Outbound,
    /// 復路（エコー）
    Echo,
}

/// エコーの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoOutcome {
    /// 閾値距離内でレーダーに戻った
    Returned,
    /// 領域外に出た、またはステップ上限に達した
    Lost,
}

/// スキャンの終端状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Miss,
    Hit(EchoOutcome),
}

impl ScanOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, ScanOutcome::Hit(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanOutcome::Miss => "MISS",
            ScanOutcome::Hit(EchoOutcome::Returned) => "HIT+RETURNED",
            ScanOutcome::Hit(EchoOutcome::Lost) => "HIT+LOST",
        }
    }
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 位置サンプル
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub phase: ScanPhase,
    /// フェーズ内のステップ番号（1始まり）
    pub step: u64,
    /// スキャン開始からの経過時間（秒）
    pub time: f64,
    pub position: Vector3,
}

/// 1方向ぶんのスキャン結果
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// 使用した方向（単位ベクトル）
    pub direction: Vector3,
    pub outcome: ScanOutcome,
    /// 往路のステップ数
    pub steps_out: u64,
    /// 復路のステップ数（命中しなかった場合は 0）
    pub steps_back: u64,
    /// スキャン全体の経過時間（秒）
    pub elapsed_s: f64,
    /// 命中位置
    pub hit_position: Option<Vector3>,
    /// 位置サンプル列（`record_trace` が無効なら空）
    pub trace: Vec<TraceSample>,
    /// 回転方式に従った次の照準
    pub next_direction: Vector3,
}

/// 探知コントローラー
///
/// レーダー・領域・ターゲットを参照として保持し、`scan` 呼び出しごとに
/// 一時状態（時刻・シグナル）を新たに作ります。呼び出し間で状態は残りません。
#[derive(Debug, Clone)]
pub struct SearchController<'a> {
    radar: &'a Radar,
    volume: &'a BoundedVolume,
    target: &'a Target,
    params: SearchParams,
}

/// 片道の伝搬結果
#[derive(Debug)]
enum LegEnd {
    Reached,
    Exited,
    Exhausted,
}

impl<'a> SearchController<'a> {
    pub fn new(
        radar: &'a Radar,
        volume: &'a BoundedVolume,
        target: &'a Target,
        params: SearchParams,
    ) -> Result<Self, GeometryError> {
        validate_extent("search.time_step", params.time_step)?;
        validate_extent("search.return_threshold", params.return_threshold)?;

        let controller = Self { radar, volume, target, params };
        let budget = controller.max_steps();
        if budget > MAX_STEP_BUDGET {
            return Err(GeometryError::InvalidExtent { what: "search.max_steps", value: budget as f64 });
        }
        Ok(controller)
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// 片道あたりのステップ数上限
    ///
    /// `ceil(diagonal / (speed * time_step))`。浮動小数点誤差で領域外判定が
    /// 成立しない場合でも必ず終了させるための上限です。
    /// 構築時に `MAX_STEP_BUDGET` 以下であることが検証されます。
    pub fn max_steps(&self) -> u64 {
        let per_step = self.radar.speed() * self.params.time_step;
        // 非有限値は as u64 で飽和するため上限超過として扱われる
        (self.volume.diagonal() as f64 / per_step).ceil().max(1.0) as u64
    }

    /// 指定方向へのスキャンを実行
    ///
    /// # 引数
    ///
    /// * `direction` - 送信方向（正規化は内部で行う）
    /// * `scan_index` - スイープ内のスキャン番号（絶対回転方式で使用）
    ///
    /// # 戻り値
    ///
    /// 終端状態を含むスキャン結果。方向が長さゼロの場合、または命中位置が
    /// レーダー位置と一致してエコー方向が定まらない場合は `GeometryError`
    pub fn scan(&self, direction: Vector3, scan_index: u32) -> Result<ScanReport, GeometryError> {
        let mut signal = self.radar.transmit_along(direction)?;
        let direction = signal.direction;
        let max_steps = self.max_steps();

        let mut trace = Vec::new();
        let mut time = 0.0;

        let (out_end, steps_out) = self.propagate(
            &mut signal,
            ScanPhase::Outbound,
            max_steps,
            &mut time,
            &mut trace,
            |position| self.target.is_hit(position),
        );

        let mut hit_position = None;
        let mut steps_back = 0;
        let outcome = match out_end {
            LegEnd::Exited | LegEnd::Exhausted => ScanOutcome::Miss,
            LegEnd::Reached => {
                hit_position = Some(signal.position);
                signal.reflect_to_radar(self.radar.position)?;

                let radar_position = self.radar.position;
                let threshold = self.params.return_threshold;
                let (back_end, steps) = self.propagate(
                    &mut signal,
                    ScanPhase::Echo,
                    max_steps,
                    &mut time,
                    &mut trace,
                    |position| position.distance_to(&radar_position) < threshold,
                );
                steps_back = steps;
                match back_end {
                    LegEnd::Reached => ScanOutcome::Hit(EchoOutcome::Returned),
                    LegEnd::Exited | LegEnd::Exhausted => ScanOutcome::Hit(EchoOutcome::Lost),
                }
            }
        };

        Ok(ScanReport {
            direction,
            outcome,
            steps_out,
            steps_back,
            elapsed_s: time,
            hit_position,
            trace,
            next_direction: Radar::next_heading(direction, scan_index, self.params.rotation),
        })
    }

    /// 到達条件か領域外になるまで、最大 `max_steps` 回シグナルを進める
    ///
    /// 各ステップで到達判定を領域判定より先に行います。
    fn propagate<F>(
        &self,
        signal: &mut Signal,
        phase: ScanPhase,
        max_steps: u64,
        time: &mut f64,
        trace: &mut Vec<TraceSample>,
        reached: F,
    ) -> (LegEnd, u64)
    where
        F: Fn(&Vector3) -> bool,
    {
        let dt = self.params.time_step;
        for step in 1..=max_steps {
            signal.move_agent(dt);
            *time += dt;
            let position = signal.get_position();

            if self.params.record_trace {
                trace.push(TraceSample { phase, step, time: *time, position });
            }

            if reached(&position) {
                return (LegEnd::Reached, step);
            }
            if !self.volume.is_within_bounds(&position) {
                return (LegEnd::Exited, step);
            }
        }
        (LegEnd::Exhausted, max_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_radar() -> Radar {
        Radar::new(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0), 20.0).unwrap()
    }

    fn reference_volume() -> BoundedVolume {
        BoundedVolume::new(Vector3::ZERO, 50.0, 50.0, 50.0).unwrap()
    }

    fn unit_target(x: f64, y: f64, z: f64) -> Target {
        Target::new(Vector3::new(x, y, z), Vector3::new(1.0, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn test_max_steps() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();
        // ceil(87 / 2.0)
        assert_eq!(controller.max_steps(), 44);
    }

    #[test]
    fn test_diagonal_direction_hits_and_returns() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        let report = controller.scan(Vector3::from_heading_deg(45.0), 0).unwrap();
        assert_eq!(report.outcome, ScanOutcome::Hit(EchoOutcome::Returned));
        assert_eq!(report.steps_out, 4);
        assert_eq!(report.steps_back, 4);
        assert!(target.is_hit(&report.hit_position.unwrap()));

        // 閾値を初めて下回ったステップで終了している
        let echo: Vec<&TraceSample> = report.trace.iter().filter(|s| s.phase == ScanPhase::Echo).collect();
        let last = echo.last().unwrap();
        assert!(last.position.distance_to(&radar.position) < 1.0);
        for sample in &echo[..echo.len() - 1] {
            assert!(sample.position.distance_to(&radar.position) >= 1.0);
        }
    }

    #[test]
    fn test_due_east_misses() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        let report = controller.scan(Vector3::new(1.0, 0.0, 0.0), 0).unwrap();
        assert_eq!(report.outcome, ScanOutcome::Miss);
        assert_eq!(report.steps_out, 13);
        assert_eq!(report.steps_back, 0);
        assert!(report.hit_position.is_none());
        assert!(!volume.is_within_bounds(&report.trace.last().unwrap().position));
    }

    #[test]
    fn test_off_axis_target_misses() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(10.0, 1.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        let report = controller.scan(Vector3::new(1.0, 0.0, 0.0), 0).unwrap();
        assert_eq!(report.outcome, ScanOutcome::Miss);
    }

    #[test]
    fn test_aim_at_target_center_hits() {
        let radar = Radar::new(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        let volume = reference_volume();
        let params = SearchParams { time_step: 0.1, ..SearchParams::default() };
        for (x, y, z) in [(5.0, 5.0, 0.0), (-12.0, 3.0, -2.0), (0.0, -20.0, 4.0), (18.0, 18.0, 18.0)] {
            let target = unit_target(x, y, z);
            let controller = SearchController::new(&radar, &volume, &target, params).unwrap();
            let direction = target.center() - radar.position;
            let report = controller.scan(direction, 0).unwrap();
            assert!(report.outcome.is_hit(), "target at ({}, {}, {})", x, y, z);
        }
    }

    #[test]
    fn test_pointing_away_from_volume_misses_immediately() {
        let radar = Radar::new(Vector3::new(30.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), 20.0).unwrap();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        let report = controller.scan(Vector3::new(1.0, 0.0, 0.0), 0).unwrap();
        assert_eq!(report.outcome, ScanOutcome::Miss);
        assert_eq!(report.steps_out, 1);
    }

    #[test]
    fn test_every_away_direction_misses_within_budget() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        for heading in (180..360).step_by(7) {
            let report = controller.scan(Vector3::from_heading_deg(heading as f64), 0).unwrap();
            assert_eq!(report.outcome, ScanOutcome::Miss);
            assert!(report.steps_out <= controller.max_steps());
        }
    }

    #[test]
    fn test_echo_leg_exits_volume() {
        // レーダーから遠ざかるエコーは到達せず領域外で終わる
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        let mut signal = Signal::new(Vector3::new(5.5, 5.5, 0.0), Vector3::new(1.0, 0.0, 0.0), 20.0);
        let mut time = 0.0;
        let mut trace = Vec::new();
        let (end, steps) = controller.propagate(
            &mut signal,
            ScanPhase::Echo,
            controller.max_steps(),
            &mut time,
            &mut trace,
            |position| position.distance_to(&radar.position) < 1.0,
        );
        assert!(matches!(end, LegEnd::Exited), "{:?}", end);
        assert_eq!(steps, 10);
        assert!(steps <= controller.max_steps());
        assert_eq!(trace.last().unwrap().phase, ScanPhase::Echo);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);

        for time_step in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let params = SearchParams { time_step, ..SearchParams::default() };
            let result = SearchController::new(&radar, &volume, &target, params);
            assert!(
                matches!(result, Err(GeometryError::InvalidExtent { what: "search.time_step", .. })),
                "time_step {}",
                time_step
            );
        }
        for return_threshold in [0.0, -1.0, f64::NAN] {
            let params = SearchParams { return_threshold, ..SearchParams::default() };
            let result = SearchController::new(&radar, &volume, &target, params);
            assert!(
                matches!(result, Err(GeometryError::InvalidExtent { what: "search.return_threshold", .. })),
                "return_threshold {}",
                return_threshold
            );
        }
    }

    #[test]
    fn test_rejects_unbounded_step_budget() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let params = SearchParams { time_step: 1e-300, ..SearchParams::default() };
        let result = SearchController::new(&radar, &volume, &target, params);
        assert!(matches!(result, Err(GeometryError::InvalidExtent { what: "search.max_steps", .. })));
    }

    #[test]
    fn test_zero_direction_is_degenerate() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();
        assert_eq!(controller.scan(Vector3::ZERO, 0), Err(GeometryError::DegenerateDirection));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        let direction = Vector3::from_heading_deg(45.0);
        let first = controller.scan(direction, 3).unwrap();
        let second = controller.scan(direction, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trace_disabled() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let params = SearchParams { record_trace: false, ..SearchParams::default() };
        let controller = SearchController::new(&radar, &volume, &target, params).unwrap();

        let report = controller.scan(Vector3::from_heading_deg(45.0), 0).unwrap();
        assert!(report.trace.is_empty());
        assert!(report.outcome.is_hit());
    }

    #[test]
    fn test_next_direction_follows_policy() {
        let radar = reference_radar();
        let volume = reference_volume();
        let target = unit_target(5.0, 5.0, 0.0);
        let controller = SearchController::new(&radar, &volume, &target, SearchParams::default()).unwrap();

        let report = controller.scan(Vector3::from_heading_deg(10.0), 10).unwrap();
        assert!((report.next_direction.heading_deg() - 11.0).abs() < 1e-9);
    }
}
