use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;

use crate::models::{
    BoundedVolume, DirectionSweepGenerator, GeometryError, Radar, RotationPolicy, Target, Vector3,
};
use crate::search::{SearchParams, DEFAULT_RETURN_THRESHOLD};

/// シナリオメタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

/// シミュレーション設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub time_step_s: f64,
    pub signal_speed: f64,
    #[serde(default = "default_return_threshold")]
    pub return_threshold: f64,
    /// ライブ表示用の待ち時間（ミリ秒）。未指定なら待たない
    #[serde(default)]
    pub pacing_ms: Option<u64>,
    #[serde(default = "default_true")]
    pub record_trace: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Position3D> for Vector3 {
    fn from(p: Position3D) -> Self {
        Vector3::new(p.x, p.y, p.z)
    }
}

/// レーダー設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadarConfig {
    pub position: Position3D,
    #[serde(default)]
    pub initial_heading_deg: f64,
    #[serde(default)]
    pub rotation: RotationPolicy,
}

/// ターゲット設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    pub position: Position3D,
    pub size: Position3D,
}

/// 領域設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VolumeConfig {
    pub center: Position3D,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// 掃引の終了条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// 全方向を走査
    #[default]
    Full,
    /// 最初の命中で停止
    UntilHit,
}

/// 掃引設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub start_deg: f64,
    #[serde(default = "default_step_deg")]
    pub step_deg: f64,
    #[serde(default = "default_sweep_count")]
    pub count: u32,
    #[serde(default)]
    pub mode: SweepMode,
    /// true なら方向列ではなくレーダーの回転方式で照準を進める
    #[serde(default)]
    pub follow_rotation: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_deg: 0.0,
            step_deg: default_step_deg(),
            count: default_sweep_count(),
            mode: SweepMode::Full,
            follow_rotation: false,
        }
    }
}

fn default_return_threshold() -> f64 {
    DEFAULT_RETURN_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_step_deg() -> f64 {
    1.0
}

fn default_sweep_count() -> u32 {
    360
}

/// 完全なシナリオ設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub meta: ScenarioMeta,
    pub sim: SimulationConfig,
    pub radar: RadarConfig,
    pub target: TargetConfig,
    pub volume: VolumeConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        config.validate()?;

        Ok(config)
    }

    /// YAML文字列からシナリオ設定を読み込み
    pub fn from_yaml_str(contents: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_yaml::from_str(contents)
            .map_err(|e| ScenarioError::ParseError("<inline>".into(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// 組み込みの基準シナリオ
    ///
    /// 原点のレーダー、(5,5,0) の 1×1×1 ターゲット、原点中心 50×50×50 の領域、
    /// 速度 20、時間刻み 0.1。
    pub fn default_scenario() -> Self {
        Self {
            meta: ScenarioMeta {
                version: "1.0".to_string(),
                name: "reference".to_string(),
                description: "原点レーダーによる1周掃引の基準シナリオ".to_string(),
            },
            sim: SimulationConfig {
                time_step_s: 0.1,
                signal_speed: 20.0,
                return_threshold: DEFAULT_RETURN_THRESHOLD,
                pacing_ms: None,
                record_trace: true,
            },
            radar: RadarConfig {
                position: Position3D { x: 0.0, y: 0.0, z: 0.0 },
                initial_heading_deg: 0.0,
                rotation: RotationPolicy::Incremental { step_deg: 1.0 },
            },
            target: TargetConfig {
                position: Position3D { x: 5.0, y: 5.0, z: 0.0 },
                size: Position3D { x: 1.0, y: 1.0, z: 1.0 },
            },
            volume: VolumeConfig {
                center: Position3D { x: 0.0, y: 0.0, z: 0.0 },
                length: 50.0,
                width: 50.0,
                height: 50.0,
            },
            sweep: SweepConfig::default(),
        }
    }

    /// 設定の基本的な検証
    pub fn validate(&self) -> Result<(), ScenarioError> {
        // 時間設定の検証
        if !(self.sim.time_step_s > 0.0) {
            return Err(ScenarioError::ValidationError("time_step_s must be positive".to_string()));
        }
        if !(self.sim.signal_speed > 0.0) {
            return Err(ScenarioError::ValidationError("signal_speed must be positive".to_string()));
        }
        if !(self.sim.return_threshold > 0.0) {
            return Err(ScenarioError::ValidationError("return_threshold must be positive".to_string()));
        }

        if self.sweep.count == 0 {
            return Err(ScenarioError::ValidationError("sweep.count must be at least 1".to_string()));
        }
        if !(self.sweep.step_deg > 0.0) {
            return Err(ScenarioError::ValidationError("sweep.step_deg must be positive".to_string()));
        }
        match self.radar.rotation {
            RotationPolicy::Incremental { step_deg } | RotationPolicy::Absolute { step_deg, .. }
                if !step_deg.is_finite() =>
            {
                return Err(ScenarioError::ValidationError("rotation.step_deg must be finite".to_string()));
            }
            _ => {}
        }

        // 構築時の幾何検証（寸法・速度）
        self.build_volume()?;
        self.build_radar()?;
        self.build_target()?;
        self.build_sweep()?;

        Ok(())
    }

    pub fn build_radar(&self) -> Result<Radar, ScenarioError> {
        let heading = Vector3::from_heading_deg(self.radar.initial_heading_deg);
        Ok(Radar::new(self.radar.position.into(), heading, self.sim.signal_speed)?)
    }

    pub fn build_target(&self) -> Result<Target, ScenarioError> {
        Ok(Target::new(self.target.position.into(), self.target.size.into())?)
    }

    pub fn build_volume(&self) -> Result<BoundedVolume, ScenarioError> {
        let v = &self.volume;
        Ok(BoundedVolume::new(v.center.into(), v.length, v.width, v.height)?)
    }

    pub fn build_sweep(&self) -> Result<DirectionSweepGenerator, ScenarioError> {
        let s = &self.sweep;
        Ok(DirectionSweepGenerator::sector(s.start_deg, s.step_deg, s.count)?)
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            time_step: self.sim.time_step_s,
            return_threshold: self.sim.return_threshold,
            record_trace: self.sim.record_trace,
            rotation: self.radar.rotation,
        }
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== シミュレーション設定 ===");
        println!("時間刻み: {:.3}秒", self.sim.time_step_s);
        println!("伝搬速度: {:.1}", self.sim.signal_speed);
        println!("エコー到達距離: {:.2}", self.sim.return_threshold);
        if let Some(ms) = self.sim.pacing_ms {
            println!("表示待ち時間: {}ミリ秒", ms);
        }
        println!();

        println!("=== 配置 ===");
        println!("レーダー: {} (初期方位 {:.1}°)", Vector3::from(self.radar.position), self.radar.initial_heading_deg);
        println!("ターゲット: {} 寸法 {}", Vector3::from(self.target.position), Vector3::from(self.target.size));
        println!(
            "領域: 中心 {} 寸法 {:.1} x {:.1} x {:.1}",
            Vector3::from(self.volume.center), self.volume.length, self.volume.width, self.volume.height
        );
        println!();

        println!("=== 掃引 ===");
        println!("開始方位: {:.1}° 刻み: {:.2}° 方向数: {}", self.sweep.start_deg, self.sweep.step_deg, self.sweep.count);
        println!("モード: {:?}", self.sweep.mode);
        println!("照準: {}", if self.sweep.follow_rotation { "回転方式に追従" } else { "方向列" });
        println!("回転方式: {:?}", self.radar.rotation);
    }
}

/// シナリオ読み込みエラー
#[derive(Debug)]
pub enum ScenarioError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
    Geometry(GeometryError),
}

impl From<GeometryError> for ScenarioError {
    fn from(err: GeometryError) -> Self {
        ScenarioError::Geometry(err)
    }
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::FileNotFound(path) => {
                write!(f, "シナリオファイルが見つかりません: {}", path.display())
            }
            ScenarioError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ScenarioError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ScenarioError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
            ScenarioError::Geometry(err) => {
                write!(f, "設定検証エラー: {}", err)
            }
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::IoError(_, err) => Some(err),
            ScenarioError::ParseError(_, err) => Some(err),
            ScenarioError::Geometry(err) => Some(err),
            _ => None,
        }
    }
}
