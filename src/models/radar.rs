use serde::{Deserialize, Serialize};

use crate::models::{
    signal::Signal,
    common::{Vector3, GeometryError, validate_extent},
};

/// 照準の回転方式
///
/// スキャン間でレーダーの照準をどう進めるかを表します。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RotationPolicy {
    /// 現在の照準から `step_deg` だけ回転
    Incremental { step_deg: f64 },
    /// 基準方位 `reference_deg` から `step_deg * スキャン番号` の絶対方位に設定
    Absolute { reference_deg: f64, step_deg: f64 },
}

impl Default for RotationPolicy {
    fn default() -> Self {
        RotationPolicy::Incremental { step_deg: 1.0 }
    }
}

/// レーダー
///
/// 固定位置からパルスを送信します。伝搬速度は構築時に与えられ、
/// 同一プロセス内で異なるパラメータのレーダーを共存させられます。
#[derive(Debug, Clone, PartialEq)]
pub struct Radar {
    /// レーダー位置（スキャンセッション中は固定）
    pub position: Vector3,
    /// 現在の照準（単位ベクトル）
    pub pulse_direction: Vector3,
    /// シグナルの伝搬速度
    speed: f64,
}

impl Radar {
    pub fn new(position: Vector3, pulse_direction: Vector3, speed: f64) -> Result<Self, GeometryError> {
        if !position.is_finite() {
            return Err(GeometryError::NonFiniteComponent);
        }
        Ok(Self {
            position,
            pulse_direction: pulse_direction.normalized()?,
            speed: validate_extent("radar.speed", speed)?,
        })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// 指定点に向けてシグナルを送信
    ///
    /// 指定点がレーダー位置と一致する場合は `GeometryError::DegenerateDirection`。
    pub fn transmit(&self, target_point: Vector3) -> Result<Signal, GeometryError> {
        let direction = (target_point - self.position).normalized()?;
        Ok(Signal::new(self.position, direction, self.speed))
    }

    /// 任意の方向へシグナルを送信
    pub fn transmit_along(&self, direction: Vector3) -> Result<Signal, GeometryError> {
        Ok(Signal::new(self.position, direction.normalized()?, self.speed))
    }

    /// 方向ベクトルを Z 軸まわりに回転（方位のみ）
    pub fn rotate(direction: Vector3, angle_deg: f64) -> Vector3 {
        direction.rotated_about_z(angle_deg)
    }

    /// 回転方式に従って次の照準を計算する
    ///
    /// # 引数
    ///
    /// * `current` - 現在の照準
    /// * `scan_index` - 現在のスキャン番号（0始まり）
    /// * `policy` - 回転方式
    pub fn next_heading(current: Vector3, scan_index: u32, policy: RotationPolicy) -> Vector3 {
        match policy {
            RotationPolicy::Incremental { step_deg } => Self::rotate(current, step_deg),
            RotationPolicy::Absolute { reference_deg, step_deg } => {
                let heading = reference_deg + step_deg * (scan_index as f64 + 1.0);
                Vector3::from_heading_deg(heading)
            }
        }
    }

    /// 照準自体を次の方位へ進める
    pub fn rotate_aim(&mut self, scan_index: u32, policy: RotationPolicy) {
        self.pulse_direction = Self::next_heading(self.pulse_direction, scan_index, policy);
    }
}
