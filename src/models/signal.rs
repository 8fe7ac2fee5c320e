use crate::models::{
    traits::IMovable,
    common::{Vector3, GeometryError},
};

/// レーダーパルス（またはそのエコー）を表す移動点
///
/// `Radar::transmit` で生成され、1回のスキャンの間だけ存在します。
/// 伝搬中の `direction` は常に単位ベクトルです。
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// 現在位置
    pub position: Vector3,
    /// 進行方向（単位ベクトル）
    pub direction: Vector3,
    /// 伝搬速度（距離単位/秒、正）
    pub speed: f64,
}

impl Signal {
    /// 新しいシグナルを作成します
    ///
    /// 方向の正規化は呼び出し側（`Radar`）の責務です。
    pub fn new(position: Vector3, direction: Vector3, speed: f64) -> Self {
        Self { position, direction, speed }
    }

    /// 進行方向をレーダー位置に向け直す（エコー）
    ///
    /// シグナルがレーダー位置と一致している場合は方向が定まらないため
    /// `GeometryError::DegenerateDirection` を返し、状態は変更しません。
    pub fn reflect_to_radar(&mut self, radar_position: Vector3) -> Result<(), GeometryError> {
        self.direction = (radar_position - self.position).normalized()?;
        Ok(())
    }
}

impl IMovable for Signal {
    fn move_agent(&mut self, dt: f64) {
        self.position.translate(self.direction * (self.speed * dt));
    }

    fn get_position(&self) -> Vector3 {
        self.position
    }

    fn get_direction(&self) -> Vector3 {
        self.direction
    }
}
