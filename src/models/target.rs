use crate::models::{
    traits::IVolume,
    common::{Vector3, GeometryError, validate_extent},
};

/// 探知対象のターゲット
///
/// 最小コーナー `position` と寸法 `size` で定義される軸平行な直方体
/// `[position, position + size]`（境界を含む）です。構築後は不変です。
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// 最小コーナー
    position: Vector3,
    /// 各軸の寸法（正）
    size: Vector3,
}

impl Target {
    /// 新しいターゲットを作成
    ///
    /// # 引数
    ///
    /// * `position` - 最小コーナーの位置
    /// * `size` - 各軸の寸法
    ///
    /// # 戻り値
    ///
    /// 寸法が正の有限値でない場合は `GeometryError::InvalidExtent`
    pub fn new(position: Vector3, size: Vector3) -> Result<Self, GeometryError> {
        if !position.is_finite() {
            return Err(GeometryError::NonFiniteComponent);
        }
        validate_extent("target.size.x", size.x)?;
        validate_extent("target.size.y", size.y)?;
        validate_extent("target.size.z", size.z)?;
        Ok(Self { position, size })
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn size(&self) -> Vector3 {
        self.size
    }

    /// 直方体の中心
    pub fn center(&self) -> Vector3 {
        self.position + self.size * 0.5
    }

    /// 点がターゲットに命中しているか
    pub fn is_hit(&self, point: &Vector3) -> bool {
        self.contains(point)
    }
}

impl IVolume for Target {
    fn min_corner(&self) -> Vector3 {
        self.position
    }

    fn max_corner(&self) -> Vector3 {
        self.position + self.size
    }
}
