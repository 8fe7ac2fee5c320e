use crate::models::{
    traits::IVolume,
    common::{Vector3, GeometryError, validate_extent},
};

/// 領域の対角線長の上限
pub const MAX_DIAGONAL: f64 = 1.0e15;

/// シミュレーション領域
///
/// 中心 `center` と各軸の寸法（length = X, width = Y, height = Z）で定義される
/// 軸平行な直方体です。伝搬と探知はこの領域内でのみ有効です。
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedVolume {
    center: Vector3,
    length: f64,
    width: f64,
    height: f64,
}

impl BoundedVolume {
    pub fn new(center: Vector3, length: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        if !center.is_finite() {
            return Err(GeometryError::NonFiniteComponent);
        }
        let volume = Self {
            center,
            length: validate_extent("volume.length", length)?,
            width: validate_extent("volume.width", width)?,
            height: validate_extent("volume.height", height)?,
        };
        // 対角線長は MAX_DIAGONAL 以下
        let diagonal = volume.extents().magnitude();
        if !diagonal.is_finite() || diagonal > MAX_DIAGONAL {
            return Err(GeometryError::InvalidExtent { what: "volume.diagonal", value: diagonal });
        }
        Ok(volume)
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    /// 各軸の寸法 (length, width, height)
    pub fn extents(&self) -> Vector3 {
        Vector3::new(self.length, self.width, self.height)
    }

    /// 点が領域内か（境界を含む）
    pub fn is_within_bounds(&self, point: &Vector3) -> bool {
        self.contains(point)
    }

    /// 対角線長の切り上げ
    ///
    /// ステップ数上限の算出にのみ使用されます。
    pub fn diagonal(&self) -> u64 {
        self.extents().magnitude().ceil() as u64
    }
}

impl IVolume for BoundedVolume {
    fn min_corner(&self) -> Vector3 {
        self.center - self.extents() * 0.5
    }

    fn max_corner(&self) -> Vector3 {
        self.center + self.extents() * 0.5
    }
}
