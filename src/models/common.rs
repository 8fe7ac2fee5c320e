use std::ops::{Add, Mul, Neg, Sub};

/// 正規化不能とみなすベクトル長の閾値
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// 3次元の位置・方向を表す値型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 方位角（度、+X軸から反時計回り）から水平面の単位ベクトルを生成
    pub fn from_heading_deg(heading_deg: f64) -> Self {
        let rad = math_utils::deg_to_rad(heading_deg);
        Self::new(rad.cos(), rad.sin(), 0.0)
    }

    /// 3次元距離を計算
    pub fn distance_to(&self, other: &Vector3) -> f64 {
        (*self - *other).magnitude()
    }

    /// ベクトルの長さ（原点からの距離）
    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// 正規化した新しいベクトルを返す
    ///
    /// 長さがゼロ（または非有限）の場合は NaN を生成せず
    /// `GeometryError::DegenerateDirection` を返します。
    pub fn normalized(&self) -> Result<Self, GeometryError> {
        if !self.is_finite() {
            return Err(GeometryError::NonFiniteComponent);
        }
        let mag = self.magnitude();
        if mag <= DEGENERATE_EPSILON {
            return Err(GeometryError::DegenerateDirection);
        }
        Ok(Self::new(self.x / mag, self.y / mag, self.z / mag))
    }

    /// その場で正規化する。失敗時は自身を変更しない
    pub fn normalize(&mut self) -> Result<(), GeometryError> {
        *self = self.normalized()?;
        Ok(())
    }

    /// 自身をその場で平行移動する
    pub fn translate(&mut self, offset: Vector3) {
        self.x += offset.x;
        self.y += offset.y;
        self.z += offset.z;
    }

    /// Z軸まわりに回転した新しいベクトルを返す（Z成分は保持）
    pub fn rotated_about_z(&self, angle_deg: f64) -> Self {
        let (sin, cos) = math_utils::deg_to_rad(angle_deg).sin_cos();
        Self::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    /// XY平面での方位角（度、[0, 360)）
    pub fn heading_deg(&self) -> f64 {
        math_utils::wrap_degrees(self.y.atan2(self.x).to_degrees())
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// 幾何計算のエラー
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// 長さゼロのベクトルを方向として使おうとした
    DegenerateDirection,
    /// 寸法が正でない、または有限でない
    InvalidExtent { what: &'static str, value: f64 },
    /// 成分に NaN / 無限大が含まれる
    NonFiniteComponent,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::DegenerateDirection => {
                write!(f, "方向ベクトルの長さがゼロです (degenerate direction)")
            }
            GeometryError::InvalidExtent { what, value } => {
                write!(f, "無効な寸法 {}: {} (正の有限値が必要)", what, value)
            }
            GeometryError::NonFiniteComponent => {
                write!(f, "ベクトル成分に有限でない値が含まれています")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// 寸法の検証（正の有限値のみ許可）
pub fn validate_extent(what: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidExtent { what, value })
    }
}

/// 数学ユーティリティ関数
pub mod math_utils {
    /// 度をラジアンに変換
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// 角度を [0, 360) の範囲に正規化
    pub fn wrap_degrees(angle_deg: f64) -> f64 {
        let wrapped = angle_deg.rem_euclid(360.0);
        // rem_euclid は丸めで 360.0 を返すことがある
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance_to() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert!((a.distance_to(&b) - 27.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_normalized() {
        let v = Vector3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((v.x - 0.6).abs() < EPS);
        assert!((v.z - 0.8).abs() < EPS);
        assert!((v.magnitude() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_zero_is_degenerate() {
        let mut v = Vector3::ZERO;
        assert_eq!(v.normalize(), Err(GeometryError::DegenerateDirection));
        assert_eq!(v, Vector3::ZERO);
    }

    #[test]
    fn test_normalize_non_finite() {
        let v = Vector3::new(f64::NAN, 0.0, 0.0);
        assert_eq!(v.normalized(), Err(GeometryError::NonFiniteComponent));
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_rotated_about_z() {
        let v = Vector3::new(1.0, 0.0, 0.5).rotated_about_z(90.0);
        assert!(v.x.abs() < EPS);
        assert!((v.y - 1.0).abs() < EPS);
        assert_eq!(v.z, 0.5);
    }

    #[test]
    fn test_heading_round_trip() {
        for deg in [0.0, 45.0, 90.0, 180.0, 270.0, 359.0] {
            let heading = Vector3::from_heading_deg(deg).heading_deg();
            assert!((heading - deg).abs() < 1e-6, "{} -> {}", deg, heading);
        }
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(math_utils::wrap_degrees(-90.0), 270.0);
        assert_eq!(math_utils::wrap_degrees(720.0), 0.0);
    }

    #[test]
    fn test_validate_extent() {
        assert_eq!(validate_extent("length", 2.0), Ok(2.0));
        assert!(validate_extent("length", 0.0).is_err());
        assert!(validate_extent("length", -1.0).is_err());
        assert!(validate_extent("length", f64::INFINITY).is_err());
    }
}
