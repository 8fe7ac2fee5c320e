use crate::models::common::{Vector3, GeometryError, validate_extent, math_utils};

/// 1周あたりの既定の方位数（1度刻み）
pub const FULL_SWEEP_COUNT: u32 = 360;

/// 掃引方向の生成器
///
/// 水平面（ピッチ 0）で `start_deg` から `step_deg` 刻みに `count` 個の
/// 単位ベクトルを生成します。各方向はインデックスのみの純関数なので、
/// `iter()` を呼び直せば同一の列が得られます。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionSweepGenerator {
    start_deg: f64,
    step_deg: f64,
    count: u32,
}

impl DirectionSweepGenerator {
    /// 0°〜359° を 1° 刻みで1周する既定の掃引
    pub fn new() -> Self {
        Self { start_deg: 0.0, step_deg: 1.0, count: FULL_SWEEP_COUNT }
    }

    /// 部分的な扇形の掃引
    pub fn sector(start_deg: f64, step_deg: f64, count: u32) -> Result<Self, GeometryError> {
        if !start_deg.is_finite() {
            return Err(GeometryError::NonFiniteComponent);
        }
        validate_extent("sweep.step_deg", step_deg)?;
        if count == 0 {
            return Err(GeometryError::InvalidExtent { what: "sweep.count", value: 0.0 });
        }
        Ok(Self { start_deg, step_deg, count })
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn step_deg(&self) -> f64 {
        self.step_deg
    }

    /// インデックス番目の方位（度、[0, 360)）
    pub fn heading_at(&self, index: u32) -> f64 {
        math_utils::wrap_degrees(self.start_deg + self.step_deg * index as f64)
    }

    /// インデックス番目の方向。範囲外は None
    pub fn direction_at(&self, index: u32) -> Option<Vector3> {
        (index < self.count).then(|| Vector3::from_heading_deg(self.heading_at(index)))
    }

    /// 先頭から掃引する新しいイテレータ
    pub fn iter(&self) -> SweepIter {
        SweepIter { generator: *self, index: 0 }
    }
}

impl Default for DirectionSweepGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a DirectionSweepGenerator {
    type Item = Vector3;
    type IntoIter = SweepIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 掃引方向の遅延イテレータ
#[derive(Debug, Clone)]
pub struct SweepIter {
    generator: DirectionSweepGenerator,
    index: u32,
}

impl Iterator for SweepIter {
    type Item = Vector3;

    fn next(&mut self) -> Option<Self::Item> {
        let direction = self.generator.direction_at(self.index)?;
        self.index += 1;
        Some(direction)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.generator.count - self.index.min(self.generator.count)) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SweepIter {}
