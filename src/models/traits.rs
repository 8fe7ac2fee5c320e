use crate::models::common::*;

/// 移動可能なオブジェクトのインターフェース
pub trait IMovable {
    /// 時間刻み dt だけ移動する
    fn move_agent(&mut self, dt: f64);

    /// 現在位置の取得
    fn get_position(&self) -> Vector3;

    /// 現在の進行方向（単位ベクトル）の取得
    fn get_direction(&self) -> Vector3;
}

/// 軸平行な直方体領域のインターフェース
pub trait IVolume {
    /// 最小コーナー
    fn min_corner(&self) -> Vector3;

    /// 最大コーナー
    fn max_corner(&self) -> Vector3;

    /// 点が領域に含まれるか（境界を含む）
    fn contains(&self, point: &Vector3) -> bool {
        let min = self.min_corner();
        let max = self.max_corner();
        point.x >= min.x && point.x <= max.x &&
        point.y >= min.y && point.y <= max.y &&
        point.z >= min.z && point.z <= max.z
    }
}

/// 表示用のペーシング（実時間待ち）フック
///
/// 探知アルゴリズムの外側、スイープドライバーからのみ呼び出されます。
pub trait IPacer {
    fn pace(&mut self);
}
