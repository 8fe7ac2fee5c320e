//! # radarsim
//!
//! 走査レーダーの探知シミュレーション。
//!
//! 固定位置のレーダーが水平方向にパルスを掃引し、各パルスを一定速度で移動する
//! 点（シグナル）として伝搬させ、領域外に出る前にターゲットへ命中するか、
//! 命中した場合はエコーがレーダーへ戻るかを判定します。

pub mod logging;
pub mod models;
pub mod scenario;
pub mod search;
pub mod simulation;
