// 基本的なデータ型と数学ユーティリティ
pub mod common;

// インターフェース（trait）定義
pub mod traits;

// 各モデルの実装
pub mod signal;
pub mod target;
pub mod bounded_volume;
pub mod radar;
pub mod sweep;

// 便利な re-export
pub use common::*;
pub use traits::*;
pub use signal::Signal;
pub use target::Target;
pub use bounded_volume::BoundedVolume;
pub use radar::{Radar, RotationPolicy};
pub use sweep::{DirectionSweepGenerator, SweepIter};
