//! リスクスパイラル描画エンジン
//!
//! リスク値・前回リスク値・モードから対数スパイラルを生成し、
//! 経過時間に応じて回転・脈動させながらピクセルバッファに描画する。

pub mod common;

pub use common::{
    animator::{AnimationState, SpiralAnimator},
    clock::{FrameClock, FrameHandle, ManualClock, SystemClock},
    colors::{map_color, Rgb},
    config::SpiralConfig,
    error::{SpiralError, SpiralResult},
    renderer::FrameRenderer,
    spiral::{generate, Mode, RiskSample, SpiralPoint},
    surface::Surface,
};
