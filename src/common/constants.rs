//! 共通定数

use std::f64::consts::PI;

/// 描画領域のデフォルト幅
pub const DEFAULT_WIDTH: usize = 320;
/// 描画領域のデフォルト高さ
pub const DEFAULT_HEIGHT: usize = 320;

/// スパイラルの基準半径（ピクセル）
pub const BASE_RADIUS: f64 = 20.0;

/// リスク → 半径成長率のスケーリング係数
pub const GROWTH_K: f64 = 5.0;

/// 線幅の基準値
pub const BASE_LINE_WIDTH: f64 = 1.5;

/// 差分による線幅加算の上限
pub const MAX_DELTA_WIDTH: f64 = 4.0;

/// 1本のスパイラルのサンプル数
pub const SEGMENTS: usize = 1200;

/// 角度方向の総スイープ（9周）
pub const MAX_THETA: f64 = 18.0 * PI;

/// 何サンプルごとにストロークするか
pub const STROKE_BATCH: usize = 5;

/// ハイブリッドモードの脈動振幅と角周波数
pub const PULSE_AMPLITUDE: f64 = 0.1;
pub const PULSE_FREQUENCY: f64 = 6.0;

/// 脈動スケールの基準値と上限ボーナス
pub const PULSE_SCALE_BASE: f64 = 5.0;
pub const PULSE_SCALE_MAX_BONUS: f64 = 30.0;

/// 色の呼吸（tPulse）の角周波数
pub const COLOR_PULSE_FREQUENCY: f64 = 2.0;

/// |d| がこの値で色の補間が飽和する
pub const INTENSITY_SATURATION: f64 = 10.0;

/// 背景の残像フィル（暗い紺色、半透明）
pub const BACKDROP_RGB: (u8, u8, u8) = (5, 10, 25);
pub const BACKDROP_ALPHA: f64 = 0.9;

/// フレーム間隔（60fps）
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// ビューアでのリスク変更ステップ
pub const RISK_STEP: f64 = 0.5;
