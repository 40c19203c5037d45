//! カラーマップと色変換関数
//!
//! モードと（進行度でスケールした）リスク差分から、
//! 5つのアンカー色の間を線形補間して色を決める。

use super::constants::{COLOR_PULSE_FREQUENCY, INTENSITY_SATURATION};
use super::spiral::Mode;

/// 8bit RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// u32形式: 0xRRGGBB
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub fn from_u32(pixel: u32) -> Self {
        Self {
            r: ((pixel >> 16) & 0xFF) as u8,
            g: ((pixel >> 8) & 0xFF) as u8,
            b: (pixel & 0xFF) as u8,
        }
    }
}

/// アンカー色 (0..255 の実数で保持し、最後に丸める)
pub const RED: (f64, f64, f64) = (255.0, 60.0, 60.0);
pub const ORANGE: (f64, f64, f64) = (255.0, 160.0, 60.0);
pub const PURPLE: (f64, f64, f64) = (180.0, 80.0, 255.0);
pub const BLUE: (f64, f64, f64) = (60.0, 140.0, 255.0);
pub const CYAN: (f64, f64, f64) = (60.0, 220.0, 255.0);

/// ハイブリッドモードで紫から副アンカーへ寄せる割合
const HYBRID_SIDE_MIX: f64 = 0.6;
/// 呼吸による混合率: 0.3 + 0.4 * tPulse
const HYBRID_MIX_BASE: f64 = 0.3;
const HYBRID_MIX_SPAN: f64 = 0.4;

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
fn lerp_rgb(from: (f64, f64, f64), to: (f64, f64, f64), t: f64) -> (f64, f64, f64) {
    (
        lerp(from.0, to.0, t),
        lerp(from.1, to.1, t),
        lerp(from.2, to.2, t),
    )
}

/// 補間の強さ。|d| >= 10 で 1 に飽和する
pub fn intensity(d: f64) -> f64 {
    (d.abs() / INTENSITY_SATURATION).min(1.0)
}

/// 経過時間から色の呼吸位相 tPulse ∈ [0, 1] を求める
pub fn pulse_phase(t: f64) -> f64 {
    0.5 + 0.5 * (COLOR_PULSE_FREQUENCY * t).sin()
}

/// モードと差分の符号から (from, to) アンカーを選ぶ
fn anchors(mode: Mode, d: f64, t_pulse: f64) -> ((f64, f64, f64), (f64, f64, f64)) {
    match mode {
        // 上昇: 赤 → オレンジ、下降: 赤 → 紫（冷却）
        Mode::Red if d >= 0.0 => (RED, ORANGE),
        Mode::Red => (RED, PURPLE),
        // 下降: 青 → シアン、上昇: 青 → 紫（加熱）
        Mode::Blue if d <= 0.0 => (BLUE, CYAN),
        Mode::Blue => (BLUE, PURPLE),
        Mode::Hybrid => {
            let side = if d > 0.0 { RED } else { BLUE };
            let target = lerp_rgb(PURPLE, side, HYBRID_SIDE_MIX);
            let mix = HYBRID_MIX_BASE + HYBRID_MIX_SPAN * t_pulse;
            (PURPLE, lerp_rgb(PURPLE, target, mix))
        }
    }
}

/// (モード, 差分, 呼吸位相) から色を計算する
///
/// 内部状態を持たない純粋関数。同じ入力には常に同じ色を返す。
pub fn map_color(mode: Mode, d: f64, t_pulse: f64) -> Rgb {
    let (from, to) = anchors(mode, d, t_pulse);
    let (r, g, b) = lerp_rgb(from, to, intensity(d));

    Rgb::new(
        r.round().clamp(0.0, 255.0) as u8,
        g.round().clamp(0.0, 255.0) as u8,
        b.round().clamp(0.0, 255.0) as u8,
    )
}
