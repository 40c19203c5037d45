//! ラスタサーフェス（0xRRGGBB の u32 バッファ）
//!
//! minifb にそのまま渡せる形式で保持する。

use std::path::Path;

use image::{ImageBuffer, Rgb as ImageRgb, RgbImage};
use rayon::prelude::*;

use super::colors::Rgb;
use super::error::{SpiralError, SpiralResult};

#[derive(Debug, Clone)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

#[inline]
fn blend_channel(src: u8, dst: u8, alpha: f64) -> u8 {
    (src as f64 * alpha + dst as f64 * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}

#[inline]
fn blend(src: Rgb, dst: u32, alpha: f64) -> u32 {
    let dst = Rgb::from_u32(dst);
    Rgb::new(
        blend_channel(src.r, dst.r, alpha),
        blend_channel(src.g, dst.g, alpha),
        blend_channel(src.b, dst.b, alpha),
    )
    .to_u32()
}

/// 点 (px, py) から線分 a-b までの距離
#[inline]
fn distance_to_segment(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - a.0) * dx + (py - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

impl Surface {
    /// 黒で初期化したサーフェスを確保する
    ///
    /// 幅や高さが 0 のサーフェスも作れる（描画は何もしない）。
    /// メモリを確保できない場合はエラーを返す。
    pub fn new(width: usize, height: usize) -> SpiralResult<Self> {
        let len = width.checked_mul(height).ok_or_else(|| {
            SpiralError::Surface(format!("{width}x{height} はサイズが大きすぎます"))
        })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| SpiralError::Surface(format!("{width}x{height}: {e}")))?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(Rgb::from_u32(self.pixels[y * self.width + x]))
        } else {
            None
        }
    }

    /// 全体を color で半透明に塗る。alpha < 1 なら前の内容がうっすら残る
    pub fn fade_toward(&mut self, color: Rgb, alpha: f64) {
        if self.is_empty() {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);

        self.pixels
            .par_chunks_mut(self.width)
            .for_each(|row| {
                for pixel in row.iter_mut() {
                    *pixel = blend(color, *pixel, alpha);
                }
            });
    }

    /// 折れ線を太さ line_width でアンチエイリアス付きで描く（丸い端点・結合）
    ///
    /// 座標はピクセル単位。各ピクセルは折れ線全体に対して一度だけ合成する。
    pub fn stroke_polyline(&mut self, points: &[(f64, f64)], line_width: f64, color: Rgb) {
        if self.is_empty() || points.is_empty() || line_width.is_nan() || line_width <= 0.0 {
            return;
        }

        let half = line_width / 2.0;
        let reach = half + 1.0;

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return;
        }

        let x0 = (min_x - reach).floor().max(0.0) as usize;
        let y0 = (min_y - reach).floor().max(0.0) as usize;
        let x1 = ((max_x + reach).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((max_y + reach).ceil().max(0.0) as usize).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
                let dist = if points.len() == 1 {
                    distance_to_segment(cx, cy, points[0], points[0])
                } else {
                    points
                        .windows(2)
                        .map(|w| distance_to_segment(cx, cy, w[0], w[1]))
                        .fold(f64::INFINITY, f64::min)
                };

                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let idx = py * self.width + px;
                    self.pixels[idx] = blend(color, self.pixels[idx], coverage);
                }
            }
        }
    }

    pub fn to_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = Rgb::from_u32(self.pixels[(y as usize) * self.width + (x as usize)]);
            ImageRgb([c.r, c.g, c.b])
        })
    }

    pub fn save_png(&self, path: &Path) -> SpiralResult<()> {
        if self.is_empty() {
            return Err(SpiralError::Surface(
                "空のサーフェスは保存できません".to_string(),
            ));
        }
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("画像を保存しました: {}", path.display());
        Ok(())
    }
}
