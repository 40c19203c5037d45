//! 1フレーム分の描画
//!
//! 残像フィル → スパイラルを数サンプルずつストローク、の順で
//! サーフェスを更新する。サーフェスを書き換える以外の副作用はない。

use super::colors::{map_color, pulse_phase, Rgb};
use super::config::SpiralConfig;
use super::constants::MAX_DELTA_WIDTH;
use super::error::SpiralResult;
use super::spiral::{generate, RiskSample};
use super::surface::Surface;

/// サンプル i の線幅: 原点付近は細く、先端ほど太く、変化が大きいほど太い
pub fn line_width(base_width: f64, progress: f64, delta: f64) -> f64 {
    base_width * (0.5 + 0.5 * progress) + delta.abs().min(MAX_DELTA_WIDTH)
}

pub struct FrameRenderer {
    surface: Surface,
    config: SpiralConfig,
    // ストローク用の作業バッファ（フレームごとの確保を避ける）
    batch: Vec<(f64, f64)>,
}

impl FrameRenderer {
    pub fn new(width: usize, height: usize, config: SpiralConfig) -> SpiralResult<Self> {
        config.validate()?;
        let surface = Surface::new(width, height)?;
        Ok(Self {
            surface,
            batch: Vec::with_capacity(config.stroke_batch + 1),
            config,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn config(&self) -> &SpiralConfig {
        &self.config
    }

    /// サーフェスを作り直す（残像もリセットされる）
    pub fn resize(&mut self, width: usize, height: usize) -> SpiralResult<()> {
        self.surface = Surface::new(width, height)?;
        Ok(())
    }

    /// 経過時間 t 秒のフレームを描画する
    pub fn render(&mut self, sample: &RiskSample, t: f64) {
        if self.surface.is_empty() {
            return;
        }

        let (bd_r, bd_g, bd_b) = self.config.backdrop;
        self.surface
            .fade_toward(Rgb::new(bd_r, bd_g, bd_b), self.config.backdrop_alpha);

        let points = generate(sample, t, &self.config);
        if points.len() < 2 {
            return;
        }

        let delta = sample.delta();
        let t_pulse = pulse_phase(t);
        let cx = self.surface.width() as f64 / 2.0;
        let cy = self.surface.height() as f64 / 2.0;
        let batch_len = self.config.stroke_batch;
        let last = points.len() - 1;

        self.batch.clear();
        self.batch.push((cx + points[0].x, cy + points[0].y));

        for (i, p) in points.iter().enumerate().skip(1) {
            self.batch.push((cx + p.x, cy + p.y));

            if i % batch_len == 0 || i == last {
                let color = map_color(sample.mode, delta * p.progress, t_pulse);
                let width = line_width(self.config.base_line_width, p.progress, delta);
                self.surface.stroke_polyline(&self.batch, width, color);

                // 次のバッチは今の点から始める
                let anchor = (cx + p.x, cy + p.y);
                self.batch.clear();
                self.batch.push(anchor);
            }
        }
    }
}
