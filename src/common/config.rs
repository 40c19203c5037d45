//! 描画パラメータの設定
//!
//! 既定値は `constants` の値。JSON から読み込む場合、
//! 省略したフィールドは既定値になる。

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::error::{SpiralError, SpiralResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// 基準半径（ピクセル）
    pub base_radius: f64,
    /// 成長率の係数 K
    pub growth_k: f64,
    /// 線幅の基準値
    pub base_line_width: f64,
    /// サンプル数 N
    pub segments: usize,
    /// 角度方向の総スイープ S（ラジアン）
    pub sweep: f64,
    /// ストロークをまとめるサンプル数
    pub stroke_batch: usize,
    /// 残像フィルの色
    pub backdrop: (u8, u8, u8),
    /// 残像フィルの不透明度。1.0 未満なら前フレームが薄く残る
    pub backdrop_alpha: f64,
    /// フレーム間隔（ミリ秒）
    pub frame_interval_ms: f64,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            base_radius: BASE_RADIUS,
            growth_k: GROWTH_K,
            base_line_width: BASE_LINE_WIDTH,
            segments: SEGMENTS,
            sweep: MAX_THETA,
            stroke_batch: STROKE_BATCH,
            backdrop: BACKDROP_RGB,
            backdrop_alpha: BACKDROP_ALPHA,
            frame_interval_ms: FRAME_INTERVAL_MS,
        }
    }
}

impl SpiralConfig {
    pub fn validate(&self) -> SpiralResult<()> {
        if !self.base_radius.is_finite() || self.base_radius < 0.0 {
            return Err(SpiralError::Config(format!(
                "base_radius must be finite and >= 0, got {}",
                self.base_radius
            )));
        }
        if !self.growth_k.is_finite() || self.growth_k < 0.0 {
            return Err(SpiralError::Config(format!(
                "growth_k must be finite and >= 0, got {}",
                self.growth_k
            )));
        }
        if !self.base_line_width.is_finite() || self.base_line_width <= 0.0 {
            return Err(SpiralError::Config(format!(
                "base_line_width must be > 0, got {}",
                self.base_line_width
            )));
        }
        if self.segments < 2 {
            return Err(SpiralError::Config(format!(
                "segments must be >= 2, got {}",
                self.segments
            )));
        }
        if !self.sweep.is_finite() || self.sweep <= 0.0 {
            return Err(SpiralError::Config(format!(
                "sweep must be > 0, got {}",
                self.sweep
            )));
        }
        if self.stroke_batch == 0 {
            return Err(SpiralError::Config(
                "stroke_batch must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.backdrop_alpha) {
            return Err(SpiralError::Config(format!(
                "backdrop_alpha must be in [0, 1], got {}",
                self.backdrop_alpha
            )));
        }
        if !self.frame_interval_ms.is_finite() || self.frame_interval_ms <= 0.0 {
            return Err(SpiralError::Config(format!(
                "frame_interval_ms must be > 0, got {}",
                self.frame_interval_ms
            )));
        }
        Ok(())
    }

    /// JSON 文字列から読み込んで検証する
    pub fn from_json(json: &str) -> SpiralResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SpiralError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SpiralResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("設定を読み込みました: {}", path.display());
        Ok(config)
    }

    pub fn frame_interval_secs(&self) -> f64 {
        self.frame_interval_ms / 1000.0
    }

    /// フレーム間隔に対応するウィンドウ側のフレームレート（最低 1）
    pub fn target_fps(&self) -> usize {
        (1000.0 / self.frame_interval_ms).round().max(1.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SpiralConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SpiralConfig::from_json(r#"{ "segments": 600, "growth_k": 3.0 }"#).unwrap();
        assert_eq!(config.segments, 600);
        assert_eq!(config.growth_k, 3.0);
        assert_eq!(config.base_radius, BASE_RADIUS);
        assert_eq!(config.backdrop, BACKDROP_RGB);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            r#"{ "segments": 1 }"#,
            r#"{ "stroke_batch": 0 }"#,
            r#"{ "backdrop_alpha": 1.5 }"#,
            r#"{ "growth_k": -1.0 }"#,
            r#"{ "frame_interval_ms": 0.0 }"#,
            r#"{ "base_line_width": 0.0 }"#,
        ];
        for json in bad {
            assert!(
                matches!(SpiralConfig::from_json(json), Err(SpiralError::Config(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn target_fps_follows_the_frame_interval() {
        assert_eq!(SpiralConfig::default().target_fps(), 60);

        let slow = SpiralConfig::from_json(r#"{ "frame_interval_ms": 40.0 }"#).unwrap();
        assert_eq!(slow.target_fps(), 25);

        let very_slow = SpiralConfig::from_json(r#"{ "frame_interval_ms": 5000.0 }"#).unwrap();
        assert_eq!(very_slow.target_fps(), 1);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            SpiralConfig::from_json("{ segments: "),
            Err(SpiralError::Config(_))
        ));
    }
}
