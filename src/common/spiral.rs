//! スパイラル形状の生成
//!
//! 極座標 r(θ) = r0 + b·θ + pulse·scale(E) のサンプル列を作る。
//! 成長率 b = K·ln(1+E) はリスクが大きいほど緩やかに増え、
//! 角速度 ω = 1+|ΔE| はリスクの変化が大きいほど速く回る。

use std::fmt;
use std::str::FromStr;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::config::SpiralConfig;
use super::constants::{
    PULSE_AMPLITUDE, PULSE_FREQUENCY, PULSE_SCALE_BASE, PULSE_SCALE_MAX_BONUS,
};
use super::error::SpiralError;

/// 色の遷移を決める動作モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Red,
    Blue,
    Hybrid,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Red, Mode::Blue, Mode::Hybrid];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Red => "red",
            Mode::Blue => "blue",
            Mode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SpiralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Mode::Red),
            "blue" => Ok(Mode::Blue),
            "hybrid" => Ok(Mode::Hybrid),
            _ => Err(SpiralError::InvalidMode(s.to_string())),
        }
    }
}

/// 呼び出し側が持つ入力値。描画中は不変で、更新時は丸ごと置き換える
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskSample {
    pub risk: f64,
    pub previous_risk: f64,
    pub mode: Mode,
}

impl RiskSample {
    pub fn new(risk: f64, previous_risk: f64, mode: Mode) -> Self {
        Self {
            risk,
            previous_risk,
            mode,
        }
    }

    /// E = max(0, risk)。NaN も 0 になる
    pub fn energy(&self) -> f64 {
        self.risk.max(0.0)
    }

    pub fn previous_energy(&self) -> f64 {
        self.previous_risk.max(0.0)
    }

    /// ΔE = E − Eprev（クランプ後の値で計算）
    pub fn delta(&self) -> f64 {
        self.energy() - self.previous_energy()
    }
}

/// 1サンプル分の点。フレームごとに作り直す
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralPoint {
    pub theta: f64,
    pub radius: f64,
    pub angle: f64,
    /// 中心を原点とした座標
    pub x: f64,
    pub y: f64,
    /// 0 から (N-1)/N まで単調増加
    pub progress: f64,
}

/// 半径成長率 b = K·ln(1+E)
pub fn growth_rate(energy: f64, k: f64) -> f64 {
    k * energy.max(0.0).ln_1p()
}

/// 角速度 ω = 1+|ΔE|
pub fn angular_velocity(delta: f64) -> f64 {
    1.0 + delta.abs()
}

/// ハイブリッドモードのみの脈動 0.1·sin(6t)
pub fn pulse(mode: Mode, t: f64) -> f64 {
    match mode {
        Mode::Hybrid => PULSE_AMPLITUDE * (PULSE_FREQUENCY * t).sin(),
        Mode::Red | Mode::Blue => 0.0,
    }
}

/// リスクが高いほど脈動を強める: 5 + min(30, 2E)
pub fn pulse_scale(energy: f64) -> f64 {
    PULSE_SCALE_BASE + (2.0 * energy).min(PULSE_SCALE_MAX_BONUS)
}

/// 経過時間 t 秒でのスパイラルのサンプル列を生成する
pub fn generate(sample: &RiskSample, t: f64, config: &SpiralConfig) -> Vec<SpiralPoint> {
    let n = config.segments;
    if n == 0 {
        return Vec::new();
    }

    let energy = sample.energy();
    let delta = sample.delta();

    let b = growth_rate(energy, config.growth_k);
    let omega = angular_velocity(delta);
    let radial_pulse = pulse(sample.mode, t) * pulse_scale(energy);
    let d_theta = config.sweep / n as f64;

    (0..n)
        .map(|i| {
            let theta = i as f64 * d_theta;
            let radius = config.base_radius + b * theta + radial_pulse;
            let angle = omega * theta + t;
            let z = Complex::from_polar(radius, angle);

            SpiralPoint {
                theta,
                radius,
                angle,
                x: z.re,
                y: z.im,
                progress: i as f64 / n as f64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_risk_is_clamped() {
        let s = RiskSample::new(-3.0, -8.0, Mode::Red);
        assert_eq!(s.energy(), 0.0);
        assert_eq!(s.previous_energy(), 0.0);
        assert_eq!(s.delta(), 0.0);

        let s = RiskSample::new(f64::NAN, 2.0, Mode::Blue);
        assert_eq!(s.energy(), 0.0);
        assert_eq!(s.delta(), -2.0);
    }

    #[test]
    fn zero_risk_degenerates_to_exact_circle() {
        let config = SpiralConfig::default();
        for mode in [Mode::Red, Mode::Blue] {
            let s = RiskSample::new(0.0, 0.0, mode);
            for t in [0.0, 0.7, 12.5] {
                let points = generate(&s, t, &config);
                assert_eq!(points.len(), config.segments);
                assert!(points.iter().all(|p| p.radius == config.base_radius));
            }
        }
        // ハイブリッドでも sin(0) = 0 の瞬間は円になる
        let s = RiskSample::new(0.0, 0.0, Mode::Hybrid);
        let points = generate(&s, 0.0, &config);
        assert!(points.iter().all(|p| p.radius == config.base_radius));
    }

    #[test]
    fn progress_runs_from_zero_to_last_fraction() {
        let config = SpiralConfig::default();
        let points = generate(&RiskSample::new(7.5, 5.2, Mode::Hybrid), 1.0, &config);
        let n = config.segments as f64;

        assert_eq!(points[0].progress, 0.0);
        assert_eq!(points[points.len() - 1].progress, (n - 1.0) / n);
        assert!(points.windows(2).all(|w| w[0].progress < w[1].progress));
    }

    #[test]
    fn growth_rate_is_monotonic() {
        let mut prev = growth_rate(0.0, 5.0);
        assert_eq!(prev, 0.0);
        for i in 1..200 {
            let b = growth_rate(i as f64 * 0.25, 5.0);
            assert!(b >= prev);
            prev = b;
        }
    }

    #[test]
    fn pulse_only_in_hybrid() {
        assert_eq!(pulse(Mode::Red, 0.3), 0.0);
        assert_eq!(pulse(Mode::Blue, 0.3), 0.0);
        assert!(pulse(Mode::Hybrid, 0.3) != 0.0);
        assert!(pulse(Mode::Hybrid, 0.3).abs() <= PULSE_AMPLITUDE);
    }

    #[test]
    fn pulse_scale_is_capped() {
        assert_eq!(pulse_scale(0.0), 5.0);
        assert_eq!(pulse_scale(4.0), 13.0);
        assert_eq!(pulse_scale(15.0), 35.0);
        assert_eq!(pulse_scale(1000.0), 35.0);
    }

    #[test]
    fn cartesian_matches_polar() {
        let config = SpiralConfig::default();
        let s = RiskSample::new(3.0, 1.0, Mode::Red);
        for p in generate(&s, 2.0, &config).iter().step_by(97) {
            assert!((p.x - p.radius * p.angle.cos()).abs() < 1e-9);
            assert!((p.y - p.radius * p.angle.sin()).abs() < 1e-9);
            // ω = 1 + |ΔE| = 3
            assert!((p.angle - (3.0 * p.theta + 2.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("red".parse::<Mode>().unwrap(), Mode::Red);
        assert_eq!(" Hybrid ".parse::<Mode>().unwrap(), Mode::Hybrid);
        assert_eq!("BLUE".parse::<Mode>().unwrap(), Mode::Blue);
        assert!(matches!(
            "purple".parse::<Mode>(),
            Err(SpiralError::InvalidMode(_))
        ));
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn empty_sample_count_yields_no_points() {
        let config = SpiralConfig {
            segments: 0,
            ..SpiralConfig::default()
        };
        assert!(generate(&RiskSample::default(), 0.0, &config).is_empty());
    }
}
