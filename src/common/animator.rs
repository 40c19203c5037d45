//! アニメーションの駆動
//!
//! Idle → Running → Idle の状態機械。入力が変わるたびに
//! 予約済みのフレームを必ず取り消してから新しいループを始めるので、
//! 同じサーフェスに2つのループが描くことはない。

use std::time::Duration;

use super::clock::{FrameClock, FrameHandle};
use super::config::SpiralConfig;
use super::error::SpiralResult;
use super::renderer::FrameRenderer;
use super::spiral::RiskSample;
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Running {
        started_at: Duration,
        pending: Option<FrameHandle>,
    },
}

pub struct SpiralAnimator<C: FrameClock> {
    clock: C,
    inputs: RiskSample,
    renderer: FrameRenderer,
    state: AnimationState,
    frames: u64,
}

impl<C: FrameClock> SpiralAnimator<C> {
    /// サーフェスを確保して Idle 状態で作る。確保できなければここでエラーになる
    pub fn new(
        clock: C,
        inputs: RiskSample,
        width: usize,
        height: usize,
        config: SpiralConfig,
    ) -> SpiralResult<Self> {
        let renderer = FrameRenderer::new(width, height, config)?;
        if renderer.surface().is_empty() {
            log::warn!("サーフェスが {width}x{height} のため描画は行いません");
        }
        Ok(Self {
            clock,
            inputs,
            renderer,
            state: AnimationState::Idle,
            frames: 0,
        })
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Running { .. })
    }

    pub fn inputs(&self) -> &RiskSample {
        &self.inputs
    }

    pub fn surface(&self) -> &Surface {
        self.renderer.surface()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// これまでに描画したフレーム数
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// 開始時刻を記録して最初のフレームを予約する。実行中なら何もしない
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let started_at = self.clock.now();
        let pending = Some(self.clock.request_frame());
        self.state = AnimationState::Running {
            started_at,
            pending,
        };
        log::debug!(
            "アニメーション開始: risk={} prev={} mode={}",
            self.inputs.risk,
            self.inputs.previous_risk,
            self.inputs.mode
        );
    }

    /// 予約済みのフレームを取り消して Idle に戻る。何度呼んでもよい
    pub fn stop(&mut self) {
        if let AnimationState::Running {
            pending: Some(handle),
            ..
        } = self.state
        {
            self.clock.cancel_frame(handle);
        }
        if self.is_running() {
            log::debug!("アニメーション停止 ({} frames)", self.frames);
        }
        self.state = AnimationState::Idle;
    }

    /// 入力を丸ごと置き換える。実行中なら古いループを止めてから再開する
    pub fn set_inputs(&mut self, next: RiskSample) {
        if next == self.inputs {
            return;
        }
        let was_running = self.is_running();
        self.stop();
        self.inputs = next;
        if was_running {
            self.start();
        }
    }

    /// サーフェスの大きさを変える。残像は消える
    pub fn resize(&mut self, width: usize, height: usize) -> SpiralResult<()> {
        self.renderer.resize(width, height)?;
        log::debug!("サーフェスを {width}x{height} に変更");
        Ok(())
    }

    /// 予約したフレームの期限が来たときに呼ぶ
    ///
    /// 取り消し済み・古いハンドルは無視して false を返す。
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        let started_at = match self.state {
            AnimationState::Running {
                started_at,
                pending: Some(pending),
            } if pending == handle => started_at,
            _ => return false,
        };

        let elapsed = self.clock.now().saturating_sub(started_at).as_secs_f64();
        self.renderer.render(&self.inputs, elapsed);
        self.frames += 1;

        self.state = AnimationState::Running {
            started_at,
            pending: Some(self.clock.request_frame()),
        };
        true
    }

    /// 期限が来たフレームをすべて処理し、描画したフレーム数を返す
    pub fn pump(&mut self) -> usize {
        let mut due = Vec::new();
        while let Some(handle) = self.clock.take_due() {
            due.push(handle);
        }
        due.into_iter().filter(|&h| self.on_frame(h)).count()
    }
}

impl<C: FrameClock> Drop for SpiralAnimator<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
