//! リスクスパイラル インタラクティブビューア
//!
//! リスク値・前回リスク値・モードを対数スパイラルとしてアニメーション表示する。
//!
//! 操作方法:
//!   - 1 / 2 / 3 キー: モード切替 (red / blue / hybrid)
//!   - ↑ / ↓ キー: リスクを 0.5 ずつ上げ下げ（前回値は直前の値になる）
//!   - S キー: 現在の表示を画像として保存
//!   - Q / Escape キー: 終了

use std::path::PathBuf;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use risk_spiral::common::{
    cli::{Options, HELP_TEXT, VERSION},
    constants::RISK_STEP,
};
use risk_spiral::{
    Mode, RiskSample, SpiralAnimator, SpiralConfig, SpiralError, SpiralResult, SystemClock,
};

/// ビューアの状態
struct ViewerState {
    animator: SpiralAnimator<SystemClock>,
    save_counter: u32,
}

impl ViewerState {
    fn new(opts: &Options, config: SpiralConfig) -> SpiralResult<Self> {
        let clock = SystemClock::new(Duration::from_secs_f64(config.frame_interval_secs()));
        let animator = SpiralAnimator::new(clock, opts.sample, opts.width, opts.height, config)?;
        Ok(Self {
            animator,
            save_counter: 0,
        })
    }

    fn set_mode(&mut self, mode: Mode) {
        let current = *self.animator.inputs();
        if current.mode != mode {
            log::info!("モード切替: {} → {}", current.mode, mode);
        }
        self.animator.set_inputs(RiskSample { mode, ..current });
    }

    /// リスクを step だけ動かす。前回値には直前のリスクが入る
    fn shift_risk(&mut self, step: f64) {
        let current = *self.animator.inputs();
        let next = RiskSample::new((current.risk + step).max(0.0), current.risk, current.mode);
        log::info!("リスク: {:.2} → {:.2}", current.risk, next.risk);
        self.animator.set_inputs(next);
    }

    fn save_image(&mut self) -> SpiralResult<()> {
        self.save_counter += 1;
        let filename = PathBuf::from(format!("risk_spiral_{:03}.png", self.save_counter));
        self.animator.surface().save_png(&filename)?;
        println!("画像を保存しました: {}", filename.display());
        Ok(())
    }

    fn title(&self) -> String {
        let s = self.animator.inputs();
        format!(
            "リスクスパイラル [{}] E={:.2} ΔE={:+.2}",
            s.mode,
            s.energy(),
            s.delta()
        )
    }
}

fn main() -> SpiralResult<()> {
    env_logger::init();

    let opts = Options::parse()?;
    if opts.show_help {
        print!("{HELP_TEXT}");
        return Ok(());
    }
    if opts.show_version {
        println!("risk-spiral {VERSION}");
        return Ok(());
    }

    let config = match &opts.config_path {
        Some(path) => SpiralConfig::load(path)?,
        None => SpiralConfig::default(),
    };

    println!("操作方法:");
    println!("  - 1 / 2 / 3: モード切替 (red / blue / hybrid)");
    println!("  - ↑ / ↓: リスクを {RISK_STEP} ずつ変更");
    println!("  - S キー: 現在の表示を画像として保存");
    println!("  - Q / Escape キー: 終了");
    println!();

    // minifb は 0 サイズのウィンドウを作れないので最低 1 ピクセルにする
    let win_w = opts.width.max(1);
    let win_h = opts.height.max(1);

    // 描画ループとフレームクロックの間隔を揃える
    let target_fps = config.target_fps();
    let mut state = ViewerState::new(&opts, config)?;

    let mut window = Window::new(
        &state.title(),
        win_w,
        win_h,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| SpiralError::Surface(format!("ウィンドウの作成に失敗しました: {e}")))?;

    window.set_target_fps(target_fps);

    state.animator.start();
    let start = Instant::now();
    let blank = vec![0u32; win_w * win_h];
    let mut last_title = state.title();

    while window.is_open() && !window.is_key_down(Key::Escape) && !window.is_key_down(Key::Q) {
        if window.is_key_pressed(Key::Key1, KeyRepeat::No) {
            state.set_mode(Mode::Red);
        }
        if window.is_key_pressed(Key::Key2, KeyRepeat::No) {
            state.set_mode(Mode::Blue);
        }
        if window.is_key_pressed(Key::Key3, KeyRepeat::No) {
            state.set_mode(Mode::Hybrid);
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            state.shift_risk(RISK_STEP);
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            state.shift_risk(-RISK_STEP);
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            if let Err(e) = state.save_image() {
                log::warn!("画像の保存に失敗しました: {e}");
            }
        }

        state.animator.pump();

        let title = state.title();
        if title != last_title {
            window.set_title(&title);
            last_title = title;
        }

        let surface = state.animator.surface();
        let buffer = if surface.is_empty() {
            &blank[..]
        } else {
            surface.pixels()
        };
        window
            .update_with_buffer(buffer, win_w, win_h)
            .map_err(|e| SpiralError::Surface(format!("バッファの更新に失敗しました: {e}")))?;
    }

    state.animator.stop();
    log::info!(
        "{} フレーム描画 ({:.1?})",
        state.animator.frames_rendered(),
        start.elapsed()
    );
    println!("終了しました");
    Ok(())
}
