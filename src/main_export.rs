//! リスクスパイラル 連番画像書き出し（ウィンドウなし）
//!
//! 手動クロックで時間を1フレームずつ進めるので、同じ引数なら
//! 毎回まったく同じ画像列が得られる。
//! 残像があるため描画は順番に行い、PNG のエンコードだけ並列化する。

use std::time::{Duration, Instant};

use rayon::prelude::*;
use risk_spiral::common::cli::{Options, HELP_TEXT, VERSION};
use risk_spiral::{ManualClock, SpiralAnimator, SpiralConfig, SpiralError, SpiralResult};

fn main() -> SpiralResult<()> {
    env_logger::init();

    let opts = Options::parse()?;
    if opts.show_help {
        print!("{HELP_TEXT}");
        return Ok(());
    }
    if opts.show_version {
        println!("risk-spiral-export {VERSION}");
        return Ok(());
    }

    let config = match &opts.config_path {
        Some(path) => SpiralConfig::load(path)?,
        None => SpiralConfig::default(),
    };

    let clock = ManualClock::new(Duration::from_secs_f64(1.0 / opts.fps));
    let mut animator = SpiralAnimator::new(clock, opts.sample, opts.width, opts.height, config)?;
    if animator.surface().is_empty() {
        return Err(SpiralError::Surface(format!(
            "{}x{} のサーフェスには書き出せません",
            opts.width, opts.height
        )));
    }

    std::fs::create_dir_all(&opts.out_dir)?;

    let start = Instant::now();
    animator.start();

    let mut frames = Vec::with_capacity(opts.frames);
    for _ in 0..opts.frames {
        animator.clock_mut().step();
        if animator.pump() > 0 {
            frames.push(animator.surface().to_image());
        }
    }
    animator.stop();
    log::info!("{} フレーム描画: {:.2?}", frames.len(), start.elapsed());

    let start = Instant::now();
    frames
        .par_iter()
        .enumerate()
        .try_for_each(|(i, img)| -> SpiralResult<()> {
            let path = opts.out_dir.join(format!("spiral_{i:04}.png"));
            img.save_with_format(&path, image::ImageFormat::Png)?;
            Ok(())
        })?;

    println!(
        "{} 枚を {} に保存しました ({:.2?})",
        frames.len(),
        opts.out_dir.display(),
        start.elapsed()
    );
    Ok(())
}
