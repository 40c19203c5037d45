//! コマンドライン引数の解析
//!
//! `--flag=value` 形式のみ。環境変数 `RISK_SPIRAL_*` で既定値を上書きでき、
//! 引数は環境変数より優先される。

use std::path::PathBuf;

use super::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use super::error::{SpiralError, SpiralResult};
use super::spiral::{Mode, RiskSample};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
USAGE:
    risk-spiral [OPTIONS]
    risk-spiral-export [OPTIONS]

OPTIONS:
    --risk=F         現在のリスク値 (既定: 7.5, 負の値は 0 扱い)
    --prev-risk=F    前回のリスク値 (既定: 5.2)
    --mode=MODE      red / blue / hybrid (既定: hybrid)
    --width=N        描画幅 (既定: 320, 0 以下は描画なし)
    --height=N       描画高さ (既定: 320, 0 以下は描画なし)
    --config=PATH    描画パラメータの JSON ファイル
    --frames=N       [export] 書き出すフレーム数 (既定: 120)
    --fps=F          [export] フレームレート (既定: 60)
    --out=DIR        [export] 出力ディレクトリ (既定: frames)
    --help, -h       このヘルプを表示
    --version, -V    バージョンを表示

ENVIRONMENT:
    RISK_SPIRAL_RISK, RISK_SPIRAL_PREV_RISK, RISK_SPIRAL_MODE
";

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub sample: RiskSample,
    pub width: usize,
    pub height: usize,
    pub config_path: Option<PathBuf>,
    pub frames: usize,
    pub fps: f64,
    pub out_dir: PathBuf,
    pub show_help: bool,
    pub show_version: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            // パネルで使っていた初期値
            sample: RiskSample::new(7.5, 5.2, Mode::Hybrid),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            config_path: None,
            frames: 120,
            fps: 60.0,
            out_dir: PathBuf::from("frames"),
            show_help: false,
            show_version: false,
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> SpiralResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SpiralError::Cli(format!("{flag}: 値 {value:?} を解釈できません")))
}

/// サイズは負の値も受け付け、0 に切り詰める（空のサーフェスになる）
fn parse_size(flag: &str, value: &str) -> SpiralResult<usize> {
    let size: i64 = parse_value(flag, value)?;
    Ok(usize::try_from(size.max(0)).unwrap_or(usize::MAX))
}

impl Options {
    pub fn parse() -> SpiralResult<Self> {
        Self::parse_from(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    pub fn parse_from<I, S, F>(args: I, get_env: F) -> SpiralResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(v) = get_env("RISK_SPIRAL_RISK") {
            opts.sample.risk = parse_value("RISK_SPIRAL_RISK", &v)?;
        }
        if let Some(v) = get_env("RISK_SPIRAL_PREV_RISK") {
            opts.sample.previous_risk = parse_value("RISK_SPIRAL_PREV_RISK", &v)?;
        }
        if let Some(v) = get_env("RISK_SPIRAL_MODE") {
            opts.sample.mode = v.parse()?;
        }

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => opts.show_help = true,
                "--version" | "-V" => opts.show_version = true,
                other => {
                    let (flag, value) = other
                        .split_once('=')
                        .ok_or_else(|| SpiralError::Cli(format!("不明な引数: {other}")))?;
                    match flag {
                        "--risk" => opts.sample.risk = parse_value(flag, value)?,
                        "--prev-risk" => opts.sample.previous_risk = parse_value(flag, value)?,
                        "--mode" => opts.sample.mode = value.parse()?,
                        "--width" => opts.width = parse_size(flag, value)?,
                        "--height" => opts.height = parse_size(flag, value)?,
                        "--config" => opts.config_path = Some(PathBuf::from(value)),
                        "--frames" => opts.frames = parse_value(flag, value)?,
                        "--fps" => {
                            let fps: f64 = parse_value(flag, value)?;
                            if !(fps.is_finite() && fps > 0.0) {
                                return Err(SpiralError::Cli(format!(
                                    "--fps は正の値が必要です: {value}"
                                )));
                            }
                            opts.fps = fps;
                        }
                        "--out" => opts.out_dir = PathBuf::from(value),
                        _ => return Err(SpiralError::Cli(format!("不明な引数: {other}"))),
                    }
                }
            }
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_arguments() {
        let opts = Options::parse_from(Vec::<String>::new(), no_env).unwrap();
        assert_eq!(opts, Options::default());
        assert_eq!((opts.width, opts.height), (320, 320));
    }

    #[test]
    fn parses_all_flags() {
        let opts = Options::parse_from(
            [
                "--risk=3.5",
                "--prev-risk=-1",
                "--mode=blue",
                "--width=640",
                "--height=480",
                "--config=spiral.json",
                "--frames=10",
                "--fps=30",
                "--out=/tmp/spiral",
            ],
            no_env,
        )
        .unwrap();
        assert_eq!(opts.sample, RiskSample::new(3.5, -1.0, Mode::Blue));
        assert_eq!((opts.width, opts.height), (640, 480));
        assert_eq!(opts.config_path, Some(PathBuf::from("spiral.json")));
        assert_eq!(opts.frames, 10);
        assert_eq!(opts.fps, 30.0);
        assert_eq!(opts.out_dir, PathBuf::from("/tmp/spiral"));
    }

    #[test]
    fn arguments_override_environment() {
        let env = |key: &str| match key {
            "RISK_SPIRAL_RISK" => Some("9".to_string()),
            "RISK_SPIRAL_MODE" => Some("red".to_string()),
            _ => None,
        };
        let opts = Options::parse_from(["--risk=1"], env).unwrap();
        assert_eq!(opts.sample.risk, 1.0);
        assert_eq!(opts.sample.mode, Mode::Red);
    }

    #[test]
    fn rejects_bad_input() {
        for args in [
            vec!["--mode=green"],
            vec!["--width=wide"],
            vec!["--risk=abc"],
            vec!["--fps=0"],
            vec!["--unknown=1"],
            vec!["positional"],
        ] {
            assert!(Options::parse_from(args.clone(), no_env).is_err(), "{args:?}");
        }
    }

    #[test]
    fn non_positive_sizes_clamp_to_zero() {
        let opts = Options::parse_from(["--width=-3", "--height=0"], no_env).unwrap();
        assert_eq!((opts.width, opts.height), (0, 0));

        let opts = Options::parse_from(["--height=-1"], no_env).unwrap();
        assert_eq!((opts.width, opts.height), (320, 0));
    }

    #[test]
    fn help_and_version_flags() {
        let opts = Options::parse_from(["-h", "--version"], no_env).unwrap();
        assert!(opts.show_help);
        assert!(opts.show_version);
    }
}
