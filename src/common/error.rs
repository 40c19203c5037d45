//! エラー型

use thiserror::Error;

/// リスクスパイラル全体で使うエラー
#[derive(Error, Debug)]
pub enum SpiralError {
    /// red / blue / hybrid 以外のモード文字列
    #[error("不明なモード: {0:?} (red, blue, hybrid のいずれか)")]
    InvalidMode(String),

    /// 描画サーフェスを確保できなかった
    #[error("サーフェスの確保に失敗しました: {0}")]
    Surface(String),

    /// 設定値が不正
    #[error("設定エラー: {0}")]
    Config(String),

    /// コマンドライン引数が不正
    #[error("引数エラー: {0}")]
    Cli(String),

    #[error("画像エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("入出力エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpiralResult<T> = Result<T, SpiralError>;
