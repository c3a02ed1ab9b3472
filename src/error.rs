use std::fmt;

/// トークナイズエラー
///
/// いずれも [`FrameSink::on_error`](crate::FrameSink::on_error) で通知されるだけで、
/// トークナイザー自体は使い続けられる。接続を閉じるかどうかは呼び出し側が決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    /// メソッドが来るべき位置に不正なバイトがある
    InvalidRequest,
    /// メソッド行が不正
    InvalidMethod,
    /// ヘッダー行が不正 (コロンなし、制御文字など) または終端バイトがない
    InvalidFrame,
    /// トークンがスクラッチバッファの容量を、またはボディが `max_body_size` を超えた
    TooBig { limit: usize },
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::InvalidRequest => write!(f, "invalid request line"),
            TokenizeError::InvalidMethod => write!(f, "invalid method"),
            TokenizeError::InvalidFrame => write!(f, "invalid frame"),
            TokenizeError::TooBig { limit } => {
                write!(f, "too big: limit is {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for TokenizeError {}
