/// デフォルトのトークン最大長 (バイト)
pub const DEFAULT_MAX_TOKEN_SIZE: usize = 2048;

/// デフォルトのボディ最大長 (バイト)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// トークナイザーの制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerLimits {
    /// メソッド名、ヘッダーキー、ヘッダー値それぞれの最大長 (デフォルト: 2KB)
    ///
    /// スクラッチバッファはこのサイズで一度だけ確保され、以後伸長しない。
    /// これを超えるトークンは `TooBig` として拒否される。
    pub max_token_size: usize,
    /// 1 フレームあたりのボディ最大長 (デフォルト: 10MB)
    ///
    /// ボディはトークナイザー内には保持しないが、受け手が溜め込む場合の上限になる。
    /// 超えた時点で制限までのボディを流したうえで `TooBig` を通知し、フレームを破棄する。
    pub max_body_size: usize,
}

impl Default for TokenizerLimits {
    fn default() -> Self {
        Self {
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl TokenizerLimits {
    /// トークン最大長を指定して作成
    ///
    /// ボディ最大長はデフォルトのまま。
    pub fn new(max_token_size: usize) -> Self {
        Self {
            max_token_size,
            ..Self::default()
        }
    }
}
