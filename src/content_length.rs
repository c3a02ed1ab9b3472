//! content-length ヘッダーの追跡

const CONTENT_LENGTH: &[u8] = b"content-length";

/// content-length ヘッダー値をパースする
///
/// ASCII 数字のみ受け付ける (符号、空白、空文字列は不可)。
/// 不正な値やオーバーフローは 0、つまり「指定なし」として扱う。
/// エラーにはしない。
pub fn parse_content_length(value: &[u8]) -> usize {
    parse_decimal(value).unwrap_or(0)
}

fn parse_decimal(value: &[u8]) -> Option<usize> {
    if value.is_empty() {
        return None;
    }
    value.iter().try_fold(0usize, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
    })
}

/// フレーム単位の content-length 状態
///
/// フレーム内で最初の `content-length` ヘッダーだけが有効。
/// 2 つ目以降は無視する (重複ヘッダーによるフレームスマグリング対策)。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ContentLengthTracker {
    /// 宣言されたボディ長 (0 は指定なし)
    content_length: usize,
    /// 残りのボディバイト数
    content_left: usize,
    /// 直前のヘッダーキーが content-length だった
    awaiting_value: bool,
    /// このフレームで content-length を既に処理した
    declared: bool,
}

impl ContentLengthTracker {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn on_header_key(&mut self, key: &[u8]) {
        if !self.declared && key == CONTENT_LENGTH {
            self.awaiting_value = true;
        }
    }

    pub fn on_header_value(&mut self, value: &[u8]) {
        if self.awaiting_value {
            let len = parse_content_length(value);
            self.content_length = len;
            self.content_left = len;
            self.declared = true;
        }
        self.awaiting_value = false;
    }

    /// ボディを n バイト読み進めた
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.content_left);
        self.content_left = self.content_left.saturating_sub(n);
    }

    pub fn content_length(&self) -> usize {
        self.content_length
    }

    pub fn content_left(&self) -> usize {
        self.content_left
    }
}
