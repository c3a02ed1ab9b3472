//! トークナイザーの状態定義

/// パース状態
///
/// 常にいずれか 1 つだけが有効。
/// `\r` の直後の `\n` は `HeaderLineAlmostDone` と `AlmostDone` が吸収するため、
/// 先読みなしで `\n` と `\r\n` のどちらの改行も受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// フレーム開始待ち (ハートビートや終端バイトは読み飛ばす)
    Start,
    /// メソッド名読み取り中
    Method,
    /// 行末の `\r` の後、`\n` 待ち
    HeaderLineAlmostDone {
        /// メソッド行の `\r` だった
        after_method: bool,
    },
    /// 行頭 (ヘッダーキーかヘッダーブロック終端待ち)
    HeaderLineDone,
    /// ヘッダーキー読み取り中
    HeaderLineKey,
    /// ヘッダー値読み取り中
    HeaderLineVal,
    /// ヘッダーブロック終端の `\r` の後、`\n` 待ち
    AlmostDone,
    /// ヘッダーブロック終了、ボディの読み方を決める
    Done,
    /// content-length 指定のボディ読み取り中
    BodyRead,
    /// 終端バイトまでのボディ読み取り中
    BodyReadNoLength,
    /// 終端バイト待ち
    FrameEnd,
    /// エラー後、次の終端バイトまで読み捨て中
    Skip,
}

impl ParserState {
    /// フレームの外側にいるかどうか
    pub fn is_idle(&self) -> bool {
        matches!(self, ParserState::Start)
    }
}
