//! STOMP フレームトークナイザー (Sans I/O)

mod state;

pub use state::ParserState;

use crate::content_length::ContentLengthTracker;
use crate::error::TokenizeError;
use crate::limits::TokenizerLimits;
use crate::scratch::ScratchBuffer;
use crate::sink::FrameSink;

const LF: u8 = b'\n';
const CR: u8 = b'\r';
const COLON: u8 = b':';
/// フレーム終端バイト
const TERMINATOR: u8 = 0x00;

fn is_upper(b: u8) -> bool {
    b.is_ascii_uppercase()
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

fn is_printable_no_space(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

// スクラッチに積まれるのは印字可能 ASCII のみなので常に UTF-8 として有効
fn as_text(bytes: &[u8]) -> &str {
    debug_assert!(
        bytes.iter().all(|&b| is_printable(b)),
        "scratch must hold printable ASCII only"
    );
    std::str::from_utf8(bytes).unwrap_or_default()
}

/// トークナイザーが排他的に所有する状態
#[derive(Debug, Clone)]
struct ParserContext {
    state: ParserState,
    scratch: ScratchBuffer,
    content: ContentLengthTracker,
    /// 現在のフレームで流したボディのバイト数
    body_len: usize,
    max_body_size: usize,
}

impl ParserContext {
    fn new(limits: &TokenizerLimits) -> Self {
        Self {
            state: ParserState::Start,
            scratch: ScratchBuffer::new(limits.max_token_size),
            content: ContentLengthTracker::default(),
            body_len: 0,
            max_body_size: limits.max_body_size,
        }
    }

    fn reset(&mut self) {
        self.state = ParserState::Start;
        self.scratch.clear();
        self.content.reset();
        self.body_len = 0;
    }

    /// 1 状態ぶん処理して次の読み取り位置を返す
    ///
    /// `pos < data.len()` で呼ばれ、1 バイト以上消費するか Skip に遷移する。
    fn step<S: FrameSink>(&mut self, sink: &mut S, data: &[u8], pos: usize) -> usize {
        match self.state {
            ParserState::Start => self.start(sink, data, pos),
            ParserState::Method => self.method(sink, data, pos),
            ParserState::HeaderLineAlmostDone { after_method } => {
                self.header_line_almost_done(sink, data[pos], after_method);
                pos + 1
            }
            ParserState::HeaderLineDone => {
                self.header_line_done(sink, data[pos]);
                pos + 1
            }
            ParserState::HeaderLineKey => self.header_line_key(sink, data, pos),
            ParserState::HeaderLineVal => self.header_line_val(sink, data, pos),
            ParserState::AlmostDone => {
                self.almost_done(sink, data[pos]);
                pos + 1
            }
            ParserState::Done => self.done(sink, data, pos),
            ParserState::BodyRead => self.body_read(sink, data, pos),
            ParserState::BodyReadNoLength => self.body_read_no_length(sink, data, pos),
            ParserState::FrameEnd => self.frame_end(sink, data[pos], pos),
            ParserState::Skip => self.skip(data, pos),
        }
    }

    /// フレーム途中のエラー
    ///
    /// 現在のフレームは破棄し、次の終端バイトまで読み捨ててから Start に戻る。
    fn fail<S: FrameSink>(&mut self, sink: &mut S, error: TokenizeError) {
        sink.on_error(error);
        self.scratch.clear();
        self.state = ParserState::Skip;
    }

    /// 消費済みのバイト `ch` が原因のエラー
    ///
    /// `ch` が終端バイトならそこがフレーム境界なので、読み捨てずに Start に戻る。
    fn abort<S: FrameSink>(&mut self, sink: &mut S, error: TokenizeError, ch: u8) {
        self.fail(sink, error);
        if ch == TERMINATOR {
            self.state = ParserState::Start;
        }
    }

    /// ボディを流す
    ///
    /// `max_body_size` を超える場合は制限までを流してから `TooBig` で失敗し、
    /// 流したバイト数を `Err` で返す。
    fn emit_body<S: FrameSink>(&mut self, sink: &mut S, chunk: &[u8]) -> Result<(), usize> {
        let allowed = self.max_body_size.saturating_sub(self.body_len);
        if chunk.len() > allowed {
            if allowed > 0 {
                sink.on_body(&chunk[..allowed]);
            }
            self.body_len += allowed;
            let limit = self.max_body_size;
            self.fail(sink, TokenizeError::TooBig { limit });
            return Err(allowed);
        }
        sink.on_body(chunk);
        self.body_len += chunk.len();
        Ok(())
    }

    fn too_big(&self) -> TokenizeError {
        TokenizeError::TooBig {
            limit: self.scratch.capacity(),
        }
    }

    fn push_or_abort<S: FrameSink>(&mut self, sink: &mut S, ch: u8) -> bool {
        if self.scratch.push(ch) {
            return true;
        }
        let error = self.too_big();
        self.fail(sink, error);
        false
    }

    fn start<S: FrameSink>(&mut self, sink: &mut S, data: &[u8], mut pos: usize) -> usize {
        while pos < data.len() {
            let ch = data[pos];
            pos += 1;
            // ハートビートとフレーム間の詰め物
            if matches!(ch, LF | CR | TERMINATOR) {
                continue;
            }
            if !is_upper(ch) {
                // フレームの外なので、このバイトだけ捨てる
                sink.on_error(TokenizeError::InvalidRequest);
                return pos;
            }

            sink.on_frame_start();
            self.content.reset();
            self.scratch.clear();
            self.body_len = 0;
            if self.push_or_abort(sink, ch) {
                self.state = ParserState::Method;
            }
            return pos;
        }
        pos
    }

    fn method<S: FrameSink>(&mut self, sink: &mut S, data: &[u8], mut pos: usize) -> usize {
        while pos < data.len() {
            let ch = data[pos];
            pos += 1;
            if is_upper(ch) {
                if !self.push_or_abort(sink, ch) {
                    return pos;
                }
                continue;
            }

            match ch {
                LF => {
                    sink.on_method(as_text(self.scratch.take()));
                    self.state = ParserState::HeaderLineDone;
                }
                CR => {
                    sink.on_method(as_text(self.scratch.take()));
                    self.state = ParserState::HeaderLineAlmostDone { after_method: true };
                }
                _ => self.abort(sink, TokenizeError::InvalidMethod, ch),
            }
            return pos;
        }
        pos
    }

    fn header_line_almost_done<S: FrameSink>(&mut self, sink: &mut S, ch: u8, after_method: bool) {
        if ch != LF {
            let error = if after_method {
                TokenizeError::InvalidMethod
            } else {
                TokenizeError::InvalidFrame
            };
            self.abort(sink, error, ch);
            return;
        }
        self.state = ParserState::HeaderLineDone;
    }

    fn header_line_done<S: FrameSink>(&mut self, sink: &mut S, ch: u8) {
        match ch {
            CR => self.state = ParserState::AlmostDone,
            LF => self.state = ParserState::Done,
            ch if is_printable_no_space(ch) => {
                self.scratch.clear();
                if self.push_or_abort(sink, ch) {
                    self.state = ParserState::HeaderLineKey;
                }
            }
            _ => self.abort(sink, TokenizeError::InvalidFrame, ch),
        }
    }

    fn header_line_key<S: FrameSink>(&mut self, sink: &mut S, data: &[u8], mut pos: usize) -> usize {
        while pos < data.len() {
            let ch = data[pos];
            pos += 1;
            if ch == COLON {
                let key = self.scratch.take();
                self.content.on_header_key(key);
                sink.on_header_key(as_text(key));
                self.state = ParserState::HeaderLineVal;
                return pos;
            }
            if is_printable_no_space(ch) {
                if !self.push_or_abort(sink, ch) {
                    return pos;
                }
                continue;
            }
            // コロンのないヘッダー行や制御文字
            self.abort(sink, TokenizeError::InvalidFrame, ch);
            return pos;
        }
        pos
    }

    fn header_line_val<S: FrameSink>(&mut self, sink: &mut S, data: &[u8], mut pos: usize) -> usize {
        while pos < data.len() {
            let ch = data[pos];
            pos += 1;
            if is_printable(ch) {
                if !self.push_or_abort(sink, ch) {
                    return pos;
                }
                continue;
            }

            match ch {
                LF | CR => {
                    let value = self.scratch.take();
                    self.content.on_header_value(value);
                    sink.on_header_value(as_text(value));
                    self.state = if ch == CR {
                        ParserState::HeaderLineAlmostDone {
                            after_method: false,
                        }
                    } else {
                        ParserState::HeaderLineDone
                    };
                }
                _ => self.abort(sink, TokenizeError::InvalidFrame, ch),
            }
            return pos;
        }
        pos
    }

    fn almost_done<S: FrameSink>(&mut self, sink: &mut S, ch: u8) {
        if ch != LF {
            self.abort(sink, TokenizeError::InvalidRequest, ch);
            return;
        }
        self.state = ParserState::Done;
    }

    fn done<S: FrameSink>(&mut self, sink: &mut S, data: &[u8], pos: usize) -> usize {
        // 現在のバイトはボディの先頭なので消費しない。
        // content-length 指定時は先頭が終端バイトでもボディとして読む
        if self.content.content_left() > 0 {
            self.state = ParserState::BodyRead;
            return self.body_read(sink, data, pos);
        }
        if data[pos] == TERMINATOR {
            // ボディなし
            return self.frame_end(sink, TERMINATOR, pos);
        }
        self.state = ParserState::BodyReadNoLength;
        self.body_read_no_length(sink, data, pos)
    }

    fn body_read<S: FrameSink>(&mut self, sink: &mut S, data: &[u8], pos: usize) -> usize {
        // バイトの値は見ない。終端バイトもボディとして宣言された長さだけ読む
        let n = (data.len() - pos).min(self.content.content_left());
        if let Err(emitted) = self.emit_body(sink, &data[pos..pos + n]) {
            return pos + emitted;
        }
        self.content.consume(n);
        if self.content.content_left() == 0 {
            self.state = ParserState::FrameEnd;
        }
        pos + n
    }

    fn body_read_no_length<S: FrameSink>(
        &mut self,
        sink: &mut S,
        data: &[u8],
        pos: usize,
    ) -> usize {
        let rest = &data[pos..];
        match rest.iter().position(|&b| b == TERMINATOR) {
            Some(i) => {
                if i > 0 {
                    if let Err(emitted) = self.emit_body(sink, &rest[..i]) {
                        return pos + emitted;
                    }
                }
                // 終端バイトの検証と消費は FrameEnd に任せる
                self.state = ParserState::FrameEnd;
                self.frame_end(sink, TERMINATOR, pos + i)
            }
            None => match self.emit_body(sink, rest) {
                Ok(()) => data.len(),
                Err(emitted) => pos + emitted,
            },
        }
    }

    fn frame_end<S: FrameSink>(&mut self, sink: &mut S, ch: u8, pos: usize) -> usize {
        if ch != TERMINATOR {
            // 終端バイトがなくてもフレームは閉じる
            sink.on_error(TokenizeError::InvalidFrame);
        }
        sink.on_frame_end();
        self.state = ParserState::Start;
        pos + 1
    }

    fn skip(&mut self, data: &[u8], pos: usize) -> usize {
        match data[pos..].iter().position(|&b| b == TERMINATOR) {
            Some(i) => {
                self.state = ParserState::Start;
                pos + i + 1
            }
            None => data.len(),
        }
    }
}

/// STOMP フレームトークナイザー (Sans I/O)
///
/// 任意に分割されたバイト列を `feed()` で受け取り、フレームの構成要素を
/// [`FrameSink`] のイベントとして同期的に通知する。
/// チャンクがトークンやボディの途中で終わっても状態を保持し、
/// 次の `feed()` で続きから処理する。
///
/// メモリ使用量はスクラッチバッファ (`max_token_size`) で上限が決まる。
/// ボディは保持せずに `on_body` で順次流す。
///
/// # 使い方
///
/// ```rust
/// use shiguredo_stomptok::{FrameCollector, FrameTokenizer};
///
/// let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
/// tokenizer.feed(b"SEND\ndestination:/queue/a\n\nhel");
/// tokenizer.feed(b"lo\0");
///
/// let frame = tokenizer.sink_mut().next_frame().unwrap();
/// assert_eq!(frame.method, "SEND");
/// assert_eq!(frame.get_header("destination"), Some("/queue/a"));
/// assert_eq!(frame.body, b"hello");
/// ```
#[derive(Debug)]
pub struct FrameTokenizer<S: FrameSink> {
    ctx: ParserContext,
    sink: S,
    limits: TokenizerLimits,
}

impl<S: FrameSink> FrameTokenizer<S> {
    /// 新しいトークナイザーを作成
    pub fn new(sink: S) -> Self {
        Self::with_limits(sink, TokenizerLimits::default())
    }

    /// 制限付きでトークナイザーを作成
    pub fn with_limits(sink: S, limits: TokenizerLimits) -> Self {
        Self {
            ctx: ParserContext::new(&limits),
            sink,
            limits,
        }
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &TokenizerLimits {
        &self.limits
    }

    /// バイト列を処理する
    ///
    /// 渡されたデータはすべて消費される。イベントはこの呼び出しの中で通知される。
    pub fn feed(&mut self, data: &[u8]) {
        let mut pos = 0;
        while pos < data.len() {
            pos = self.ctx.step(&mut self.sink, data, pos);
        }
    }

    /// 現在の状態を取得
    pub fn state(&self) -> ParserState {
        self.ctx.state
    }

    /// フレームの外側 (Start) にいるかどうか
    pub fn is_idle(&self) -> bool {
        self.ctx.state.is_idle()
    }

    /// 現在のフレームで宣言された content-length (0 は指定なし)
    pub fn content_length(&self) -> usize {
        self.ctx.content.content_length()
    }

    /// 現在のフレームで残っているボディバイト数
    pub fn content_left(&self) -> usize {
        self.ctx.content.content_left()
    }

    /// トークナイザーをリセット
    ///
    /// スクラッチバッファの領域は再確保しない。
    pub fn reset(&mut self) {
        self.ctx.reset();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
