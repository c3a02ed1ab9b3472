//! フレームリーダー

use std::time::Duration;

use shiguredo_stomptok::{
    Frame, FrameCollector, FrameSink, FrameTokenizer, TokenizeError, TokenizerLimits,
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::error::{Error, Result};

const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

/// 最初のエラー以降のイベントを捨てるシンク
///
/// エラーの後に同じチャンク内で完了したフレームを返さないようにする。
#[derive(Debug, Default)]
struct Inbox {
    collector: FrameCollector,
    error: Option<TokenizeError>,
}

impl Inbox {
    fn accepting(&mut self) -> Option<&mut FrameCollector> {
        match self.error {
            Some(_) => None,
            None => Some(&mut self.collector),
        }
    }
}

impl FrameSink for Inbox {
    fn on_frame_start(&mut self) {
        if let Some(c) = self.accepting() {
            c.on_frame_start();
        }
    }

    fn on_method(&mut self, method: &str) {
        if let Some(c) = self.accepting() {
            c.on_method(method);
        }
    }

    fn on_header_key(&mut self, key: &str) {
        if let Some(c) = self.accepting() {
            c.on_header_key(key);
        }
    }

    fn on_header_value(&mut self, value: &str) {
        if let Some(c) = self.accepting() {
            c.on_header_value(value);
        }
    }

    fn on_body(&mut self, chunk: &[u8]) {
        if let Some(c) = self.accepting() {
            c.on_body(chunk);
        }
    }

    fn on_frame_end(&mut self) {
        if let Some(c) = self.accepting() {
            c.on_frame_end();
        }
    }

    fn on_error(&mut self, error: TokenizeError) {
        if self.error.is_none() {
            self.collector.on_error(error);
            self.error = Some(error);
        }
    }
}

/// STOMP フレームリーダー
///
/// `AsyncRead` からチャンクを読み取り、フレームが完成するまでトークナイザーに流し込む。
/// トークナイズエラーが発生した場合は [`Error::Protocol`] を返す。
/// 接続を閉じるかどうかは呼び出し側が決める。
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    tokenizer: FrameTokenizer<Inbox>,
    buf: Vec<u8>,
    read_timeout: Option<Duration>,
    // エラーは一度だけ warn で出す
    error_reported: bool,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// 新しいリーダーを作成
    pub fn new(reader: R) -> Self {
        Self::with_limits(reader, TokenizerLimits::default())
    }

    /// 制限付きでリーダーを作成
    pub fn with_limits(reader: R, limits: TokenizerLimits) -> Self {
        Self {
            reader,
            tokenizer: FrameTokenizer::with_limits(Inbox::default(), limits),
            buf: vec![0u8; DEFAULT_READ_BUFFER_SIZE],
            read_timeout: None,
            error_reported: false,
        }
    }

    /// 読み取りバッファサイズを設定 (最小 1 バイト)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.buf = vec![0u8; size.max(1)];
        self
    }

    /// 1 回の読み取りのタイムアウトを設定
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &TokenizerLimits {
        self.tokenizer.limits()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// 次のフレームを読み取る
    ///
    /// フレームの境界で接続が閉じられた場合は `Ok(None)` を返す。
    /// フレームの途中で閉じられた場合は [`Error::ConnectionClosed`] を返す。
    pub async fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            let inbox = self.tokenizer.sink_mut();
            if let Some(frame) = inbox.collector.next_frame() {
                debug!(
                    method = %frame.method,
                    headers = frame.headers.len(),
                    body_len = frame.body.len(),
                    "frame received"
                );
                return Ok(Some(frame));
            }
            if let Some(error) = inbox.error {
                if self.error_reported {
                    debug!(%error, "stomp protocol error already reported");
                } else {
                    warn!(%error, "stomp protocol error");
                    self.error_reported = true;
                }
                return Err(Error::Protocol(error));
            }

            let n = self.read_chunk().await?;
            if n == 0 {
                if self.tokenizer.is_idle() {
                    debug!("connection closed");
                    return Ok(None);
                }
                warn!(
                    state = ?self.tokenizer.state(),
                    "connection closed in the middle of a frame"
                );
                return Err(Error::ConnectionClosed);
            }
            self.tokenizer.feed(&self.buf[..n]);
        }
    }

    async fn read_chunk(&mut self) -> Result<usize> {
        let read = self.reader.read(&mut self.buf);
        match self.read_timeout {
            Some(timeout) => Ok(tokio::time::timeout(timeout, read).await??),
            None => Ok(read.await?),
        }
    }
}
