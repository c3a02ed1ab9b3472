//! フレーム組み立て用シンク

use std::collections::VecDeque;

use crate::content_length::parse_content_length;
use crate::error::TokenizeError;
use crate::sink::FrameSink;

/// 組み立て済みフレーム
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// メソッド名 (CONNECT, SEND, MESSAGE, etc.)
    pub method: String,
    /// ヘッダー (受信順、重複あり)
    pub headers: Vec<(String, String)>,
    /// ボディ
    pub body: Vec<u8>,
}

impl Frame {
    /// ヘッダーを取得 (大文字小文字を区別する、最初の値)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// 指定した名前のヘッダーをすべて取得
    pub fn get_headers(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// content-length ヘッダーの値を取得
    ///
    /// トークナイザーと同じく最初のヘッダーだけを見る。不正な値は 0 になる。
    pub fn content_length(&self) -> Option<usize> {
        self.get_header("content-length")
            .map(|v| parse_content_length(v.as_bytes()))
    }
}

/// イベントから [`Frame`] を組み立てるシンク
///
/// 完了したフレームはキューに溜まり、`next_frame()` で取り出す。
/// エラーが発生したフレームは破棄され、エラーだけが記録される。
#[derive(Debug, Clone, Default)]
pub struct FrameCollector {
    frames: VecDeque<Frame>,
    current: Option<Frame>,
    pending_key: Option<String>,
    errors: Vec<TokenizeError>,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 完了したフレームを 1 つ取り出す
    pub fn next_frame(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }

    /// 取り出されていないフレーム数
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// フレームを組み立て中かどうか
    pub fn in_frame(&self) -> bool {
        self.current.is_some()
    }

    /// 記録済みのエラー
    pub fn errors(&self) -> &[TokenizeError] {
        &self.errors
    }

    /// 記録済みのエラーを取り出す
    pub fn take_errors(&mut self) -> Vec<TokenizeError> {
        std::mem::take(&mut self.errors)
    }
}

impl FrameSink for FrameCollector {
    fn on_frame_start(&mut self) {
        self.current = Some(Frame::default());
        self.pending_key = None;
    }

    fn on_method(&mut self, method: &str) {
        if let Some(frame) = self.current.as_mut() {
            frame.method = method.to_string();
        }
    }

    fn on_header_key(&mut self, key: &str) {
        self.pending_key = Some(key.to_string());
    }

    fn on_header_value(&mut self, value: &str) {
        if let (Some(frame), Some(key)) = (self.current.as_mut(), self.pending_key.take()) {
            frame.headers.push((key, value.to_string()));
        }
    }

    fn on_body(&mut self, chunk: &[u8]) {
        if let Some(frame) = self.current.as_mut() {
            frame.body.extend_from_slice(chunk);
        }
    }

    fn on_frame_end(&mut self) {
        if let Some(frame) = self.current.take() {
            self.frames.push_back(frame);
        }
    }

    fn on_error(&mut self, error: TokenizeError) {
        self.current = None;
        self.pending_key = None;
        self.errors.push(error);
    }
}
