//! イベントシンクの定義

use crate::error::TokenizeError;

/// トークナイザーが通知するイベントの受け取り先
///
/// 各メソッドは `feed()` の中から同期的に呼ばれる。
/// 渡される `&str` や `&[u8]` はその呼び出しの間だけ有効なので、
/// 保持したい場合はコピーすること。
///
/// どのメソッドもデフォルトでは何もしない。必要なものだけ実装すればよい。
/// ブロックしたりパニックしたりしてはならない。
pub trait FrameSink {
    /// フレーム開始
    fn on_frame_start(&mut self) {}

    /// メソッド名 (例: `SEND`)
    fn on_method(&mut self, _method: &str) {}

    /// ヘッダーキー
    fn on_header_key(&mut self, _key: &str) {}

    /// ヘッダー値 (直前の `on_header_key` と対になる)
    fn on_header_value(&mut self, _value: &str) {}

    /// ボディの断片
    ///
    /// 1 フレームで複数回呼ばれることがある。順序は入力どおり。
    fn on_body(&mut self, _chunk: &[u8]) {}

    /// フレーム終了
    fn on_frame_end(&mut self) {}

    /// エラー
    fn on_error(&mut self, _error: TokenizeError) {}
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn on_frame_start(&mut self) {
        (**self).on_frame_start();
    }

    fn on_method(&mut self, method: &str) {
        (**self).on_method(method);
    }

    fn on_header_key(&mut self, key: &str) {
        (**self).on_header_key(key);
    }

    fn on_header_value(&mut self, value: &str) {
        (**self).on_header_value(value);
    }

    fn on_body(&mut self, chunk: &[u8]) {
        (**self).on_body(chunk);
    }

    fn on_frame_end(&mut self) {
        (**self).on_frame_end();
    }

    fn on_error(&mut self, error: TokenizeError) {
        (**self).on_error(error);
    }
}

/// 何もしないシンク
impl FrameSink for () {}

/// 所有型のイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FrameStart,
    Method(String),
    HeaderKey(String),
    HeaderValue(String),
    Body(Vec<u8>),
    FrameEnd,
    Error(TokenizeError),
}

/// 受け取ったイベントをそのまま記録するシンク
///
/// デバッグやテスト用。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録済みのイベント
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// 記録を破棄
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 連続する Body イベントを 1 つにまとめたイベント列
    ///
    /// Body の分割位置は入力の分割位置に依存するため、
    /// 異なる分割で得たイベント列を比較する場合に使う。
    pub fn coalesced(&self) -> Vec<Event> {
        let mut out: Vec<Event> = Vec::with_capacity(self.events.len());
        for event in &self.events {
            if let (Event::Body(next), Some(Event::Body(prev))) = (event, out.last_mut()) {
                prev.extend_from_slice(next);
                continue;
            }
            out.push(event.clone());
        }
        out
    }
}

impl FrameSink for EventLog {
    fn on_frame_start(&mut self) {
        self.events.push(Event::FrameStart);
    }

    fn on_method(&mut self, method: &str) {
        self.events.push(Event::Method(method.to_string()));
    }

    fn on_header_key(&mut self, key: &str) {
        self.events.push(Event::HeaderKey(key.to_string()));
    }

    fn on_header_value(&mut self, value: &str) {
        self.events.push(Event::HeaderValue(value.to_string()));
    }

    fn on_body(&mut self, chunk: &[u8]) {
        self.events.push(Event::Body(chunk.to_vec()));
    }

    fn on_frame_end(&mut self) {
        self.events.push(Event::FrameEnd);
    }

    fn on_error(&mut self, error: TokenizeError) {
        self.events.push(Event::Error(error));
    }
}
