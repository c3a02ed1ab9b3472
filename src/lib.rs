//! # shiguredo_stomptok
//!
//! 依存なしの STOMP フレームトークナイザー (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: I/O を完全に分離した設計
//! - **インクリメンタル**: 任意の位置で分割されたバイト列をそのまま `feed()` できる
//! - **メモリ上限**: トークンは固定長スクラッチバッファに蓄積し、ボディは保持しない。1 フレームのボディ長にも上限がある
//!
//! ## 使い方
//!
//! ### イベントを直接受け取る
//!
//! ```rust
//! use shiguredo_stomptok::{FrameSink, FrameTokenizer, TokenizeError};
//!
//! #[derive(Default)]
//! struct Printer {
//!     body_len: usize,
//! }
//!
//! impl FrameSink for Printer {
//!     fn on_method(&mut self, method: &str) {
//!         println!("method: {}", method);
//!     }
//!
//!     fn on_body(&mut self, chunk: &[u8]) {
//!         self.body_len += chunk.len();
//!     }
//!
//!     fn on_error(&mut self, error: TokenizeError) {
//!         eprintln!("error: {}", error);
//!     }
//! }
//!
//! let mut tokenizer = FrameTokenizer::new(Printer::default());
//! // 受信データを feed...
//! tokenizer.feed(b"MESSAGE\ncontent-length:5\n\nhel");
//! tokenizer.feed(b"\0o\0");
//! assert_eq!(tokenizer.sink().body_len, 5);
//! ```
//!
//! ### フレーム単位で受け取る
//!
//! ```rust
//! use shiguredo_stomptok::{FrameCollector, FrameTokenizer};
//!
//! let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
//! tokenizer.feed(b"CONNECT\naccept-version:1.2\n\n\0");
//! if let Some(frame) = tokenizer.sink_mut().next_frame() {
//!     assert_eq!(frame.method, "CONNECT");
//! }
//! ```

mod collector;
mod content_length;
mod error;
mod limits;
mod scratch;
mod sink;
mod tokenizer;

pub use collector::{Frame, FrameCollector};
pub use content_length::parse_content_length;
pub use error::TokenizeError;
pub use limits::{DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_TOKEN_SIZE, TokenizerLimits};
pub use scratch::ScratchBuffer;
pub use sink::{Event, EventLog, FrameSink};
pub use tokenizer::{FrameTokenizer, ParserState};
