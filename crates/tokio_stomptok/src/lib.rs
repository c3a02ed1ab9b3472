//! tokio_stomptok - Tokio integration for shiguredo_stomptok
//!
//! `AsyncRead` から読み取ったバイト列をトークナイザーに流し込み、
//! 組み立て済みの STOMP フレームを返す。
//!
//! ## 特徴
//!
//! - **shiguredo_stomptok ベース**: Sans I/O ライブラリをベースにした設計
//! - **非同期 I/O**: tokio による完全非同期対応
//! - **ストリーム非依存**: TCP でも TLS でも `AsyncRead` であれば何でもよい
//! - **エラーで停止**: 最初のトークナイズエラーを返した後はフレームを返さない
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_stomptok::FrameReader;
//!
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:61613").await?;
//! let mut reader = FrameReader::new(stream)
//!     .read_timeout(std::time::Duration::from_secs(30));
//!
//! while let Some(frame) = reader.read_frame().await? {
//!     println!("{} {:?}", frame.method, frame.headers);
//! }
//! ```

pub mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::FrameReader;

// shiguredo_stomptok の型を re-export
pub use shiguredo_stomptok::{Frame, TokenizeError, TokenizerLimits};
