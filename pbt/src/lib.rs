//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// フレーム要素の生成
// ========================================

/// メソッド名: ASCII 大文字 (1-16 文字)
pub fn method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("CONNECT".to_string()),
        Just("SEND".to_string()),
        Just("SUBSCRIBE".to_string()),
        Just("MESSAGE".to_string()),
        Just("ACK".to_string()),
        "[A-Z]{1,16}".prop_map(|s| s),
    ]
}

/// ヘッダーキー: 空白とコロンを含まない印字可能 ASCII (1-32 文字)
///
/// content-length はボディ長と矛盾しないよう別途生成するので除外する。
pub fn header_key() -> impl Strategy<Value = String> {
    "[!-9;-~]{1,32}".prop_filter("content-length is generated separately", |s| {
        s != "content-length"
    })
}

/// ヘッダー値: 空白を含む印字可能 ASCII (0-64 文字)
pub fn header_value() -> impl Strategy<Value = String> {
    "[ -~]{0,64}".prop_map(|s| s)
}

pub fn headers() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((header_key(), header_value()), 0..10)
}

/// 改行: `\n` または `\r\n`
pub fn line_ending() -> impl Strategy<Value = &'static [u8]> {
    prop_oneof![Just(&b"\n"[..]), Just(&b"\r\n"[..])]
}

/// 終端バイトを含まないボディ
pub fn body_without_terminator() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(1u8..=255, 0..256)
}

/// 任意のボディ (終端バイトを含みうる)
pub fn body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

/// 入力の分割位置 (昇順、重複あり)
pub fn split_points(max: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0..=max, 0..16).prop_map(|mut points| {
        points.sort_unstable();
        points
    })
}

// ========================================
// フレームの組み立て
// ========================================

/// テスト用のフレームバイト列を組み立てる
///
/// `content_length` が Some の場合は最後のヘッダーとして content-length を付ける。
pub fn build_frame(
    method: &str,
    headers: &[(String, String)],
    content_length: Option<usize>,
    body: &[u8],
    eol: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(method.as_bytes());
    out.extend_from_slice(eol);
    for (key, value) in headers {
        out.extend_from_slice(key.as_bytes());
        out.push(b':');
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(eol);
    }
    if let Some(len) = content_length {
        out.extend_from_slice(format!("content-length:{}", len).as_bytes());
        out.extend_from_slice(eol);
    }
    out.extend_from_slice(eol);
    out.extend_from_slice(body);
    out.push(0);
    out
}

/// 分割位置に従ってバイト列を切り分ける
pub fn split_at_points<'a>(data: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for &p in points {
        let p = p.min(data.len()).max(start);
        chunks.push(&data[start..p]);
        start = p;
    }
    chunks.push(&data[start..]);
    chunks
}
