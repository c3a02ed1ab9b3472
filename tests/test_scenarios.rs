//! フレーム単位のシナリオテスト
//!
//! 代表的な入力に対するイベント列と、同じ入力をあらゆる位置で
//! 2 分割・1 バイトずつ分割して feed した場合にイベント列が変わらないことを確認する。
//! 任意の入力と分割に対する性質は pbt/tests/prop_tokenizer.rs で確認している。

use shiguredo_stomptok::{
    Event, EventLog, FrameCollector, FrameTokenizer, TokenizeError, TokenizerLimits,
};

fn tokenize(data: &[u8]) -> Vec<Event> {
    let mut tokenizer = FrameTokenizer::new(EventLog::new());
    tokenizer.feed(data);
    tokenizer.into_sink().coalesced()
}

fn tokenize_chunks(chunks: &[&[u8]]) -> Vec<Event> {
    let mut tokenizer = FrameTokenizer::new(EventLog::new());
    for chunk in chunks {
        tokenizer.feed(chunk);
    }
    tokenizer.into_sink().coalesced()
}

/// すべての分割位置で 2 分割した結果と、1 バイトずつ feed した結果が一致すること
fn assert_chunking_invariant(data: &[u8]) {
    let expected = tokenize(data);
    for i in 0..=data.len() {
        let (a, b) = data.split_at(i);
        assert_eq!(tokenize_chunks(&[a, b]), expected, "split at {}", i);
    }
    let bytes: Vec<&[u8]> = data.chunks(1).collect();
    assert_eq!(tokenize_chunks(&bytes), expected, "byte by byte");
}

fn body_of(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Body(b) => Some(b.as_slice()),
            _ => None,
        })
        .flatten()
        .copied()
        .collect()
}

#[test]
fn scenario_a_headers_without_body() {
    let data = b"CONNECT\nmy:friend\nvery:funny\n\n\0";
    assert_eq!(
        tokenize(data),
        vec![
            Event::FrameStart,
            Event::Method("CONNECT".to_string()),
            Event::HeaderKey("my".to_string()),
            Event::HeaderValue("friend".to_string()),
            Event::HeaderKey("very".to_string()),
            Event::HeaderValue("funny".to_string()),
            Event::FrameEnd,
        ]
    );
    assert_chunking_invariant(data);
}

#[test]
fn scenario_b_content_length_with_embedded_terminator() {
    let data = b"MESSAGE\ncontent-length:5\n\nhel\0o\0";
    let events = tokenize(data);
    assert_eq!(body_of(&events), b"hel\0o");
    assert_eq!(events.last(), Some(&Event::FrameEnd));
    assert!(!events.iter().any(|e| matches!(e, Event::Error(_))));
    assert_chunking_invariant(data);
}

#[test]
fn scenario_c_method_split_across_chunks() {
    let whole = tokenize(b"MESSAGE\n\n\0");
    let split = tokenize_chunks(&[b"MESS", b"AGE\n\n\0"]);
    assert_eq!(split, whole);
    assert_eq!(
        whole,
        vec![
            Event::FrameStart,
            Event::Method("MESSAGE".to_string()),
            Event::FrameEnd,
        ]
    );
}

#[test]
fn scenario_d_duplicate_content_length() {
    let data = b"MESSAGE\ncontent-length:2\ncontent-length:6\n\nab\0";
    let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
    tokenizer.feed(data);
    let collector = tokenizer.sink_mut();
    let frame = collector.next_frame().unwrap();
    assert_eq!(frame.body, b"ab");
    assert_eq!(frame.get_headers("content-length"), vec!["2", "6"]);
    assert!(collector.errors().is_empty());
    assert_chunking_invariant(data);
}

#[test]
fn duplicate_content_length_cannot_smuggle_frame() {
    // 2 つ目の content-length を信じると 2 フレーム目がボディに飲み込まれる
    let data = b"SEND\ncontent-length:1\ncontent-length:20\n\nx\0SEND\ndestination:/b\n\n\0";
    let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
    tokenizer.feed(data);
    let collector = tokenizer.sink_mut();
    assert_eq!(collector.pending_frames(), 2);
    assert_eq!(collector.next_frame().unwrap().body, b"x");
    let second = collector.next_frame().unwrap();
    assert_eq!(second.get_header("destination"), Some("/b"));
}

#[test]
fn many_frames_in_one_chunk() {
    let mut data = Vec::new();
    for i in 0..50 {
        data.extend_from_slice(format!("SEND\nid:{}\n\nbody-{}\0\n", i, i).as_bytes());
    }
    let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
    tokenizer.feed(&data);
    let collector = tokenizer.sink_mut();
    assert_eq!(collector.pending_frames(), 50);
    for i in 0..50 {
        let frame = collector.next_frame().unwrap();
        assert_eq!(frame.get_header("id"), Some(i.to_string().as_str()));
        assert_eq!(frame.body, format!("body-{}", i).as_bytes());
    }
}

#[test]
fn crlf_and_lf_mixed() {
    let data = b"SEND\r\na:1\nb:2\r\n\nhello\0";
    assert_eq!(
        tokenize(data),
        vec![
            Event::FrameStart,
            Event::Method("SEND".to_string()),
            Event::HeaderKey("a".to_string()),
            Event::HeaderValue("1".to_string()),
            Event::HeaderKey("b".to_string()),
            Event::HeaderValue("2".to_string()),
            Event::Body(b"hello".to_vec()),
            Event::FrameEnd,
        ]
    );
    assert_chunking_invariant(data);
}

#[test]
fn errors_and_resync_are_chunking_invariant() {
    assert_chunking_invariant(b"?x\nSEND\nbad header\n\nzzz\0ACK\n\n\0");
    assert_chunking_invariant(b"SEND\ncontent-length:2\n\nabcNACK\n\n\0");
}

#[test]
fn token_of_exact_capacity_succeeds() {
    let limits = TokenizerLimits::new(8);
    let mut tokenizer = FrameTokenizer::with_limits(EventLog::new(), limits);
    tokenizer.feed(b"SEND\nabcdefgh:12345678\n\n\0");
    let events = tokenizer.into_sink().into_events();
    assert!(events.contains(&Event::HeaderKey("abcdefgh".to_string())));
    assert!(events.contains(&Event::HeaderValue("12345678".to_string())));
    assert_eq!(events.last(), Some(&Event::FrameEnd));
}

#[test]
fn token_over_capacity_is_too_big() {
    let limits = TokenizerLimits::new(8);
    let mut tokenizer = FrameTokenizer::with_limits(EventLog::new(), limits);
    tokenizer.feed(b"SEND\nabc:123456789\n\n\0");
    tokenizer.feed(b"ACK\n\n\0");
    let events = tokenizer.into_sink().into_events();
    assert_eq!(
        events,
        vec![
            Event::FrameStart,
            Event::Method("SEND".to_string()),
            Event::HeaderKey("abc".to_string()),
            Event::Error(TokenizeError::TooBig { limit: 8 }),
            Event::FrameStart,
            Event::Method("ACK".to_string()),
            Event::FrameEnd,
        ]
    );
}

#[test]
fn default_capacity_is_2048() {
    let key = "k".repeat(2048);
    let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
    tokenizer.feed(format!("SEND\n{}:v\n\n\0", key).as_bytes());
    assert_eq!(tokenizer.sink_mut().next_frame().unwrap().headers[0].0, key);

    let key = "k".repeat(2049);
    tokenizer.feed(format!("SEND\n{}:v\n\n\0", key).as_bytes());
    assert!(tokenizer.sink_mut().next_frame().is_none());
    assert_eq!(
        tokenizer.sink_mut().take_errors(),
        vec![TokenizeError::TooBig { limit: 2048 }]
    );
}

#[test]
fn body_is_streamed_not_buffered() {
    let mut tokenizer = FrameTokenizer::new(EventLog::new());
    tokenizer.feed(b"SEND\ncontent-length:1000000\n\n");
    let chunk = [b'x'; 1000];
    for _ in 0..1000 {
        tokenizer.feed(&chunk);
    }
    tokenizer.feed(b"\0");
    let log = tokenizer.into_sink();
    let bodies = log
        .events()
        .iter()
        .filter(|e| matches!(e, Event::Body(_)))
        .count();
    assert_eq!(bodies, 1000);
    assert_eq!(body_of(log.events()).len(), 1_000_000);
    assert_eq!(log.events().last(), Some(&Event::FrameEnd));
}

#[test]
fn frame_after_error_on_terminator_is_delivered() {
    // 不正なバイトが終端バイトそのものなら、次のフレームは読み捨てない
    let data = b"SEND\ndestination:/a\0ACK\nid:1\n\n\0SEN\0NACK\nid:2\n\n\0";
    let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
    tokenizer.feed(data);
    let collector = tokenizer.sink_mut();
    assert_eq!(collector.pending_frames(), 2);
    let ack = collector.next_frame().unwrap();
    assert_eq!(ack.method, "ACK");
    assert_eq!(ack.get_header("id"), Some("1"));
    let nack = collector.next_frame().unwrap();
    assert_eq!(nack.method, "NACK");
    assert_eq!(nack.get_header("id"), Some("2"));
    assert_eq!(
        collector.take_errors(),
        vec![TokenizeError::InvalidFrame, TokenizeError::InvalidMethod]
    );
    assert_chunking_invariant(data);
}

#[test]
fn body_over_limit_drops_frame_and_resyncs() {
    let limits = TokenizerLimits {
        max_body_size: 16,
        ..Default::default()
    };
    let mut data = b"SEND\ndestination:/a\n\n".to_vec();
    data.extend_from_slice(&[b'x'; 17]);
    data.extend_from_slice(b"\0SEND\ndestination:/b\n\nsmall\0");

    let run = |chunk_size: usize| {
        let mut tokenizer = FrameTokenizer::with_limits(FrameCollector::new(), limits.clone());
        for chunk in data.chunks(chunk_size) {
            tokenizer.feed(chunk);
        }
        let collector = tokenizer.sink_mut();
        assert_eq!(collector.pending_frames(), 1, "chunk size {}", chunk_size);
        let frame = collector.next_frame().unwrap();
        assert_eq!(frame.get_header("destination"), Some("/b"));
        assert_eq!(frame.body, b"small");
        assert_eq!(
            collector.take_errors(),
            vec![TokenizeError::TooBig { limit: 16 }]
        );
    };
    for chunk_size in [1, 3, 7, data.len()] {
        run(chunk_size);
    }
}

#[test]
fn default_body_limit_is_10mb() {
    let limits = TokenizerLimits::default();
    assert_eq!(limits.max_body_size, 10 * 1024 * 1024);

    let mut tokenizer = FrameTokenizer::new(EventLog::new());
    tokenizer.feed(format!("SEND\ncontent-length:{}\n\n", limits.max_body_size + 1).as_bytes());
    let chunk = vec![b'x'; 1024 * 1024];
    for _ in 0..10 {
        tokenizer.feed(&chunk);
    }
    assert!(tokenizer.sink().events().iter().all(|e| !matches!(e, Event::Error(_))));
    tokenizer.feed(b"x");
    assert_eq!(
        tokenizer.sink().events().last(),
        Some(&Event::Error(TokenizeError::TooBig {
            limit: limits.max_body_size
        }))
    );
}
