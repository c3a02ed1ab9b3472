#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_stomptok::{FrameCollector, FrameTokenizer, ParserState};

fuzz_target!(|data: &[u8]| {
    let mut tokenizer = FrameTokenizer::new(FrameCollector::new());
    tokenizer.feed(data);

    // content_left は content_length を超えない
    assert!(tokenizer.content_left() <= tokenizer.content_length());
    if tokenizer.state() == ParserState::BodyRead {
        assert!(tokenizer.content_left() > 0);
    }

    let collector = tokenizer.sink_mut();
    while let Some(frame) = collector.next_frame() {
        assert!(!frame.method.is_empty());
        assert!(frame.method.bytes().all(|b| b.is_ascii_uppercase()));
        if let Some(len) = frame.content_length().filter(|len| *len > 0) {
            assert_eq!(frame.body.len(), len);
        } else {
            assert!(!frame.body.contains(&0));
        }
    }
});
