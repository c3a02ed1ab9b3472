#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_stomptok::{Event, EventLog, FrameTokenizer, TokenizerLimits};

#[derive(Arbitrary, Debug)]
struct FuzzLimits {
    max_token_size: u16,
    max_body_size: u16,
    data: Vec<u8>,
}

fuzz_target!(|input: FuzzLimits| {
    let limit = input.max_token_size as usize;
    let max_body_size = input.max_body_size as usize;
    let limits = TokenizerLimits {
        max_token_size: limit,
        max_body_size,
    };
    let mut tokenizer = FrameTokenizer::with_limits(EventLog::new(), limits);
    tokenizer.feed(&input.data);

    // フレームごとのボディ合計が制限内
    let mut body_len = 0;
    for event in tokenizer.sink().events() {
        match event {
            Event::FrameStart => body_len = 0,
            Event::Body(b) => {
                body_len += b.len();
                assert!(body_len <= max_body_size);
            }
            _ => {}
        }
    }

    for event in tokenizer.sink().events() {
        match event {
            Event::Method(s) | Event::HeaderKey(s) | Event::HeaderValue(s) => {
                assert!(s.len() <= limit);
            }
            _ => {}
        }
    }
});
