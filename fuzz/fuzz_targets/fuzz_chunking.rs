#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_stomptok::{EventLog, FrameTokenizer};

#[derive(Arbitrary, Debug)]
struct FuzzChunking {
    data: Vec<u8>,
    chunk_sizes: Vec<u8>,
}

fuzz_target!(|input: FuzzChunking| {
    // データを一度に feed
    let mut whole = FrameTokenizer::new(EventLog::new());
    whole.feed(&input.data);

    // データを分割して feed (ストリーミングシナリオ)
    let mut split = FrameTokenizer::new(EventLog::new());
    let mut rest = &input.data[..];
    let mut sizes = input.chunk_sizes.iter().cycle();
    while !rest.is_empty() {
        let size = sizes.next().map_or(rest.len(), |s| usize::from(*s)).min(rest.len());
        let (chunk, tail) = rest.split_at(size);
        split.feed(chunk);
        rest = tail;
        if input.chunk_sizes.iter().all(|s| *s == 0) {
            split.feed(rest);
            break;
        }
    }

    assert_eq!(whole.state(), split.state());
    assert_eq!(whole.sink().coalesced(), split.sink().coalesced());
});
