//! Fuzz target: `FrameParser::feed` + `tokenizer::parse`
//!
//! Splits the input at every `|` into separate reads and pushes them
//! through the parser, checking that every completed line is well formed
//! and tokenizes.
//!
//! cargo fuzz run fuzz_frame_parser

#![no_main]

use ledstrip::protocol::codec::{FrameParser, MAX_FRAME_SIZE};
use ledstrip::protocol::tokenizer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = FrameParser::new();

    for chunk in data.split(|&b| b == b'|') {
        if let Some(line) = parser.feed(chunk) {
            assert!(line.len() <= MAX_FRAME_SIZE, "line exceeds MAX_FRAME_SIZE");
            assert_eq!(line.first(), Some(&b'$'));
            assert_eq!(line.last(), Some(&b'\n'));
            let fields = tokenizer::parse(line).expect("framed line must tokenize");
            assert!(!fields.is_empty());
        }
    }

    // After a reset the parser must accept bytes cleanly again.
    parser.reset();
    assert!(!parser.is_capturing());
    let _ = parser.process_input(data);
});
