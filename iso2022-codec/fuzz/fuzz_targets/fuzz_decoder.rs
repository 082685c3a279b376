#![no_main]

use iso2022_codec::{Decoder, Error};
use iso2022_core::{Profile, TableSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let tables = TableSet::standard();

    for profile in [Profile::iso2022_jp_2(), Profile::iso2022_kr()] {
        // One-shot: never panics, offsets stay inside the input
        let mut decoder = Decoder::new(&profile, &tables);
        let mut out = String::new();
        if let Err(err) = decoder.decode(data, &mut out) {
            assert!(err.offset() <= data.len());
            assert!(!err.is_internal(), "internal error on {:?}", data);
            if let Error::InvalidByte { offset, len }
            | Error::InvalidEscapeSequence { offset, len } = err
            {
                assert!(len > 0 && offset + len <= data.len());
            }
        }

        // Streaming the same bytes in two pieces agrees with one-shot on success
        let split = data.len() / 2;
        let mut streaming = Decoder::new(&profile, &tables);
        let mut streamed = String::new();
        let ok = streaming.feed(&data[..split], &mut streamed).is_ok()
            && streaming.feed(&data[split..], &mut streamed).is_ok()
            && streaming.finish().is_ok();
        if ok {
            let mut one_shot = Decoder::new(&profile, &tables);
            assert_eq!(one_shot.decode_to_string(data).ok(), Some(streamed));
        }
    }
});
