#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(chain) = rrwire_reply::parse_txt_reply_ext(data, data.len() as isize) {
        rrwire_reply::free_data(Some(chain));
    }
});
