#![no_main]
use libfuzzer_sys::fuzz_target;

use rrwire::parser::Parse;
use rrwire_dns::Dns;

fuzz_target!(|data: &[u8]| {
    let dns = Dns::default();
    if let Err(e) = dns.parse(data) {
        eprintln!("DNS: Error parsing {:?}", e);
    }
});
