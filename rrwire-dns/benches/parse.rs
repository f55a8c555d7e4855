use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rrwire::parser::Parse;
use rrwire_dns::Dns;

const TXT_RESPONSE: &[u8] = &[
    0x12, 0x34, // Transaction ID
    0x81, 0x80, // Flags: response, recursion desired, recursion available
    0x00, 0x01, // QDCOUNT: 1
    0x00, 0x02, // ANCOUNT: 2
    0x00, 0x00, // NSCOUNT: 0
    0x00, 0x00, // ARCOUNT: 0
    0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00,
    0x00, 0x10, // Type: TXT
    0x00, 0x01, // Class: IN
    0xc0, 0x0c, // Name: example.com
    0x00, 0x05, // Type: CNAME
    0x00, 0x01, // Class: IN
    0x00, 0x00, 0x00, 0x3c, // TTL: 60
    0x00, 0x06, // RDLENGTH: 6
    0x03, b'w', b'w', b'w', 0xc0, 0x0c, // www.example.com
    0xc0, 0x29, // Name: www.example.com
    0x00, 0x10, // Type: TXT
    0x00, 0x01, // Class: IN
    0x00, 0x00, 0x00, 0x3c, // TTL: 60
    0x00, 0x10, // RDLENGTH: 16
    0x07, b'v', b'=', b's', b'p', b'f', b'1', b' ', 0x07, b'-', b'a', b'l', b'l', b' ', b'o',
    b'k',
];

fn criterion_benchmark(c: &mut Criterion) {
    let dns = Dns::default();
    c.bench_function("dns txt response", |b| {
        b.iter(|| dns.parse(black_box(TXT_RESPONSE)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
