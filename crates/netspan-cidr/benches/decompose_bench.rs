use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netspan_cidr::{Address, Network, Range};

fn benchmark_decompose(c: &mut Criterion) {
    let v4 = Range::parse("192.168.31.240 - 192.168.35.193").expect("valid range");
    let v4_wide = Range::parse("0.0.0.1 - 255.255.255.255").expect("valid range");
    let v6_wide = Range::parse("::1 - ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffe")
        .expect("valid range");

    c.bench_function("decompose_ipv4", |b| b.iter(|| black_box(&v4).networks()));
    c.bench_function("decompose_ipv4_wide", |b| {
        b.iter(|| black_box(&v4_wide).networks())
    });
    c.bench_function("decompose_ipv6_wide", |b| {
        b.iter(|| black_box(&v6_wide).networks())
    });
}

fn benchmark_parse(c: &mut Criterion) {
    c.bench_function("parse_ipv4_padded", |b| {
        b.iter(|| Address::parse(black_box("192.168.001.010")))
    });
    c.bench_function("parse_ipv6_decimal", |b| {
        b.iter(|| Address::parse(black_box("42540766411282592856903984951653826561")))
    });
    c.bench_function("parse_cidr", |b| {
        b.iter(|| Network::parse(black_box("2001:db8::/32")))
    });
}

criterion_group!(benches, benchmark_decompose, benchmark_parse);
criterion_main!(benches);
