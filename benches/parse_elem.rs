//! Benchmark: element parsing per set type. Each iteration runs the whole
//! per-element path (typename lookup, dispatch, field parsers) in a fresh
//! session, the way one `ipset add` line is handled.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ipset_args::{parse_elem, parse_typename, Opt, Session, StaticResolver, TypeRegistry};
use std::net::{IpAddr, Ipv4Addr};

const CASES: &[(&str, &str)] = &[
    ("hash:ip", "192.0.2.1"),
    ("hash:net", "10.0.0.0/8"),
    ("bitmap:ip", "192.0.2.10-192.0.2.20"),
    ("hash:ip,port", "192.0.2.1,udp:53"),
    ("hash:ip,port", "192.0.2.1,tcp:http-1024"),
    ("hash:ip,port", "192.0.2.1,icmp:echo-request"),
    ("hash:ip,port,net", "192.0.2.1,tcp:443,10.0.0.0/8"),
    ("bitmap:ip,mac", "192.0.2.1,00:11:22:33:44:55"),
    ("list:set", "myset,before,otherset"),
];

fn parse_one(registry: &TypeRegistry, resolver: &StaticResolver, ty: &str, elem: &str) -> bool {
    let mut session = Session::new(registry).with_resolver(resolver);
    parse_typename(&mut session, Opt::TypeName, ty).is_ok()
        && parse_elem(&mut session, false, elem).is_ok()
}

fn bench_elems(c: &mut Criterion) {
    let registry = TypeRegistry::builtin();
    let resolver = StaticResolver::new()
        .with_host("gw.example", &[IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1))]);

    for (ty, elem) in CASES {
        assert!(parse_one(&registry, &resolver, ty, elem), "{} {}", ty, elem);
        c.bench_function(&format!("parse_elem {} {}", ty, elem), |b| {
            b.iter(|| parse_one(&registry, &resolver, black_box(ty), black_box(elem)))
        });
    }

    c.bench_function("parse_elem hash:ip,port hostname", |b| {
        b.iter(|| {
            parse_one(
                &registry,
                &resolver,
                "hash:ip,port",
                black_box("gw.example,tcp:ssh"),
            )
        })
    });

    c.bench_function("parse_elem all cases", |b| {
        b.iter(|| {
            CASES
                .iter()
                .filter(|(ty, elem)| parse_one(&registry, &resolver, ty, black_box(elem)))
                .count()
        })
    });
}

criterion_group!(benches, bench_elems);
criterion_main!(benches);
