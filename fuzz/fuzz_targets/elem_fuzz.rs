//! Element fuzz target: first line picks the set type, the rest is the element.
//! Parsing must not panic, and a failed parse must not leave a half-written element.
//! Build with: cargo fuzz run elem_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    use ipset_args::{parse_elem, parse_typename, Opt, Session, StaticResolver, TypeRegistry};

    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let (ty, elem) = s.split_once('\n').unwrap_or(("hash:ip,port,net", s));
    let registry = TypeRegistry::builtin();
    let resolver = StaticResolver::new();
    for optional in [false, true] {
        let mut session = Session::new(&registry).with_resolver(&resolver);
        if parse_typename(&mut session, Opt::TypeName, ty).is_err() {
            return;
        }
        if parse_elem(&mut session, optional, elem).is_err() {
            for (from, to) in [(Opt::Ip, Opt::IpTo), (Opt::Port, Opt::PortTo)] {
                assert!(!session.data().test_flag(to) || session.data().test_flag(from));
            }
        }
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run elem_fuzz");
}
