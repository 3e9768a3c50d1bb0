//! Parse ipset elements against a set type and print the resulting attributes.
//!
//! Usage:
//!   ipset_args [OPTIONS] TYPE ELEM [ELEM ...]
//!   ipset_args [OPTIONS] TYPE < elems.txt
//!
//! Every element is parsed in a fresh session, like one `ipset add` per line.
//!
//! Options:
//!   --family, -f F   inet|inet6 (default: implied by the first address)
//!   --optional, -o   Allow elements with trailing parts left out
//!   --hex, -x        Print wire bytes instead of values
//!   --types          List known set types and exit
//!
//! Set RUST_LOG=debug to trace the dispatcher.

use ipset_args::{parse_elem, parse_typename, Opt, ParseError, Session, TypeRegistry, Value};
use std::io::{self, BufRead};

fn format_value(v: &Value, hex: bool) -> String {
    if hex {
        return v
            .to_wire()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join("");
    }
    match v {
        Value::Ipv4(a) => a.to_string(),
        Value::Ipv6(a) => a.to_string(),
        Value::Ether(e) => e
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":"),
        Value::Str(s) => s.clone(),
        Value::Flag => "set".to_string(),
        Value::Type(t) => t.name.clone(),
        other => other.as_u64().map(|n| n.to_string()).unwrap_or_default(),
    }
}

struct Options {
    family: Option<String>,
    optional: bool,
    hex: bool,
}

/// Returns false if the element failed to parse.
fn run_elem(registry: &TypeRegistry, typename: &str, elem: &str, opts: &Options) -> bool {
    let mut session = Session::new(registry);
    let result = (|| -> Result<(), ParseError> {
        if let Some(f) = &opts.family {
            ipset_args::parse::parse_family(&mut session, Opt::Family, f)?;
        }
        parse_typename(&mut session, Opt::TypeName, typename)?;
        parse_elem(&mut session, opts.optional, elem)
    })();

    for w in session.warnings() {
        eprintln!("{}: warning: {}", elem, w);
    }
    match result {
        Ok(()) => {
            println!("{}", elem);
            for (opt, v) in session.data().iter() {
                if matches!(opt, Opt::Type | Opt::TypeName) {
                    continue;
                }
                println!("  {:<10} {}", opt.name(), format_value(v, opts.hex));
            }
            true
        }
        Err(e) => {
            eprintln!("{}: {}", elem, e);
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let registry = TypeRegistry::builtin();

    if args.iter().any(|a| a == "--types") {
        for t in registry.iter() {
            let aliases = if t.aliases.is_empty() {
                String::new()
            } else {
                format!(" (alias {})", t.aliases.join(", "))
            };
            println!("{} dimension {}{}", t.name, t.dimension.count(), aliases);
        }
        return Ok(());
    }

    let family = if let Some(pos) = args.iter().position(|a| a == "--family" || a == "-f") {
        args.remove(pos);
        if pos >= args.len() {
            anyhow::bail!("--family needs an argument");
        }
        Some(args.remove(pos))
    } else {
        None
    };
    let optional = if let Some(pos) = args.iter().position(|a| a == "--optional" || a == "-o") {
        args.remove(pos);
        true
    } else {
        false
    };
    let hex = if let Some(pos) = args.iter().position(|a| a == "--hex" || a == "-x") {
        args.remove(pos);
        true
    } else {
        false
    };
    let opts = Options { family, optional, hex };

    if args.is_empty() {
        anyhow::bail!("usage: ipset_args [--family F] [--optional] [--hex] TYPE [ELEM ...]");
    }
    let typename = args.remove(0);

    let mut failed = 0usize;
    if args.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let elem = line.trim();
            if elem.is_empty() || elem.starts_with('#') {
                continue;
            }
            if !run_elem(&registry, &typename, elem, &opts) {
                failed += 1;
            }
        }
    } else {
        for elem in &args {
            if !run_elem(&registry, &typename, elem, &opts) {
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("ipset_args: {} element(s) failed", failed);
        std::process::exit(1);
    }
    Ok(())
}
