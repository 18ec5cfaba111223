use comparo::{AsciiCaseInsensitive, ComparerBuilder, Descending, Natural};

#[derive(Debug, Clone)]
struct Release {
    package: String,
    major: u32,
    minor: u32,
    channel: Option<String>,
}

fn release(package: &str, major: u32, minor: u32, channel: Option<&str>) -> Release {
    Release {
        package: package.into(),
        major,
        minor,
        channel: channel.map(str::to_owned),
    }
}

fn main() {
    // Package name first (case-insensitive), then newest version first.
    let builder = ComparerBuilder::<Release>::new()
        .add_with(|r: &Release| &r.package, AsciiCaseInsensitive)
        .rule(|r| {
            r.key(|rel: &Release| (rel.major, rel.minor))
                .natural_equality()
                .order(Descending(Natural))
                .printable()
                .label("version")
        })
        .expect("version rule sets an accessor")
        .add_optional(|r: &Release| r.channel.as_ref());

    println!("{builder}");

    let order = builder.build_order().expect("failed to build order");
    let eq = builder.build_equality().expect("failed to build equality");

    let mut releases = vec![
        release("serde", 1, 0, None),
        release("Tokio", 1, 38, Some("beta")),
        release("serde", 1, 2, None),
        release("tokio", 1, 38, None),
    ];
    order.sort(&mut releases);
    for r in &releases {
        println!("{} {}.{} {:?}", r.package, r.major, r.minor, r.channel);
    }

    let (a, b) = (release("TOKIO", 1, 38, None), release("tokio", 1, 38, None));
    println!("equal: {}, same hash: {}", eq.equals(&a, &b), eq.hash(&a) == eq.hash(&b));
}
