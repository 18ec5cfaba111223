use std::sync::Arc;

use comparo::{ComparerBuilder, Diagnostic};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug)]
struct Invoice {
    customer: u64,
    total_cents: i64,
    currency: &'static str,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("comparo=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();

    let checked = ComparerBuilder::<Invoice>::new()
        .add(|i: &Invoice| i.customer)
        .rule(|r| {
            r.key(|i: &Invoice| i.total_cents)
                .natural()
                .printable()
                .label("total")
        })
        .expect("total rule sets an accessor")
        .add(|i: &Invoice| i.currency)
        .with_interceptor(Arc::new(Diagnostic::new().log_zero_hash(false)))
        .build_checked_equality()
        .expect("failed to build equality");

    let ours = Invoice {
        customer: 7,
        total_cents: 12_500,
        currency: "EUR",
    };
    let theirs = Invoice {
        customer: 7,
        total_cents: 12_050,
        currency: "EUR",
    };

    match checked.assert_equals(&ours, &theirs) {
        Ok(()) => println!("invoices match"),
        Err(err) => println!("mismatch: {err}"),
    }
}
