//! Test helpers shared by the colsel crates.

use std::sync::Once;

use arrow::datatypes::DataType;
use colsel_schema::{ColumnNode, Schema};

static INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset: quiet, except for exclusion
/// decisions.
const DEFAULT_FILTER: &str = "warn,colsel_resolve=info";

/// Initialize tracing for test binaries. Safe to call multiple times.
///
/// Output goes through the test writer so it is captured per test and only
/// shown for failures (or with `--nocapture`). Use `RUST_LOG` to turn on
/// resolution traces, e.g. `RUST_LOG=colsel_resolve=trace`.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // Another harness may already have installed a global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

/// `a: Int64, g{x: Int64, y: Int64}`, the smallest schema with a group.
pub fn flat_group_schema() -> Schema {
    build(vec![
        ColumnNode::value("a", DataType::Int64),
        group("g", vec![int("x"), int("y")]),
    ])
}

/// A schema with three levels of nesting, mixed types and a frame column:
///
/// ```text
/// id: Int64
/// name: Utf8?
/// address{street: Utf8, city: Utf8, geo{lat: Float64, lon: Float64}}
/// orders[amount: Float64, placed: Date32]
/// flags{active: Boolean}
/// ```
pub fn nested_schema() -> Schema {
    let orders = build(vec![
        ColumnNode::value("amount", DataType::Float64),
        ColumnNode::value("placed", DataType::Date32),
    ]);
    build(vec![
        int("id"),
        ColumnNode::nullable_value("name", DataType::Utf8),
        group(
            "address",
            vec![
                ColumnNode::value("street", DataType::Utf8),
                ColumnNode::value("city", DataType::Utf8),
                group(
                    "geo",
                    vec![
                        ColumnNode::value("lat", DataType::Float64),
                        ColumnNode::value("lon", DataType::Float64),
                    ],
                ),
            ],
        ),
        ColumnNode::frame("orders", orders),
        group("flags", vec![ColumnNode::value("active", DataType::Boolean)]),
    ])
}

fn int(name: &str) -> ColumnNode {
    ColumnNode::value(name, DataType::Int64)
}

fn group(name: &str, children: Vec<ColumnNode>) -> ColumnNode {
    match ColumnNode::group(name, children) {
        Ok(node) => node,
        Err(err) => panic!("invalid test group '{name}': {err}"),
    }
}

fn build(columns: Vec<ColumnNode>) -> Schema {
    match Schema::try_new(columns) {
        Ok(schema) => schema,
        Err(err) => panic!("invalid test schema: {err}"),
    }
}

#[cfg(feature = "auto-init")]
mod auto {
    // Runs at binary init time so individual tests need not call init.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}
