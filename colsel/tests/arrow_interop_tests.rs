use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Fields, Schema as ArrowSchema};
use colsel::prelude::*;
use colsel::Error;
use colsel_test_utils::init_tracing_for_tests;

fn customers() -> ArrowSchema {
    let address = DataType::Struct(Fields::from(vec![
        Field::new("street", DataType::Utf8, false),
        Field::new("city", DataType::Utf8, true),
        Field::new("zip", DataType::Int32, false),
    ]));
    let orders = DataType::LargeList(Arc::new(Field::new(
        "element",
        DataType::Struct(Fields::from(vec![
            Field::new("amount", DataType::Float64, false),
            Field::new("note", DataType::Utf8, true),
        ])),
        false,
    )));
    ArrowSchema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("address", address, true),
        Field::new("orders", orders, true),
    ])
}

#[test]
fn projection_of_an_arrow_schema_keeps_nested_structure() {
    init_tracing_for_tests();
    let schema = Schema::from_arrow(&customers()).unwrap();
    let columns = resolve_in(&all().except(["address", "street"]), &schema).unwrap();

    let projected = Schema::try_new(columns.into_iter().map(|c| c.node).collect()).unwrap();
    let arrow = projected.to_arrow();
    assert_eq!(arrow.fields().len(), 3);

    let address = arrow.field_with_name("address").unwrap();
    assert!(address.is_nullable());
    match address.data_type() {
        DataType::Struct(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.name().as_str()).collect();
            assert_eq!(names, vec!["city", "zip"]);
            assert!(fields[0].is_nullable());
        }
        other => panic!("expected a struct, got {other:?}"),
    }
    assert_eq!(
        arrow.field_with_name("orders").unwrap(),
        customers().field_with_name("orders").unwrap()
    );
}

#[test]
fn arrow_round_trip_of_a_nested_schema() {
    init_tracing_for_tests();
    let original = customers();
    let schema = Schema::from_arrow(&original).unwrap();
    assert_eq!(*schema.to_arrow(), original);
    assert_eq!(Schema::from_arrow(&schema.to_arrow()).unwrap(), schema);
    assert_eq!(schema.to_string(), "id, address{street, city, zip}, orders[amount, note]");
}

#[test]
fn group_except_keeps_the_struct_field_shape() {
    init_tracing_for_tests();
    let schema = Schema::from_arrow(&customers()).unwrap();
    let columns = resolve_in(&col("address").except("zip"), &schema).unwrap();
    let projected = Schema::try_new(columns.into_iter().map(|c| c.node).collect()).unwrap();
    let arrow = projected.to_arrow();
    let address = arrow.field_with_name("address").unwrap();
    assert!(address.is_nullable());
    assert_eq!(projected.to_string(), "address{street, city}");
}

#[test]
fn duplicate_struct_fields_are_rejected() {
    init_tracing_for_tests();
    let dup = DataType::Struct(Fields::from(vec![
        Field::new("x", DataType::Int8, false),
        Field::new("x", DataType::Int16, false),
    ]));
    let err = Schema::from_arrow(&ArrowSchema::new(vec![Field::new("g", dup, false)]))
        .unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateColumn {
            name: "x".to_string()
        }
    );
}

#[test]
fn nullable_type_targets_on_arrow_columns() {
    init_tracing_for_tests();
    let schema = Schema::from_arrow(&customers()).unwrap();
    let strict = group("address").select(cols_of(TypeTarget::text()));
    let lenient = group("address").select(cols_of(TypeTarget::text().nullable()));
    let paths = |sel: &Selector| -> Vec<String> {
        resolve_in(sel, &schema)
            .unwrap()
            .iter()
            .map(|c| c.path.to_string())
            .collect()
    };
    assert_eq!(paths(&strict), vec!["address.street"]);
    assert_eq!(paths(&lenient), vec!["address.street", "address.city"]);
    assert_eq!(
        paths(&group("address").select(cols_of(TypeTarget::exact(DataType::Int32)))),
        vec!["address.zip"]
    );
}
