use polars::prelude::*;
use polars_extensions::{NormalizeError, XmlNormalizeOptions, fully_flatten, normalize_xml_from_str};

const CATALOG: &str = r#"<catalog><book id="1"><title>A</title></book><book id="2"><title>B</title></book></catalog>"#;

fn text_cell(df: &DataFrame, column: &str, row: usize) -> Option<String> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .get(row)
        .map(str::to_string)
}

#[test]
fn explode_yields_one_row_per_element_and_keeps_absent_groups() {
    // Group sizes per record: 2, none, 3 -> 2 + 1 + 3 = 6 rows.
    let xml = concat!(
        "<log>",
        r#"<entry id="1"><t>a</t><t>b</t></entry>"#,
        r#"<entry id="2"/>"#,
        r#"<entry id="3"><t>c</t><t>d</t><t>e</t></entry>"#,
        "</log>",
    );
    let opts = XmlNormalizeOptions {
        record_path: Some("log.entry".to_string()),
        fully_flatten: true,
        ..Default::default()
    };
    let df = normalize_xml_from_str(xml, &opts).unwrap();

    assert_eq!(df.height(), 6);
    let ids: Vec<Option<String>> = (0..6).map(|i| text_cell(&df, "entry.id", i)).collect();
    let ids: Vec<Option<&str>> = ids.iter().map(|v| v.as_deref()).collect();
    assert_eq!(
        ids,
        vec![
            Some("1"),
            Some("1"),
            Some("2"),
            Some("3"),
            Some("3"),
            Some("3"),
        ],
    );

    // The record without the group keeps one row, with a null value.
    let values: Vec<Option<String>> =
        (0..6).map(|i| text_cell(&df, "entry.t.t.text", i)).collect();
    let values: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
    assert_eq!(
        values,
        vec![Some("a"), Some("b"), None, Some("c"), Some("d"), Some("e")],
    );
}

#[test]
fn single_member_groups_inline_while_lists_explode() {
    // Group sizes per record: 2, 1 (inlined as a scalar), none -> 2 + 1 + 1 = 4 rows.
    let xml = concat!(
        "<log>",
        r#"<entry id="1"><t>a</t><t>b</t></entry>"#,
        r#"<entry id="2"><t>solo</t></entry>"#,
        r#"<entry id="3"/>"#,
        "</log>",
    );
    let opts = XmlNormalizeOptions {
        record_path: Some("log.entry".to_string()),
        fully_flatten: true,
        ..Default::default()
    };
    let df = normalize_xml_from_str(xml, &opts).unwrap();

    assert_eq!(df.height(), 4);
    for column in df.columns() {
        assert!(
            !matches!(column.dtype(), DataType::List(_) | DataType::Struct(_)),
            "column {} still nested",
            column.name(),
        );
    }

    let ids: Vec<Option<String>> = (0..4).map(|i| text_cell(&df, "entry.id", i)).collect();
    let ids: Vec<Option<&str>> = ids.iter().map(|v| v.as_deref()).collect();
    assert_eq!(ids, vec![Some("1"), Some("1"), Some("2"), Some("3")]);

    // The size-1 group was inlined, so its text has its own scalar column and
    // never rode through the explode.
    let inlined: Vec<Option<String>> =
        (0..4).map(|i| text_cell(&df, "entry.t.text", i)).collect();
    let inlined: Vec<Option<&str>> = inlined.iter().map(|v| v.as_deref()).collect();
    assert_eq!(inlined, vec![None, None, Some("solo"), None]);

    let exploded: Vec<Option<String>> =
        (0..4).map(|i| text_cell(&df, "entry.t.t.text", i)).collect();
    let exploded: Vec<Option<&str>> = exploded.iter().map(|v| v.as_deref()).collect();
    assert_eq!(exploded, vec![Some("a"), Some("b"), None, None]);
}

#[test]
fn nested_groups_flatten_to_scalar_columns() {
    let xml = concat!(
        r#"<shop><dept n="d1">"#,
        "<item><s>1</s><s>2</s></item>",
        "<item><s>3</s><s>4</s></item>",
        "</dept></shop>",
    );
    let opts = XmlNormalizeOptions {
        fully_flatten: true,
        ..Default::default()
    };
    let df = normalize_xml_from_str(xml, &opts).unwrap();

    assert_eq!(df.height(), 4);
    for column in df.columns() {
        assert!(
            !matches!(column.dtype(), DataType::List(_) | DataType::Struct(_)),
            "column {} still nested",
            column.name(),
        );
    }
    let leaf = "shop.dept.item.item.s.s.text";
    let values: Vec<Option<String>> = (0..4).map(|i| text_cell(&df, leaf, i)).collect();
    let values: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
    assert_eq!(values, vec![Some("1"), Some("2"), Some("3"), Some("4")]);
    assert_eq!(text_cell(&df, "shop.dept.n", 3).as_deref(), Some("d1"));
}

#[test]
fn flatten_is_idempotent_at_fixpoint() {
    let opts = XmlNormalizeOptions {
        record_path: Some("catalog.book".to_string()),
        fully_flatten: true,
        ..Default::default()
    };
    let df = normalize_xml_from_str(CATALOG, &opts).unwrap();
    let again = fully_flatten(df.clone(), None).unwrap();
    assert!(df.equals_missing(&again));
}

#[test]
fn row_ceiling_stops_runaway_growth() {
    let opts = XmlNormalizeOptions {
        fully_flatten: true,
        max_rows: Some(1),
        ..Default::default()
    };
    let err = normalize_xml_from_str(CATALOG, &opts).unwrap_err();
    assert!(matches!(err, NormalizeError::RowLimitExceeded { .. }));
    let msg = err.to_string();
    assert!(msg.contains("row limit exceeded"));
    assert!(msg.contains("limit 1"));
}

#[cfg(feature = "deep_tests")]
#[test]
fn deep_flatten_scales_to_larger_documents() {
    let mut xml = String::from("<root>");
    for i in 0..200 {
        xml.push_str(&format!("<rec id=\"{i}\">"));
        for j in 0..5 {
            xml.push_str(&format!("<v>{j}</v>"));
        }
        xml.push_str("</rec>");
    }
    xml.push_str("</root>");

    let opts = XmlNormalizeOptions {
        record_path: Some("root.rec".to_string()),
        fully_flatten: true,
        ..Default::default()
    };
    let df = normalize_xml_from_str(&xml, &opts).unwrap();
    assert_eq!(df.height(), 1000);
    assert_eq!(text_cell(&df, "rec.v.v.text", 999).as_deref(), Some("4"));
}
