use crate::tests::*;

fn para(text: &str) -> String {
    format!(r#"{{ "type": "paragraph", "content": [{{ "type": "text", "text": "{text}" }}] }}"#)
}

#[tokio::test]
async fn test_spans_and_widths() {
    let content = format!(
        r#"{{ "type": "table", "content": [
            {{ "type": "tableRow", "content": [
                {{ "type": "tableHeader", "attrs": {{ "colspan": 1, "rowspan": 1, "colwidth": [120] }}, "content": [{name}] }},
                {{ "type": "tableHeader", "content": [{value}] }}
            ] }},
            {{ "type": "tableRow", "content": [
                {{ "type": "tableCell", "attrs": {{ "rowspan": 2 }}, "content": [{a}, {b}] }},
                {{ "type": "tableCell", "attrs": {{ "colwidth": null }}, "content": [] }}
            ] }},
            {{ "type": "tableRow", "content": [
                {{ "type": "tableCell", "attrs": {{ "colspan": 2 }}, "content": [
                    {{ "type": "bulletList", "content": [{{ "type": "listItem", "content": [{x}] }}] }}
                ] }},
                {x}
            ] }}
        ] }}"#,
        name = para("Name"),
        value = para("Value"),
        a = para("a"),
        b = para("b"),
        x = para("x"),
    );

    let conversion = conv(&content).await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    table
      row[header]
        th[width=120dxa]
          paragraph: "Name"
        th
          paragraph: "Value"
      row
        cell[rowspan=2]
          paragraph: "a"
          paragraph: "b"
        cell
      row
        cell[colspan=2]
          paragraph[bullet-list@0]: "x"
    "#);
    assert!(matches!(
        conversion.degradations.as_slice(),
        [Degradation::MalformedTree(_)]
    ));
}

#[tokio::test]
async fn test_cascade() {
    let options = DocxOptions::from_json(
        r#"{ "table": {
            "properties": { "alignment": "center", "style": "Grid" },
            "paragraph": { "alignment": "center" },
            "cell": { "paragraph": {}, "width": { "size": 2400, "type": "dxa" } },
            "header": { "paragraph": { "style": "TableHeading" } },
            "row": { "height": 400 }
        } }"#,
    )
    .unwrap();
    let content = format!(
        r#"{{ "type": "table", "content": [
            {{ "type": "tableRow", "content": [{{ "type": "tableHeader", "content": [{h}] }}, {{ "type": "tableCell", "content": [{b}] }}] }}
        ] }}"#,
        h = para("H"),
        b = para("B"),
    );

    let conversion = conv_with(&content, MemoryFetcher::default(), options).await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    table
      row
        th
          paragraph[TableHeading]: "H"
        cell[width=2400dxa]
          paragraph[center]: "B"
    "#);
    let table = conversion.elements[0].as_table().unwrap();
    assert_eq!(table.rows[0].height, Some(400));
    assert_eq!(table.properties.style.as_deref(), Some("Grid"));
}

#[tokio::test]
async fn test_nested_table_is_unrolled() {
    let content = format!(
        r#"{{ "type": "table", "content": [{{ "type": "tableRow", "content": [{{ "type": "tableCell", "content": [
            {{ "type": "table", "content": [{{ "type": "tableRow", "content": [
                {{ "type": "tableCell", "content": [{a}] }},
                {{ "type": "tableCell", "content": [{b}] }}
            ] }}] }}
        ] }}] }}] }}"#,
        a = para("inner a"),
        b = para("inner b"),
    );

    let conversion = conv(&content).await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    table
      row
        cell
          paragraph: "inner a"
          paragraph: "inner b"
    "#);
}
