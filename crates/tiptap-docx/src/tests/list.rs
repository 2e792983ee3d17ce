use crate::numbering::LevelFormat;
use crate::tests::*;

fn ordered(start: u32, text: &str) -> String {
    format!(
        r#"{{ "type": "orderedList", "attrs": {{ "start": {start} }}, "content": [
            {{ "type": "listItem", "content": [{{ "type": "paragraph", "content": [{{ "type": "text", "text": "{text}" }}] }}] }}
        ] }}"#
    )
}

#[tokio::test]
async fn test_repeated_start_shares_definition() {
    let content = [ordered(5, "a"), ordered(5, "b"), ordered(5, "c"), ordered(5, "d")].join(",");

    let conversion = conv(&content).await;

    let references = conversion
        .numbering
        .iter()
        .map(|def| def.reference.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        references,
        vec!["bullet-list", "ordered-list", "ordered-list-start-5"]
    );
    assert_eq!(conversion.numbering[2].start, 5);
    assert_eq!(conversion.numbering[2].format, LevelFormat::Decimal);
    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph[ordered-list-start-5@0]: "a"
    paragraph[ordered-list-start-5@0]: "b"
    paragraph[ordered-list-start-5@0]: "c"
    paragraph[ordered-list-start-5@0]: "d"
    "#);
}

#[tokio::test]
async fn test_definitions_follow_first_encounter() {
    let content = [ordered(7, "a"), ordered(1, "b"), ordered(3, "c"), ordered(7, "d")].join(",");

    let conversion = conv(&content).await;

    let starts = conversion
        .numbering
        .iter()
        .map(|def| def.start)
        .collect::<Vec<_>>();
    assert_eq!(starts, vec![1, 1, 7, 3]);
    assert_eq!(conversion.numbering[0].format, LevelFormat::Bullet);
}

#[tokio::test]
async fn test_nested_lists() {
    let conversion = conv(
        r#"{ "type": "orderedList", "attrs": { "start": 3 }, "content": [
            { "type": "listItem", "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "one" }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "more" }] },
                { "type": "bulletList", "content": [
                    { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "nested" }] }] }
                ] }
            ] },
            { "type": "listItem", "content": [] }
        ] }"#,
    )
    .await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph[ordered-list-start-3@0]: "one"
    paragraph[indent=720]: "more"
    paragraph[bullet-list@0,indent=1440]: "nested"
    paragraph[ordered-list-start-3@0]
    "#);
}

#[tokio::test]
async fn test_unstarted_list_uses_default() {
    let conversion = conv(
        r#"{ "type": "orderedList", "attrs": { "start": null }, "content": [
            { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "x" }] }] }
        ] }"#,
    )
    .await;

    assert_eq!(conversion.numbering.len(), 2);
    insta::assert_snapshot!(outline(&conversion), @r#"paragraph[ordered-list@0]: "x""#);
}

#[tokio::test]
async fn test_task_list() {
    let conversion = conv(
        r#"{ "type": "taskList", "content": [
            { "type": "taskItem", "attrs": { "checked": true }, "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "done" }] }
            ] },
            { "type": "taskItem", "attrs": { "checked": false }, "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "todo" }] },
                { "type": "taskList", "content": [
                    { "type": "taskItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "sub" }] }] }
                ] }
            ] },
            { "type": "taskItem" }
        ] }"#,
    )
    .await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph[indent=720]: "☒ " "done"
    paragraph[indent=720]: "☐ " "todo"
    paragraph[indent=1440]: "☐ " "sub"
    paragraph[indent=720]: "☐ "
    "#);
}

#[test]
fn test_synthesis_needs_no_conversion() {
    let doc = tree(&format!(
        r#"{{ "type": "doc", "content": [{{ "type": "bulletList", "content": [
            {{ "type": "listItem", "content": [{}] }}
        ] }}] }}"#,
        ordered(9, "deep")
    ));

    let definitions = synthesize_numbering(&doc);
    assert_eq!(definitions.len(), 3);
    assert_eq!(definitions[2].reference, "ordered-list-start-9");
}
