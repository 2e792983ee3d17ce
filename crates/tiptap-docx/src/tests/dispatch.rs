use crate::tests::*;

#[tokio::test]
async fn test_unknown_node() {
    let conversion = conv(r#"{ "type": "fooBar", "content": [{ "type": "text", "text": "lost" }] }"#).await;

    assert_eq!(conversion.elements.len(), 1);
    insta::assert_snapshot!(outline(&conversion), @r#"paragraph: "[Unsupported: fooBar]""#);
    assert_eq!(
        conversion.degradations,
        vec![Degradation::UnsupportedNodeType("fooBar".into())]
    );
}

#[tokio::test]
async fn test_order_is_preserved() {
    let conversion = conv(
        r#"
        { "type": "heading", "attrs": { "level": 2 }, "content": [{ "type": "text", "text": "Intro" }] },
        { "type": "fooBar" },
        { "type": "paragraph", "attrs": { "textAlign": "center" }, "content": [
            { "type": "text", "text": "Hello " },
            { "type": "text", "text": "world", "marks": [{ "type": "bold" }, { "type": "italic" }] },
            { "type": "hardBreak" },
            { "type": "text", "text": "docs", "marks": [{ "type": "link", "attrs": { "href": "https://example.com" } }] }
        ] },
        { "type": "heading", "attrs": { "level": 9 }, "content": [{ "type": "text", "text": "Deep" }] }
        "#,
    )
    .await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph[Heading2]: "Intro"
    paragraph: "[Unsupported: fooBar]"
    paragraph[center]: "Hello " "world"(b,i) <br> <link https://example.com "docs">
    paragraph[Heading6]: "Deep"
    "#);
}

#[tokio::test]
async fn test_marks() {
    let conversion = conv(
        r##"{ "type": "paragraph", "content": [
            { "type": "text", "text": "a", "marks": [{ "type": "underline" }, { "type": "strike" }] },
            { "type": "text", "text": "b", "marks": [{ "type": "code" }] },
            { "type": "text", "text": "c", "marks": [{ "type": "superscript" }] },
            { "type": "text", "text": "d", "marks": [{ "type": "highlight", "attrs": { "color": "#ff0000" } }] },
            { "type": "text", "text": "e", "marks": [{ "type": "textStyle", "attrs": { "color": "#1a2b3c" } }] },
            { "type": "text", "text": "f", "marks": [{ "type": "comment" }] }
        ] }"##,
    )
    .await;

    insta::assert_snapshot!(outline(&conversion), @r#"paragraph: "a"(u,s) "b"(code) "c"(sup) "d"(hl=red) "e"(color=1A2B3C) "f""#);
}

#[tokio::test]
async fn test_blockquote_and_code() {
    let conversion = conv(
        r#"
        { "type": "blockquote", "content": [
            { "type": "paragraph", "content": [{ "type": "text", "text": "quoted" }] },
            { "type": "bulletList", "content": [
                { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "inside" }] }] }
            ] }
        ] },
        { "type": "codeBlock", "attrs": { "language": "rust" }, "content": [{ "type": "text", "text": "fn main() {\n}" }] },
        { "type": "codeBlock" }
        "#,
    )
    .await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph[Blockquote]: "quoted"
    paragraph[bullet-list@0]: "inside"
    paragraph[CodeBlock]: "fn main() {"(code)
    paragraph[CodeBlock]: "}"(code)
    paragraph[CodeBlock]: ""(code)
    "#);
}

#[tokio::test]
async fn test_misplaced_nodes() {
    let conversion = conv(
        r#"
        { "type": "hardBreak" },
        { "type": "text", "text": "stray" },
        { "type": "tableCell" },
        { "attrs": { "level": 1 } },
        null
        "#,
    )
    .await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph: <br>
    paragraph: "[Unsupported: text]"
    paragraph: "[Unsupported: tableCell]"
    "#);
    assert!(conversion
        .degradations
        .iter()
        .all(|d| matches!(d, Degradation::MalformedTree(_))));
    assert_eq!(conversion.degradations.len(), 2);
}

#[tokio::test]
async fn test_malformed_nodes() {
    let conversion = conv(
        r#"
        { "type": 42 },
        { "type": "paragraph", "attrs": [1] },
        { "type": "paragraph", "content": [
            { "type": "text", "text": "before " },
            { "type": "text", "text": 7 }
        ] },
        { "type": "paragraph", "content": [{ "type": "text", "text": "kept" }] }
        "#,
    )
    .await;

    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph: "[Unsupported: 42]"
    paragraph: "[Unsupported: paragraph]"
    paragraph: "before " "[Unsupported: text]"
    paragraph: "kept"
    "#);
    assert_eq!(
        conversion.degradations,
        vec![
            Degradation::MalformedTree("`42`: `type` is not a string".into()),
            Degradation::MalformedTree("`paragraph`: `attrs` is not an object".into()),
            Degradation::MalformedTree("`text`: `text` is not a string".into()),
        ]
    );
}

#[tokio::test]
async fn test_empty_document() {
    let conversion = exporter(MemoryFetcher::default(), DocxOptions::default())
        .convert(&tree(r#"{ "type": "doc" }"#))
        .await;

    assert!(conversion.elements.is_empty());
    assert!(conversion.degradations.is_empty());
    assert_eq!(conversion.numbering.len(), 2);
}
