use crate::tests::*;

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[tokio::test]
async fn test_pack_document() {
    let fetcher = MemoryFetcher::default()
        .with("https://example.com/a.png", png(30, 20))
        .with("https://example.com/b.bmp", encode(8, 8, ImageFormat::Bmp));
    let options = DocxOptions::from_json(
        r#"{
            "creator": "Editor",
            "customProperties": [{ "name": "project", "value": "docs" }],
            "styles": { "default": { "document": { "paragraph": { "spacing": { "line": 360 } }, "run": { "size": 24 } } } },
            "section": { "page": { "size": { "width": 11906, "height": 16838 }, "margin": { "top": 1440, "left": 1080 } } }
        }"#,
    )
    .unwrap();
    let doc = tree(
        r#"{ "type": "doc", "content": [
            { "type": "heading", "attrs": { "level": 1 }, "content": [{ "type": "text", "text": "Title" }] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "x", "marks": [{ "type": "subscript" }] },
                { "type": "text", "text": "link", "marks": [{ "type": "link", "attrs": { "href": "https://example.com" } }] }
            ] },
            { "type": "image", "attrs": { "src": "https://example.com/a.png" } },
            { "type": "image", "attrs": { "src": "https://example.com/b.bmp" } },
            { "type": "image", "attrs": { "src": "https://unreachable.invalid/c.png" } },
            { "type": "orderedList", "attrs": { "start": 4 }, "content": [
                { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "four" }] }] }
            ] },
            { "type": "table", "content": [
                { "type": "tableRow", "content": [
                    { "type": "tableCell", "attrs": { "rowspan": 2 } },
                    { "type": "tableCell", "content": [{ "type": "paragraph" }] }
                ] },
                { "type": "tableRow", "content": [{ "type": "tableCell", "attrs": { "colspan": 1 } }] }
            ] }
        ] }"#,
    );

    let bytes = exporter(fetcher, options).to_docx(&doc).await.unwrap();

    assert!(bytes.starts_with(b"PK"));
    assert!(contains(&bytes, b"word/document.xml"));
}

#[tokio::test]
async fn test_pack_oversized_image() {
    let fetcher = MemoryFetcher::default().with("https://example.com/a.png", png(4, 4));
    let content = r#"
        { "type": "image", "attrs": { "src": "https://example.com/a.png", "width": 500000, "height": 10 } },
        { "type": "image", "attrs": { "src": "https://example.com/a.png", "width": 4294967295, "height": 4294967295 } }
    "#;

    let conversion = conv_with(content, fetcher, DocxOptions::default()).await;
    insta::assert_snapshot!(outline(&conversion), @r#"
    paragraph[center]: <image 500000x10 png "">
    paragraph[center]: <image 4294967295x4294967295 png "">
    "#);

    let bytes = write_docx(&conversion, &DocxOptions::default()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_pack_empty_conversion() {
    let conversion = Conversion {
        elements: Vec::new(),
        numbering: Vec::new(),
        degradations: Vec::new(),
    };

    let bytes = write_docx(&conversion, &DocxOptions::default()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
