use atom::{Category, CategoryIterator, XmlSink, XmlWriter};
use std::io::Cursor;

fn categories() -> Vec<Category> {
    vec![
        Category::new(),
        Category::new().with_term("t"),
        Category::new().with_scheme("http://example.com/scheme?a=1&b=2"),
        Category::new().with_label("Quotes \" and <angles>"),
        Category::new().with_term("t").with_label("l"),
        Category::new().with_term("t").with_scheme("s").with_label("l"),
    ]
}

#[test]
fn test_write_then_parse_restores_attributes() {
    for category in categories() {
        let xml = category.to_xml_string().unwrap();
        let parsed = Category::from_xml(&xml).unwrap();
        assert_eq!(parsed.term(), category.term(), "{}", xml);
        assert_eq!(parsed.scheme(), category.scheme(), "{}", xml);
        assert_eq!(parsed.label(), category.label(), "{}", xml);
        assert_eq!(parsed.undefined_content(), xml);
    }
}

#[test]
fn test_written_feed_is_extracted_in_order() {
    let mut writer = XmlWriter::new(vec![]);
    writer.start_element("feed").unwrap();
    for category in categories() {
        category.write_xml(&mut writer).unwrap();
    }
    writer.end_element().unwrap();
    let feed = writer.into_inner();

    let extracted = CategoryIterator::new(Cursor::new(feed))
        .collect::<atom::Result<Vec<_>>>()
        .unwrap();
    let expected = categories();
    assert_eq!(extracted.len(), expected.len());
    for (got, want) in extracted.iter().zip(expected.iter()) {
        assert_eq!(got.term(), want.term());
        assert_eq!(got.scheme(), want.scheme());
        assert_eq!(got.label(), want.label());
        assert_eq!(got.undefined_content(), want.to_xml_string().unwrap());
    }
}

#[test]
fn test_getters_have_no_side_effects() {
    let category = Category::from_xml(r#"<category term="a" scheme="b" label="c"/>"#).unwrap();
    let snapshot = category.clone();
    assert_eq!(category.term(), category.term());
    assert_eq!(category.undefined_content(), category.undefined_content());
    assert_eq!(category, snapshot);
}
