//! End-to-end tests for the editor-facing service

use hywind_hover::{
    CaretQuery, Catalog, EntryKind, HywindService, Rgb, Settings,
};

fn bundled() -> HywindService {
    HywindService::new(Catalog::load_default(), Settings::default())
}

#[test]
fn test_summary_and_swatch_end_to_end() {
    let catalog = Catalog::from_json(
        r#"{"classes": [{"className": "bg-primary", "description": "Primary background\nmore", "previewColor": {"r": 10, "g": 20, "b": 30}}]}"#,
    )
    .unwrap();
    let service = HywindService::new(catalog, Settings::default());
    let query = CaretQuery::spanning(0..2);

    assert_eq!(
        service.resolve_token("bg-primary p-4", &query).as_deref(),
        Some("bg-primary")
    );

    let doc = service.hover_doc_at("bg-primary p-4", &query).unwrap();
    assert_eq!(doc.color_swatch, Some(Rgb::new(10, 20, 30)));
    assert_eq!(doc.description_html.as_deref(), Some("Primary background<br/>more"));

    let candidates = service.completion_candidates(EntryKind::Class);
    assert_eq!(candidates[0].short_description, "Primary background");
}

#[test]
fn test_host_coordinates() {
    let service = bundled();
    // Value "p-2 m-2" starts at host offset 10
    let narrow = CaretQuery::default().offset_by(10).with_range(14..15);
    assert_eq!(service.resolve_token("p-2 m-2", &narrow).as_deref(), Some("m-2"));

    // The whole quoted attribute is wider than the value: midpoint wins
    let wide = CaretQuery::default().offset_by(10).with_range(9..18);
    assert_eq!(service.resolve_token("p-2 m-2", &wide).as_deref(), Some("p-2"));

    // Narrow range beats the wide one regardless of order
    let both = wide.with_range(16..16);
    assert_eq!(service.resolve_token("p-2 m-2", &both).as_deref(), Some("m-2"));
}

#[test]
fn test_variant_prefix_is_one_token() {
    let service = bundled();
    let doc = service
        .hover_doc_at("flex hover:bg-primary", &CaretQuery::at(8))
        .unwrap();
    assert_eq!(doc.title, "hover:bg-primary");
}

#[test]
fn test_quick_info_kinds() {
    let service = bundled();
    assert_eq!(
        service.quick_info_at("text-white", &CaretQuery::at(0)).as_deref(),
        Some("text-white (#FFFFFF) - White text.")
    );
    assert_eq!(
        service.quick_info_at("flex", &CaretQuery::at(0)).as_deref(),
        Some("flex - Lay children out in a row.")
    );
    assert_eq!(
        service.quick_info_at("hy-disabled", &CaretQuery::at(0)).as_deref(),
        Some("Disables interaction with the element.")
    );
    assert!(service.quick_info_at("unknown", &CaretQuery::at(0)).is_none());
}

#[test]
fn test_reference_ranges_are_exact() {
    let service = bundled();
    let value = "  flex,p-4  ";

    let refs = service.references_in(value);
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].range, 2..6);
    assert_eq!(refs[1].range, 7..10);

    for reference in &refs {
        let found = service
            .resolve_reference_at(value, reference.range.start)
            .unwrap();
        assert_eq!(&found, reference);
    }
}

#[test]
fn test_document_round_trip() {
    let service = bundled();
    let source = "<div\n  class=\"flex p-4\"\n  hy-tooltip=\"Save\">\n</div>";

    let hover = service.hover(source, 2, 16).unwrap();
    assert_eq!(hover.doc.title, "p-4");
    let range = hover.range.unwrap();
    assert_eq!((range.start_line, range.start_col), (2, 15));
    assert_eq!((range.end_line, range.end_col), (2, 18));

    let def = service.definition(source, 2, 11).unwrap();
    assert_eq!(def.name, "flex");
    assert_eq!(def.kind, Some(EntryKind::Class));

    let prop = service.hover(source, 3, 5).unwrap();
    assert_eq!(prop.doc.kind, EntryKind::Prop);
    assert!(prop.contents.contains("```css\nhy-tooltip=\"Save\"\n```"));
    assert!(!prop.contents.contains("&quot;"));
    // The structured payload stays escaped
    assert_eq!(
        prop.doc.code_block.as_deref(),
        Some("hy-tooltip=&quot;Save&quot;")
    );

    // The tooltip text is not a class list
    assert!(service.hover(source, 3, 16).is_none());
}

#[test]
fn test_escaped_payload() {
    let catalog = Catalog::from_json(
        r#"{"props": [{"propName": "hy-x", "description": "<img src=x onerror=alert(1)>", "origin": "<i>me</i>"}]}"#,
    )
    .unwrap();
    let service = HywindService::new(catalog, Settings::default());

    let doc = service.attribute_doc("hy-x").unwrap();
    assert_eq!(
        doc.description_html.as_deref(),
        Some("&lt;img src=x onerror=alert(1)&gt;")
    );
    assert_eq!(doc.origin_label.as_deref(), Some("&lt;i&gt;me&lt;/i&gt;"));
}
