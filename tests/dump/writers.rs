//! Writer Output Tests
//!
//! Full sessions rendered through the facade in every format.

use serde_json::json;

use crate::common::*;

#[test]
fn text_shared_object() {
    let mut heap = Heap::new();
    let pair = shared_point_pair(&mut heap);
    let out = render(&heap, &Value::Ref(pair), Some("pair"), OutputFormat::Text);

    let expected = "\
pair: object(Pair) #1 {
  left: object(Point) #2 {
    x: int(1) #3
    y: int(2) #4
  }
  right: object(Point) *2
}
";
    assert_eq!(out, expected);
}

#[test]
fn text_cycle() {
    let mut heap = Heap::new();
    let list = self_containing_list(&mut heap);
    let out = render(&heap, &Value::Ref(list), Some("list"), OutputFormat::Text);

    let expected = "\
list: array #1 {
  [0]: int(1) #2
  [1]: int(2) #3
  [2]: array *1
}
";
    assert_eq!(out, expected);
}

#[test]
fn text_honors_config_options() {
    let mut heap = Heap::new();
    let list = heap.list(["abcdefgh"]).unwrap();
    let config = DumpConfig {
        indent: 4,
        max_string_length: Some(3),
        ..DumpConfig::default()
    };
    let out = vardump::dump_to_string(&heap, &Value::Ref(list), None, &config).unwrap();
    assert_eq!(out, "array #1 {\n    [0]: string(8) \"abc\"... #2\n}\n");
}

#[test]
fn json_shared_object() {
    let mut heap = Heap::new();
    let pair = shared_point_pair(&mut heap);
    let out = render(&heap, &Value::Ref(pair), Some("pair"), OutputFormat::Json);
    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(
        doc,
        json!([{
            "kind": "object",
            "id": 1,
            "name": "pair",
            "class": "Pair",
            "children": [
                {
                    "kind": "object",
                    "id": 2,
                    "name": "left",
                    "class": "Point",
                    "children": [
                        {"kind": "int", "id": 3, "name": "x", "value": 1},
                        {"kind": "int", "id": 4, "name": "y", "value": 2}
                    ]
                },
                {"kind": "object", "ref": 2, "name": "right", "class": "Point"}
            ]
        }])
    );
}

#[test]
fn json_imported_document() {
    let source = json!({"name": "vardump", "tags": ["a", "b"], "big": u64::MAX});
    let mut heap = Heap::new();
    let root = heap.import_json(&source);
    let out = render(&heap, &root, None, OutputFormat::Json);
    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();

    let children = doc[0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 3);
    for child in children {
        assert_eq!(child["key_type"], "string");
    }
    let tags = children
        .iter()
        .find(|c| c["name"] == "tags")
        .unwrap();
    assert_eq!(tags["children"][1]["value"], "b");
    assert_eq!(tags["children"][1]["key_type"], "int");
    let big = children.iter().find(|c| c["name"] == "big").unwrap();
    assert_eq!(big["kind"], "float");
}

#[test]
fn html_links_references_to_anchors() {
    let mut heap = Heap::new();
    let list = self_containing_list(&mut heap);
    let out = render(&heap, &Value::Ref(list), Some("list"), OutputFormat::Html);

    assert!(out.starts_with("<div class=\"vardump\"><ul>\n"));
    assert!(out.ends_with("</ul></div>\n"));
    assert!(out.contains(r#"<span class="id" id="vardump-1">#1</span><ul>"#));
    assert!(out.contains(r##"<a class="ref" href="#vardump-1">*1</a>"##));
    assert_eq!(out.matches("<ul>").count(), out.matches("</ul>").count());
}

#[test]
fn html_escapes_user_text() {
    let mut heap = Heap::new();
    let obj = heap.object("Tag<T>");
    heap.set_property(obj, "body", "<script>&</script>").unwrap();
    let out = render(&heap, &Value::Ref(obj), None, OutputFormat::Html);

    assert!(!out.contains("<script>"));
    assert!(out.contains("&lt;script&gt;&amp;&lt;/script&gt;"));
    assert!(out.contains("object(Tag&lt;T&gt;)"));
}

#[test]
fn every_format_writes_something_for_a_scalar() {
    let heap = Heap::new();
    for format in OutputFormat::ALL {
        let out = render(&heap, &Value::Float(0.5), Some("x"), format);
        assert!(out.contains("0.5"), "{}: {}", format, out);
    }
}

#[test]
fn dump_all_to_writer_renders_every_root() {
    let mut heap = Heap::new();
    let list = heap.list([1]).unwrap();
    let vars = vec![
        (VarName::from("a"), Value::Ref(list)),
        (VarName::from("b"), Value::Ref(list)),
    ];
    let mut out = Vec::new();
    vardump::dump_all_to_writer(&heap, &vars, &DumpConfig::default(), &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "a: array #1 {\n  [0]: int(1) #2\n}\nb: array *1\n"
    );
}
