use rs_intelliscrape::{ascii_tree, content_tree, ContentNode, Options};

#[test]
fn outline_of_a_small_page() {
    let html = r#"<html><head><title>T</title></head><body>
        <div id="main">
            <h1>Welcome</h1>
            <p class="lead intro">Intro text</p>
        </div>
        <div class="sidebar"></div>
        <script>x()</script>
    </body></html>"#;

    let expected = [
        "body",
        "├── div#main",
        "│   ├── h1 - Welcome",
        "│   └── p.lead.intro - Intro text",
        "└── div.sidebar",
    ]
    .join("\n");
    assert_eq!(ascii_tree(html, &Options::default()), expected);
}

#[test]
fn keyless_elements_are_kept() {
    let html = "<div><div><span>a</span></div></div>";
    let tree = content_tree(html, &Options::default()).expect("tree");

    // body > div > div > span
    assert_eq!(tree.node_count(), 4);
    assert_eq!(
        tree.render(),
        "body\n└── div\n    └── div\n        └── span - a"
    );
}

#[test]
fn deep_last_child_indentation() {
    let html = r#"<ul id="l"><li>one<ul><li>nested</li></ul></li><li>two</li></ul>"#;
    let expected = [
        "body",
        "└── ul#l",
        "    ├── li - one",
        "    │   └── ul",
        "    │       └── li - nested",
        "    └── li - two",
    ]
    .join("\n");
    assert_eq!(ascii_tree(html, &Options::default()), expected);
}

#[test]
fn samples_use_truncation_limits() {
    let long = "word ".repeat(40);
    let html = format!("<p id=\"p\">{long}</p>");
    let tree = content_tree(&html, &Options::default()).expect("tree");

    let p = &tree.children[0];
    assert_eq!(p.text().chars().count(), 73);
    assert!(p.text().ends_with("..."));
}

#[test]
fn ids_and_classes_are_escaped() {
    let html = r#"<div id="a.b" class="x:y">t</div>"#;
    let tree = content_tree(html, &Options::default()).expect("tree");

    assert_eq!(tree.children[0].label(), r"div#a\.b.x\:y - t");
}

#[test]
fn blank_input_has_no_tree() {
    assert!(content_tree("", &Options::default()).is_none());
    assert_eq!(ascii_tree("  \n ", &Options::default()), "");
}

#[test]
fn tree_serializes_without_empty_fields() {
    let mut root = ContentNode::new::<&str>("body", None, &[]);
    let mut p = ContentNode::new("p", Some("x"), &["a"]);
    p.set_content("Hi", &Options::default());
    root.add_child(p);

    assert_eq!(
        serde_json::to_string(&root).expect("serializable"),
        r#"{"tag":"body","children":[{"tag":"p","id":"x","classes":["a"],"content":"Hi"}]}"#
    );
}
