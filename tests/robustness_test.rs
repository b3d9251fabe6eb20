use rs_intelliscrape::{
    ascii_tree, extract_with_selectors, fingerprint, fingerprint_bytes, fingerprint_with_options,
    FingerprintMode, Options, SelectorMap,
};

fn both_modes(html: &str) {
    let _ = fingerprint(html);
    let options = Options {
        mode: FingerprintMode::StructuralPath,
        ..Options::default()
    };
    let _ = fingerprint_with_options(html, &options);
    let _ = ascii_tree(html, &Options::default());
}

#[test]
fn malformed_markup_does_not_panic() {
    for html in [
        "<p>text<div>more",
        "<p><div></p></div>",
        "<html><body><article>content",
        "<div class=\"test id=broken>",
        "&amp text &lt;",
        "<<<>>>",
        "</div></span></p>",
        "<div id=\"\" class=\"   \">x</div>",
        "<table><td>cell<tr>row</table>",
        "<svg><g id=\"shape\"><text>label</text></g></svg>",
    ] {
        both_modes(html);
    }
}

#[test]
fn unclosed_tags_still_fingerprint() {
    let fp = fingerprint("<div id=\"a\">one<div class=\"b\">two");
    assert_eq!(
        fp.entries.get_path(&["#a", ".b"]).map(|e| e.content.clone()),
        Some(vec!["two".to_string()])
    );
}

#[test]
fn blank_id_and_class_are_keyless() {
    let fp = fingerprint("<div id=\"  \" class=\"\"><p class=\"x\">t</p></div>");
    let keys: Vec<&str> = fp.entries.keys().collect();
    assert_eq!(keys, vec![".x"]);
}

#[test]
fn empty_input_yields_empty_fingerprint_with_warning() {
    for html in ["", "   ", "\n\t"] {
        let fp = fingerprint(html);
        assert!(fp.is_empty());
        assert!(!fp.warnings.is_empty());
        assert_eq!(fp.to_json_string(), "{}");
    }
    assert!(fingerprint_bytes(b"", &Options::default()).is_empty());
}

#[test]
fn non_html_text_yields_empty_fingerprint() {
    // Bare text belongs to no keyed element.
    let fp = fingerprint("just some words, no markup");
    assert!(fp.is_empty());
}

#[test]
fn invalid_utf8_is_replaced() {
    let fp = fingerprint_bytes(b"<p id=\"a\">ok \xFF\xFE</p>", &Options::default());
    let content = fp.entries.get("#a").map(|e| e.content.clone()).unwrap_or_default();
    assert_eq!(content.len(), 1);
    assert!(content[0].starts_with("ok"));
}

#[test]
fn deep_nesting_is_cut_off_with_warning() {
    let depth = 400;
    let html = format!(
        "{}<p class=\"leaf\">bottom</p>{}",
        "<div class=\"d\">".repeat(depth),
        "</div>".repeat(depth)
    );
    let options = Options {
        max_tree_depth: 50,
        ..Options::default()
    };

    let fp = fingerprint_with_options(&html, &options);
    assert!(fp.warnings.iter().any(|w| w.contains("deeper than 50")));

    let outline = ascii_tree(&html, &options);
    assert!(!outline.contains("bottom"));
}

#[test]
fn extraction_on_empty_document() {
    let selectors = SelectorMap::new().with("a", "p").with("b", "//p");
    let out = extract_with_selectors("", &selectors);

    assert!(out.is_complete());
    assert!(out.result.get_texts("a").is_empty());
    assert!(out.result.get_texts("b").is_empty());
}

#[test]
fn large_repetitive_page_stays_small() {
    let mut html = String::from("<ul id=\"list\">");
    for i in 0..2000 {
        html.push_str(&format!(
            "<li class=\"row\"><a class=\"t\">Item {i}</a><span class=\"m\">{i} pts</span></li>"
        ));
    }
    html.push_str("</ul>");

    let fp = fingerprint(&html);
    assert_eq!(fp.entries.total_entries(), 4);
    assert!(fp.to_json_string().len() < 400);
}
