use esc_core::EscError;
use esc_sweep::TemplateDocument;

const BODY: &str = "sName earth\ndMass -1.0   \n\n\n  saOutputOrder Time -EnvelopeMass\n";

#[test]
fn block_lands_before_marker_with_single_blank_lines() {
    let doc = TemplateDocument::new("earth.in", BODY);
    let block = "# Varied parameter 1\ndNumCore40K 2\n\n";
    let out = doc.splice(block, "saOutputOrder").expect("splice");
    assert_eq!(
        out,
        "sName earth\ndMass -1.0\n\n# Varied parameter 1\ndNumCore40K 2\n\nsaOutputOrder Time -EnvelopeMass\n"
    );
    assert!(!out.contains("\n\n\n"));
    for line in out.lines() {
        assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
    }
}

#[test]
fn empty_prefix_and_suffix_are_not_padded() {
    let doc = TemplateDocument::new("bare.in", "saOutputOrder");
    let out = doc.splice("dAge 1", "saOutputOrder").expect("splice");
    assert_eq!(out, "dAge 1\n\nsaOutputOrder");
}

#[test]
fn only_first_marker_is_used() {
    let doc = TemplateDocument::new("twice.in", "a\nsaOutputOrder x\nsaOutputOrder y");
    let out = doc.splice("b 1", "saOutputOrder").expect("splice");
    assert_eq!(out, "a\n\nb 1\n\nsaOutputOrder x\nsaOutputOrder y");
}

#[test]
fn missing_marker_names_file_and_marker() {
    let doc = TemplateDocument::new("sun.in", "sName sun\n");
    match doc.splice("dAge 1", "saOutputOrder") {
        Err(EscError::MissingMarker(info)) => {
            assert_eq!(info.code, "template-marker");
            assert_eq!(info.context.get("file").map(String::as_str), Some("sun.in"));
            assert_eq!(
                info.context.get("marker").map(String::as_str),
                Some("saOutputOrder")
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn primary_file_detection() {
    assert!(TemplateDocument::new("vpl.in", "saBodyFiles earth.in sun.in").declares_body_files());
    assert!(!TemplateDocument::new("earth.in", BODY).declares_body_files());
}
