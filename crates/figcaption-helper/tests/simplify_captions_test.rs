use figcaption_helper::batch::run_pass;
use figcaption_helper::rule::RuleRegistry;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_extracts_link_text() {
    let temp = TempDir::new().unwrap();
    let test_file = temp.path().join("post.md");
    fs::write(&test_file, r#"caption='<a href="http://x.com">Link Text</a>'"#).unwrap();

    let registry = RuleRegistry::new().unwrap();
    let rule = registry.get("simplify-captions").unwrap();

    let result = rule.convert(&test_file, false, false, false).unwrap();
    assert_eq!(result.fixes_applied, 1);
    assert_eq!(result.message.unwrap(), r#"caption="Link Text""#);
}

#[test]
fn test_batch_counts_simplified_files() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.md");
    let b = temp.path().join("b.md");
    let c = temp.path().join("c.md");
    fs::write(&a, r#"caption='<a href="http://a.com">A</a>'"#).unwrap();
    fs::write(&b, r#"caption="B""#).unwrap();
    fs::write(&c, r#"caption='<a href="http://c.com">C</a>' and caption='<a href="http://d.com">D</a>'"#)
        .unwrap();

    let registry = RuleRegistry::new().unwrap();
    let rule = registry.get("simplify-captions").unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let report = run_pass(rule.as_ref(), &[a, b.clone(), c.clone()], &mut out, &mut err).unwrap();

    assert_eq!(report.files_modified(), 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Simplified: a.md\nSimplified: c.md\n\nSimplified 2 files\n"
    );
    assert_eq!(fs::read_to_string(&b).unwrap(), r#"caption="B""#);
    assert_eq!(
        fs::read_to_string(&c).unwrap(),
        r#"caption="C" and caption="D""#
    );
}

#[test]
fn test_quote_in_link_text_is_flagged() {
    let temp = TempDir::new().unwrap();
    let test_file = temp.path().join("post.md");
    fs::write(&test_file, r#"caption='<a href="http://x.com">Say "hi"</a>'"#).unwrap();

    let registry = RuleRegistry::new().unwrap();
    let rule = registry.get("simplify-captions").unwrap();

    let results = rule.check(&test_file, false).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].message.as_deref().unwrap().contains("double quote"));
}
