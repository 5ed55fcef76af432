//! Normalizer, templates and file naming without a style processor

use imnote_bibtex::parse;
use imnote_core::{apply, normalize, resolve_file_name, KeyPrecedence, TemplateContext};
use rstest::rstest;

#[rstest]
#[case("2020", Some(vec![vec![2020, 1, 1]]))]
#[case("1999", Some(vec![vec![1999, 1, 1]]))]
#[case("n.d.", None)]
#[case("", None)]
fn test_year_becomes_issued(#[case] year: &str, #[case] expected: Option<Vec<Vec<i32>>>) {
    let bibtex = format!("@misc{{k, title = {{T}}, year = {{{}}}}}", year);
    let entry = parse(&bibtex).entries.remove(0);

    assert_eq!(normalize(&entry).issued.map(|d| d.date_parts), expected);
}

#[test]
fn test_record_json_shape() {
    let entry = parse(
        "@inproceedings{lamport1978,
            author = {Lamport, Leslie},
            title = {Time, Clocks, and the Ordering of Events},
            booktitle = {CACM},
            url = {https://example.org/lamport},
            year = 1978
        }",
    )
    .entries
    .remove(0);

    let json = serde_json::to_value(normalize(&entry)).unwrap();
    assert_eq!(json["id"], "lamport1978");
    assert_eq!(json["type"], "inproceedings");
    assert_eq!(json["URL"], "https://example.org/lamport");
    assert_eq!(json["booktitle"], "CACM");
    assert_eq!(json["author"][0]["family"], "Lamport");
    assert_eq!(json["issued"]["date-parts"][0][0], 1978);
}

#[rstest]
#[case("{{title}} ({{year}})", "Foo (2020)")]
#[case("{{missing}}", "{{missing}}")]
#[case("{{lower|title}}-{{citekey}}", "foo-foo2020")]
#[case("{{ title }}", "{{ title }}")]
#[case("", "")]
fn test_templates(#[case] template: &str, #[case] expected: &str) {
    let entry = parse("@article{foo2020, title = {Foo}, year = 2020}")
        .entries
        .remove(0);
    let context = TemplateContext::for_entry(&entry, String::new(), String::new(), KeyPrecedence::default());

    assert_eq!(apply(template, &context), expected);
}

#[rstest]
#[case("My Paper", &[], "My Paper.md")]
#[case("My Paper", &["My Paper.md"], "My Paper 2.md")]
#[case("My Paper", &["My Paper.md", "My Paper 2.md"], "My Paper 3.md")]
#[case("Bad:Name?", &[], "BadName.md")]
fn test_file_names(#[case] desired: &str, #[case] existing: &[&str], #[case] expected: &str) {
    assert_eq!(resolve_file_name(desired, existing), expected);
}
