//! Citation session behavior against a fake style processor

mod common;

use common::{FakeFactory, MockHttp, STYLE};
use imnote_bibtex::parse;
use imnote_core::engine::LOCALE_URL;
use imnote_core::{normalize, CitationSession, EngineError, Sys};

const BIBTEX: &str = r#"
@article{smith2020,
  author = {Smith, Jane},
  title = {Widgets},
  year = {2020}
}

@book{doe2019,
  author = {John Doe},
  title = {Gadgets},
  year = 2019
}
"#;

async fn session() -> CitationSession {
    let mut session = CitationSession::new(STYLE);
    session
        .initialize(&MockHttp::csl(), &FakeFactory)
        .await
        .unwrap();

    for entry in parse(BIBTEX).entries {
        session.register(normalize(&entry));
    }
    session
}

#[tokio::test]
async fn test_inline_citation_is_markdown() {
    let mut session = session().await;
    assert!(session.is_initialized());
    assert_eq!(session.render_inline("smith2020"), "(*Smith*, 2020)");
    assert_eq!(session.render_inline("doe2019"), "(*Doe*, 2019)");
}

#[tokio::test]
async fn test_unknown_id_renders_empty() {
    let mut session = session().await;
    assert_eq!(session.render_inline("nobody"), "");
}

#[tokio::test]
async fn test_bibliography_lines_are_blank_line_separated() {
    let mut session = session().await;
    assert_eq!(
        session.render_bibliography(),
        "Smith. (2020). *Widgets*.\n\nDoe. (2019). *Gadgets*.\n"
    );
}

#[tokio::test]
async fn test_bibliography_is_idempotent() {
    let mut session = session().await;
    let first = session.render_bibliography();
    assert_eq!(session.render_bibliography(), first);
}

#[tokio::test]
async fn test_repeated_registration_repeats_the_line() {
    let mut session = session().await;
    let entry = parse(BIBTEX).entries.remove(0);
    session.register(normalize(&entry));

    assert_eq!(
        session.render_bibliography(),
        "Smith. (2020). *Widgets*.\n\nSmith. (2020). *Widgets*.\n\nDoe. (2019). *Gadgets*.\n"
    );
}

#[tokio::test]
async fn test_empty_store_has_no_bibliography() {
    let mut session = CitationSession::new(STYLE);
    session
        .initialize(&MockHttp::csl(), &FakeFactory)
        .await
        .unwrap();
    assert_eq!(session.render_bibliography(), "");
}

#[tokio::test]
async fn test_registered_record_is_served_unchanged() {
    let session = session().await;
    let entry = parse(BIBTEX).entries.remove(1);

    let sys = session.sys();
    assert_eq!(sys.retrieve_item("doe2019"), Some(&normalize(&entry)));
    assert_eq!(sys.retrieve_locale("de-DE"), Some(common::LOCALE_XML));
}

#[tokio::test]
async fn test_locale_failure_leaves_session_uninitialized() {
    let http = MockHttp::csl().with(LOCALE_URL, 500, "");
    let mut session = CitationSession::new(STYLE);

    let err = session.initialize(&http, &FakeFactory).await.unwrap_err();
    assert!(matches!(err, EngineError::Fetch { ref url, .. } if url == LOCALE_URL));
    assert!(!session.is_initialized());
}

#[tokio::test]
async fn test_unknown_style_leaves_session_uninitialized() {
    let mut session = CitationSession::new("no-such-style");

    let err = session
        .initialize(&MockHttp::csl(), &FakeFactory)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Fetch { .. }));

    for entry in parse(BIBTEX).entries {
        session.register(normalize(&entry));
    }
    assert_eq!(session.render_inline("smith2020"), "");
    assert_eq!(session.render_bibliography(), "");
}
