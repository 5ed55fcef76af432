use imnote_providers::HttpTransport;
use tracing::{debug, warn};

use super::resources::{fetch_locale, fetch_style};
use super::{CitationCluster, EngineError, ProcessorFactory, StyleProcessor, Sys};
use crate::markup::html_to_markdown;
use crate::record::{CitationRecord, RecordStore};

struct Engine {
    locale: String,
    processor: Box<dyn StyleProcessor>,
}

/// One generation pass worth of citation state
///
/// Rendering before a successful [`initialize`](Self::initialize) yields
/// empty strings rather than errors.
pub struct CitationSession {
    style: String,
    store: RecordStore,
    engine: Option<Engine>,
}

/// The [`Sys`] view of a session handed to the processor
pub struct SessionSys<'a> {
    locale: Option<&'a str>,
    store: &'a RecordStore,
}

impl Sys for SessionSys<'_> {
    fn retrieve_locale(&self, _lang: &str) -> Option<&str> {
        self.locale
    }

    fn retrieve_item(&self, id: &str) -> Option<&CitationRecord> {
        self.store.get(id)
    }
}

impl CitationSession {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            store: RecordStore::new(),
            engine: None,
        }
    }

    /// Download the locale and style and build the processor
    ///
    /// On failure the session stays uninitialized. There is no retry.
    pub async fn initialize<T, F>(&mut self, http: &T, factory: &F) -> Result<(), EngineError>
    where
        T: HttpTransport,
        F: ProcessorFactory + ?Sized,
    {
        let locale = fetch_locale(http).await?;
        let style = fetch_style(http, &self.style).await?;
        let processor = factory.build(&style)?;

        debug!(style = %self.style, "Citation engine ready");
        self.engine = Some(Engine { locale, processor });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Add or replace a record; its id is appended to the bibliography order
    pub fn register(&mut self, record: CitationRecord) {
        self.store.insert(record);
    }

    pub fn sys(&self) -> SessionSys<'_> {
        SessionSys {
            locale: self.engine.as_ref().map(|e| e.locale.as_str()),
            store: &self.store,
        }
    }

    /// Inline citation for one registered record, as Markdown
    pub fn render_inline(&mut self, id: &str) -> String {
        let Some(engine) = self.engine.as_mut() else {
            return String::new();
        };

        if self.store.get(id).is_none() {
            debug!(id, "Inline citation requested for unknown id");
            return String::new();
        }

        let sys = SessionSys {
            locale: Some(&engine.locale),
            store: &self.store,
        };

        match engine
            .processor
            .preview_citation_cluster(&sys, &CitationCluster::single(id))
        {
            Ok(html) => html_to_markdown(&html),
            Err(e) => {
                warn!(id, error = %e, "Inline citation failed");
                String::new()
            }
        }
    }

    /// Bibliography of every registered record, as Markdown
    ///
    /// Entries are separated by a blank line. A record registered twice is
    /// listed twice.
    pub fn render_bibliography(&mut self) -> String {
        let Some(engine) = self.engine.as_mut() else {
            return String::new();
        };

        if self.store.is_empty() {
            return String::new();
        }

        let ids = self.store.ids();
        engine.processor.update_items(ids);

        let sys = SessionSys {
            locale: Some(&engine.locale),
            store: &self.store,
        };

        let entries = match engine.processor.make_bibliography(&sys) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Bibliography failed");
                return String::new();
            }
        };

        let mut lines = Vec::new();
        for (id, html) in entries {
            let line = format!("{}\n", html_to_markdown(&html));
            let repeats = ids.iter().filter(|registered| **registered == id).count().max(1);
            lines.extend(std::iter::repeat(line).take(repeats));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_session_renders_nothing() {
        let mut session = CitationSession::new("apa");
        session.register(CitationRecord::new("a", "book"));

        assert!(!session.is_initialized());
        assert_eq!(session.render_inline("a"), "");
        assert_eq!(session.render_bibliography(), "");
    }

    #[test]
    fn test_sys_returns_registered_record() {
        let mut session = CitationSession::new("apa");
        let mut record = CitationRecord::new("a", "book");
        record.title = Some("Title".to_string());
        session.register(record.clone());

        let sys = session.sys();
        assert_eq!(sys.retrieve_item("a"), Some(&record));
        assert_eq!(sys.retrieve_item("b"), None);
        assert_eq!(sys.retrieve_locale("en-US"), None);
    }
}
