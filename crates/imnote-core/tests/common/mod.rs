//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;

use imnote_core::engine::{style_url, LOCALE_URL};
use imnote_core::{CitationCluster, EngineError, ProcessorFactory, StyleProcessor, Sys};
use imnote_providers::{HttpError, HttpRequest, HttpResponse, HttpTransport};

pub const STYLE: &str = "apa-6th-edition";
pub const STYLE_XML: &str = "<style xmlns=\"http://purl.org/net/xbiblio/csl\"/>";
pub const LOCALE_XML: &str = "<locale xml:lang=\"en-US\"/>";

/// Serves canned responses by URL; anything else is a 404
#[derive(Default)]
pub struct MockHttp {
    responses: HashMap<String, HttpResponse>,
}

impl MockHttp {
    /// A transport that serves the locale and the default style
    pub fn csl() -> Self {
        Self::default()
            .with(LOCALE_URL, 200, LOCALE_XML)
            .with(&style_url(STYLE), 200, STYLE_XML)
    }

    pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), HttpResponse::new(status, body));
        self
    }
}

impl HttpTransport for MockHttp {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        Ok(self
            .responses
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "")))
    }
}

/// Author-year rendering without any real style logic
///
/// Inline: `(<i>Family</i>, Year)`. Bibliography: one `csl-entry` div per
/// distinct id, in the order the ids were last pushed.
#[derive(Default)]
pub struct FakeProcessor {
    items: Vec<String>,
}

impl FakeProcessor {
    fn author_year(sys: &dyn Sys, id: &str) -> Result<(String, String, String), EngineError> {
        sys.retrieve_locale("en-US")
            .ok_or_else(|| EngineError::Processor("no locale".to_string()))?;
        let record = sys
            .retrieve_item(id)
            .ok_or_else(|| EngineError::UnknownItem(id.to_string()))?;

        let family = record
            .author
            .first()
            .and_then(|a| a.family.clone())
            .unwrap_or_else(|| "Anon".to_string());
        let year = record
            .issued
            .as_ref()
            .map(|d| d.date_parts[0][0].to_string())
            .unwrap_or_else(|| "n.d.".to_string());
        let title = record.title.clone().unwrap_or_default();
        Ok((family, year, title))
    }
}

impl StyleProcessor for FakeProcessor {
    fn preview_citation_cluster(
        &mut self,
        sys: &dyn Sys,
        cluster: &CitationCluster,
    ) -> Result<String, EngineError> {
        let (family, year, _) = Self::author_year(sys, &cluster.items[0].id)?;
        Ok(format!("(<i>{}</i>, {})", family, year))
    }

    fn update_items(&mut self, ids: &[String]) {
        self.items = ids.to_vec();
    }

    fn make_bibliography(&mut self, sys: &dyn Sys) -> Result<Vec<(String, String)>, EngineError> {
        let mut seen: Vec<&String> = Vec::new();
        let mut entries = Vec::new();
        for id in &self.items {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            let (family, year, title) = Self::author_year(sys, id)?;
            entries.push((
                id.clone(),
                format!(
                    "<div class=\"csl-entry\">{}. ({}). <i>{}</i>.</div>",
                    family, year, title
                ),
            ));
        }
        Ok(entries)
    }
}

/// Builds [`FakeProcessor`]s, refusing anything that is not the canned style
pub struct FakeFactory;

impl ProcessorFactory for FakeFactory {
    fn build(&self, style: &str) -> Result<Box<dyn StyleProcessor>, EngineError> {
        if style != STYLE_XML {
            return Err(EngineError::Processor("unexpected style".to_string()));
        }
        Ok(Box::new(FakeProcessor::default()))
    }
}
