//! Batch note generation: BibTeX in, inserted text or new vault files out

use chrono::{Local, NaiveDate};
use imnote_bibtex::RawEntry;
use imnote_providers::{resolve_input, HttpTransport};
use tracing::{debug, info, warn};

use crate::config::{is_template_type, Settings};
use crate::engine::{CitationSession, CiteprocFactory, ProcessorFactory};
use crate::error::{GenerateError, Result};
use crate::filename::{self, DEFAULT_NAME};
use crate::normalize::Normalizer;
use crate::template::{apply, TemplateContext};
use crate::vault::{self, target_folder, Vault, VaultError};

/// Notes rendered for insertion into the active document
#[derive(Debug, Clone, Default)]
pub struct InsertReport {
    /// Rendered notes in entry order, each ending with a newline
    pub notes: Vec<String>,
    /// Keys of entries without a usable template
    pub skipped: Vec<String>,
    pub notices: Vec<String>,
}

impl InsertReport {
    /// All notes as one block of text
    pub fn text(&self) -> String {
        self.notes.concat()
    }
}

/// An entry whose note could not be written
#[derive(Debug)]
pub struct EntryFailure {
    pub key: String,
    pub error: VaultError,
}

/// Notes written to the vault
#[derive(Debug, Default)]
pub struct CreateReport {
    /// Vault paths of the created notes
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<EntryFailure>,
    pub notices: Vec<String>,
}

/// Runs the whole pipeline for a batch of entries
pub struct Generator<V, T, F = CiteprocFactory> {
    vault: V,
    http: T,
    factory: F,
    settings: Settings,
    today: NaiveDate,
}

impl<V, T, F> Generator<V, T, F>
where
    V: Vault,
    T: HttpTransport,
    F: ProcessorFactory,
{
    pub fn new(vault: V, http: T, factory: F, settings: Settings) -> Self {
        Self {
            vault,
            http,
            factory,
            settings,
            today: Local::now().date_naive(),
        }
    }

    /// Date used for `accessed` when access tracking is on
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Turn user input into BibTeX, through a provider when one matches
    ///
    /// Input that already contains BibTeX entries is returned unchanged.
    pub async fn prepare(&self, input: &str) -> Result<String> {
        Ok(resolve_input(input, &self.http)
            .await?
            .unwrap_or_else(|| input.to_string()))
    }

    /// Render a note per entry for insertion at the cursor
    pub async fn insert(&self, text: &str, template_override: Option<&str>) -> Result<InsertReport> {
        let mut report = InsertReport::default();
        let (mut session, entries) = self.begin(text, template_override, &mut report.notices).await?;

        for entry in &entries {
            match self.render(&mut session, entry, template_override) {
                Some((note, _)) => report.notes.push(format!("{}\n", note)),
                None => report.skipped.push(entry.key.clone()),
            }
        }

        Ok(report)
    }

    /// Render a note per entry and create it as a new file in the vault
    pub async fn create(&self, text: &str, template_override: Option<&str>) -> Result<CreateReport> {
        let mut report = CreateReport::default();
        let (mut session, entries) = self.begin(text, template_override, &mut report.notices).await?;

        for entry in &entries {
            let Some((note, context)) = self.render(&mut session, entry, template_override) else {
                report.skipped.push(entry.key.clone());
                continue;
            };

            match self.write_note(&note, &context) {
                Ok(path) => {
                    info!(key = %entry.key, path = %path, "Created note");
                    report.created.push(path);
                }
                Err(error) => {
                    warn!(key = %entry.key, error = %error, "Could not create note");
                    report.notices.push(format!("{}: {}", entry.key, error));
                    report.failures.push(EntryFailure {
                        key: entry.key.clone(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Parse the batch and bring up a citation session
    async fn begin(
        &self,
        text: &str,
        template_override: Option<&str>,
        notices: &mut Vec<String>,
    ) -> Result<(CitationSession, Vec<RawEntry>)> {
        if let Some(kind) = template_override {
            if !is_template_type(kind) {
                return Err(GenerateError::UnknownTemplateType(kind.to_string()));
            }
        }

        let parsed = imnote_bibtex::parse(text).require_entries()?;
        for error in &parsed.errors {
            notices.push(format!(
                "Skipped unparseable entry at line {}: {}",
                error.line, error.message
            ));
        }

        let mut session = CitationSession::new(self.settings.csl_style.clone());
        if let Err(e) = session.initialize(&self.http, &self.factory).await {
            warn!(error = %e, "Citation engine unavailable, citations will be empty");
            notices.push(format!("Error: {}", e));
        }

        Ok((session, parsed.entries))
    }

    fn template_for(&self, entry: &RawEntry, template_override: Option<&str>) -> Option<String> {
        let kind = template_override.unwrap_or(entry.entry_type.as_str());
        let Some(path) = self.settings.template_for(kind) else {
            debug!(key = %entry.key, kind, "No template configured");
            return None;
        };

        match self.vault.read_file(path) {
            Ok(template) if !template.is_empty() => Some(template),
            Ok(_) => {
                debug!(key = %entry.key, path, "Template is empty");
                None
            }
            Err(e) => {
                debug!(key = %entry.key, path, error = %e, "Template unreadable");
                None
            }
        }
    }

    /// Register the entry and render its note; `None` when there is nothing to write
    fn render(
        &self,
        session: &mut CitationSession,
        entry: &RawEntry,
        template_override: Option<&str>,
    ) -> Option<(String, TemplateContext)> {
        let template = self.template_for(entry, template_override)?;

        let normalizer = if self.settings.show_accessed {
            Normalizer::with_accessed(self.today)
        } else {
            Normalizer::new()
        };
        session.register(normalizer.normalize(entry));

        let citation = session.render_inline(&entry.key);
        let bibliography = session.render_bibliography();
        let context = TemplateContext::for_entry(
            entry,
            citation,
            bibliography,
            self.settings.key_precedence,
        );

        let note = apply(&template, &context);
        if note.is_empty() {
            return None;
        }
        Some((note, context))
    }

    fn write_note(&self, note: &str, context: &TemplateContext) -> std::result::Result<String, VaultError> {
        let folder = target_folder(&self.vault, &self.settings)?;

        let name = filename::sanitize(&apply(&self.settings.file_name, context));
        let name = if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name
        };

        let existing = self.vault.list_children(&folder)?;
        let path = vault::join(&folder, &filename::resolve(&name, &existing));
        self.vault.create_file(&path, note)?;
        Ok(path)
    }
}
