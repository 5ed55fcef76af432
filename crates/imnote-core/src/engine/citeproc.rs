//! Style processor backed by an external citeproc executable
//!
//! Each call spawns the command, writes one JSON request to its stdin and
//! reads one JSON response from its stdout:
//!
//! ```text
//! request:  { "style", "locale", "lang", "references": [csl-json], "citations": [cluster], "bibliography": bool }
//! response: { "citations": [html], "bibliography": [[id, html]] }
//! ```

use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CitationCluster, EngineError, ProcessorFactory, StyleProcessor, Sys};
use crate::config::ProcessorConfig;
use crate::record::CitationRecord;

const LANG: &str = "en-US";

#[derive(Debug, Serialize)]
struct Request<'a> {
    style: &'a str,
    locale: &'a str,
    lang: &'a str,
    references: Vec<&'a CitationRecord>,
    citations: Vec<&'a CitationCluster>,
    bibliography: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Response {
    #[serde(default)]
    citations: Vec<String>,
    #[serde(default)]
    bibliography: Vec<(String, String)>,
}

/// Runs the configured command once per request
#[derive(Debug, Clone)]
pub struct CiteprocCommand {
    command: String,
    args: Vec<String>,
    style: String,
    items: Vec<String>,
}

impl CiteprocCommand {
    pub fn new(config: &ProcessorConfig, style: impl Into<String>) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            style: style.into(),
            items: Vec::new(),
        }
    }

    fn run(&self, request: &Request<'_>) -> Result<Response, EngineError> {
        let input =
            serde_json::to_vec(request).map_err(|e| EngineError::Processor(e.to_string()))?;

        debug!(command = %self.command, bytes = input.len(), "Running style processor");
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // Dropping stdin closes the pipe so the processor sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .map_err(|e| EngineError::Processor(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| EngineError::Processor(e.to_string()))?;

        if !output.status.success() {
            return Err(EngineError::Processor(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| EngineError::Processor(format!("unreadable output: {}", e)))
    }
}

fn locale(sys: &dyn Sys) -> Result<&str, EngineError> {
    sys.retrieve_locale(LANG)
        .ok_or_else(|| EngineError::Processor(format!("no locale for {}", LANG)))
}

impl StyleProcessor for CiteprocCommand {
    fn preview_citation_cluster(
        &mut self,
        sys: &dyn Sys,
        cluster: &CitationCluster,
    ) -> Result<String, EngineError> {
        let references = cluster
            .items
            .iter()
            .map(|item| {
                sys.retrieve_item(&item.id)
                    .ok_or_else(|| EngineError::UnknownItem(item.id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let response = self.run(&Request {
            style: &self.style,
            locale: locale(sys)?,
            lang: LANG,
            references,
            citations: vec![cluster],
            bibliography: false,
        })?;

        response
            .citations
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::Processor("no citation returned".to_string()))
    }

    fn update_items(&mut self, ids: &[String]) {
        self.items = ids.to_vec();
    }

    fn make_bibliography(&mut self, sys: &dyn Sys) -> Result<Vec<(String, String)>, EngineError> {
        let mut references: Vec<&CitationRecord> = Vec::new();
        for id in &self.items {
            let record = sys
                .retrieve_item(id)
                .ok_or_else(|| EngineError::UnknownItem(id.clone()))?;
            if !references.iter().any(|r| r.id() == record.id()) {
                references.push(record);
            }
        }

        let response = self.run(&Request {
            style: &self.style,
            locale: locale(sys)?,
            lang: LANG,
            references,
            citations: Vec::new(),
            bibliography: true,
        })?;

        Ok(response.bibliography)
    }
}

/// Builds [`CiteprocCommand`]s from the processor settings
#[derive(Debug, Clone, Default)]
pub struct CiteprocFactory {
    config: ProcessorConfig,
}

impl CiteprocFactory {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }
}

impl ProcessorFactory for CiteprocFactory {
    fn build(&self, style: &str) -> Result<Box<dyn StyleProcessor>, EngineError> {
        Ok(Box::new(CiteprocCommand::new(&self.config, style)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordStore;

    struct StaticSys {
        store: RecordStore,
    }

    impl Sys for StaticSys {
        fn retrieve_locale(&self, _lang: &str) -> Option<&str> {
            Some("<locale/>")
        }

        fn retrieve_item(&self, id: &str) -> Option<&CitationRecord> {
            self.store.get(id)
        }
    }

    fn sys() -> StaticSys {
        let mut store = RecordStore::new();
        store.insert(CitationRecord::new("a", "book"));
        StaticSys { store }
    }

    #[cfg(unix)]
    fn shell(script: &str) -> ProcessorConfig {
        ProcessorConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_reads_citation_from_stdout() {
        let config = shell(r#"cat > /dev/null; echo '{"citations": ["<i>A</i>"]}'"#);
        let mut processor = CiteprocCommand::new(&config, "<style/>");

        let html = processor
            .preview_citation_cluster(&sys(), &CitationCluster::single("a"))
            .unwrap();
        assert_eq!(html, "<i>A</i>");
    }

    #[cfg(unix)]
    #[test]
    fn test_request_carries_style_and_references() {
        let dir = tempfile::tempdir().unwrap();
        let captured = dir.path().join("request.json");
        let config = ProcessorConfig {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                r#"cat > "$0"; echo '{"bibliography": [["a", "<div>A</div>"]]}'"#.to_string(),
                captured.to_string_lossy().into_owned(),
            ],
        };
        let mut processor = CiteprocCommand::new(&config, "<style/>");
        processor.update_items(&["a".to_string(), "a".to_string()]);

        let entries = processor.make_bibliography(&sys()).unwrap();
        assert_eq!(entries, vec![("a".to_string(), "<div>A</div>".to_string())]);

        let request: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&captured).unwrap()).unwrap();
        assert_eq!(request["style"], "<style/>");
        assert_eq!(request["locale"], "<locale/>");
        assert_eq!(request["lang"], "en-US");
        assert_eq!(request["bibliography"], true);
        assert_eq!(request["references"].as_array().unwrap().len(), 1);
        assert_eq!(request["references"][0]["id"], "a");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let config = shell("cat > /dev/null; echo boom >&2; exit 3");
        let mut processor = CiteprocCommand::new(&config, "<style/>");

        let err = processor.make_bibliography(&sys()).unwrap_err();
        assert!(matches!(err, EngineError::Processor(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn test_missing_command() {
        let config = ProcessorConfig {
            command: "imnote-no-such-processor".to_string(),
            args: Vec::new(),
        };
        let mut processor = CiteprocCommand::new(&config, "<style/>");

        let err = processor
            .preview_citation_cluster(&sys(), &CitationCluster::single("a"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
    }

    #[test]
    fn test_unknown_item_is_rejected_before_spawning() {
        let config = ProcessorConfig {
            command: "imnote-no-such-processor".to_string(),
            args: Vec::new(),
        };
        let mut processor = CiteprocCommand::new(&config, "<style/>");

        let err = processor
            .preview_citation_cluster(&sys(), &CitationCluster::single("zzz"))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownItem(id) if id == "zzz"));
    }
}
