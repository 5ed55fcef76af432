//! `{{key}}` and `{{modifier|key}}` placeholder substitution

use std::collections::HashMap;

use imnote_bibtex::RawEntry;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{(?:(\w+)\|)?([^{}|\s]+)\}\}").unwrap();
}

/// Which tier wins when a raw field shares a name with a computed key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPrecedence {
    /// `type`, `citekey`, `id`, `citation` and `bibliography` always come
    /// from the pipeline
    #[default]
    ComputedFirst,
    /// A BibTeX field of the same name shadows the computed value
    RawFirst,
}

/// Values available to placeholders for one entry
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    computed: IndexMap<String, String>,
    fields: IndexMap<String, String>,
    precedence: KeyPrecedence,
}

impl TemplateContext {
    pub fn new(precedence: KeyPrecedence) -> Self {
        Self {
            precedence,
            ..Default::default()
        }
    }

    /// Context for a registered entry
    ///
    /// Raw fields with several values are joined with `", "`.
    pub fn for_entry(
        entry: &RawEntry,
        citation: String,
        bibliography: String,
        precedence: KeyPrecedence,
    ) -> Self {
        let mut context = Self::new(precedence);
        context.insert_computed("type", entry.entry_type.clone());
        context.insert_computed("citekey", entry.key.clone());
        context.insert_computed("id", entry.key.clone());
        context.insert_computed("bibliography", bibliography);
        context.insert_computed("citation", citation);

        for (name, values) in &entry.fields {
            context.insert_field(name.clone(), values.join(", "));
        }
        context
    }

    pub fn insert_computed(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.computed.insert(key.into(), value.into());
    }

    pub fn insert_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look a key up in both tiers, in precedence order
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let computed = || self.computed.get(key);
        let field = || {
            self.fields
                .get(key)
                .or_else(|| self.fields.get(&key.to_lowercase()))
        };

        match self.precedence {
            KeyPrecedence::ComputedFirst => computed().or_else(field),
            KeyPrecedence::RawFirst => field().or_else(computed),
        }
        .map(String::as_str)
    }
}

type Transform = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Named value transforms for `{{modifier|key}}`
pub struct Modifiers {
    transforms: HashMap<String, Transform>,
}

impl Modifiers {
    /// A registry with no transforms; every modifier is ignored
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        transform: impl Fn(&str) -> String + Send + Sync + 'static,
    ) {
        self.transforms.insert(name.into(), Box::new(transform));
    }

    /// Apply a modifier; unknown names leave the value unchanged
    pub fn apply(&self, name: &str, value: &str) -> String {
        match self.transforms.get(name) {
            Some(transform) => transform(value),
            None => value.to_string(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        let mut modifiers = Self::empty();
        modifiers.register("upper", |s| s.to_uppercase());
        modifiers.register("lower", |s| s.to_lowercase());
        modifiers.register("capitalize", capitalize);
        modifiers.register("title", |s| {
            s.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
        });
        modifiers.register("trim", |s| s.trim().to_string());
        modifiers.register("slug", slug);
        modifiers
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.transforms.keys().collect();
        names.sort();
        f.debug_struct("Modifiers").field("names", &names).finish()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn slug(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Substitute placeholders using the built-in modifiers
pub fn apply(template: &str, context: &TemplateContext) -> String {
    apply_with(template, context, &Modifiers::default())
}

/// Substitute placeholders in one left-to-right pass
///
/// Substituted text is never rescanned. A placeholder whose key is in
/// neither tier is left exactly as written.
pub fn apply_with(template: &str, context: &TemplateContext, modifiers: &Modifiers) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let key = &caps[2];
            match context.lookup(key) {
                Some(value) => match caps.get(1) {
                    Some(modifier) => modifiers.apply(modifier.as_str(), value),
                    None => value.to_string(),
                },
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
