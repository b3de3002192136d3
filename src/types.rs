use std::collections::BTreeMap;
use std::fmt::Display;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The full structured record for one dictionary headword page.
///
/// Every optional field is present only if its source region existed on the
/// page; absence is the normal case, not an error. `phrasal_verbs` and
/// `verb_forms` are populated only when `wordform` is `"verb"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<String>,
    pub name: Option<String>,
    pub wordform: Option<String>,
    pub pronunciations: Vec<Pronunciation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    pub definitions: Vec<SenseGroup>,
    pub idioms: Vec<Idiom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_results: Option<Vec<RelatedGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrasal_verbs: Option<Vec<Reference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb_forms: Option<BTreeMap<String, VerbForm>>,
}

/// One regional pronunciation: `prefix` is `"BrE"` or `"NAmE"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub prefix: Option<String>,
    pub ipa: Option<String>,
    pub ogg: Option<String>,
    pub mp3: Option<String>,
}

/// A heading-level grouping of related senses. Entries without namespace
/// headings get a single group whose namespace is [`GLOBAL_NAMESPACE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseGroup {
    pub namespace: Option<String>,
    pub senses: Vec<Sense>,
}

/// Sentinel namespace for entries whose senses are not grouped under headings.
pub const GLOBAL_NAMESPACE: &str = "__GLOBAL__";

/// One discrete meaning within an entry. A sense with no description is
/// valid: some senses are pure pointers to another headword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub examples: Vec<String>,
    pub extra_examples: Vec<String>,
}

/// A fixed phrase documented separately from ordinary senses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idiom {
    pub name: String,
    pub summary: IdiomSummary,
    pub definitions: Vec<IdiomDefinition>,
}

/// Idiom-level qualifiers. Idioms carry no top-level description or
/// examples; those live in the nested sub-definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdiomSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdiomDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    pub examples: Vec<String>,
}

/// One irregular verb form row: the tense-marker prefix and the remaining
/// cell text with the prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbForm {
    pub prefix: Option<String>,
    pub value: String,
}

/// A pointer to another headword: `id` is the final path segment of the link
/// target, verbatim (fragment included), `name` its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub name: String,
}

/// One item from the related-entries sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedResult {
    pub name: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordform: Option<String>,
}

/// One category from the related-entries sidebar ("All matches", "Idioms",
/// ...). Serializes as a standalone single-key mapping so sibling categories
/// stay separate list entries instead of merging into one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedGroup {
    pub header: String,
    pub results: Vec<RelatedResult>,
}

impl Serialize for RelatedGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.header, &self.results)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for RelatedGroup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = RelatedGroup;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of one category header to its results")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (header, results) = access
                    .next_entry()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                Ok(RelatedGroup { header, results })
            }
        }

        deserializer.deserialize_map(GroupVisitor)
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "┌─ {} ─ {}",
            self.name.as_deref().unwrap_or("?"),
            self.wordform.as_deref().unwrap_or("?")
        )?;
        if let Some(id) = &self.id {
            writeln!(f, "│  Id: {}", id)?;
        }
        if let Some(property) = &self.property {
            writeln!(f, "│  Grammar: {}", property)?;
        }
        for pron in &self.pronunciations {
            if let (Some(prefix), Some(ipa)) = (&pron.prefix, &pron.ipa) {
                writeln!(f, "│  {} {}", prefix, ipa)?;
            }
        }
        writeln!(
            f,
            "└─ {} sense group(s), {} idiom(s)",
            self.definitions.len(),
            self.idioms.len()
        )?;
        for group in &self.definitions {
            write!(f, "{}", group)?;
        }
        for idiom in &self.idioms {
            write!(f, "{}", idiom)?;
        }
        if let Some(phrasal_verbs) = &self.phrasal_verbs {
            for pv in phrasal_verbs {
                writeln!(f, "  ↳ phrasal verb: {} ({})", pv.name, pv.id)?;
            }
        }
        if let Some(verb_forms) = &self.verb_forms {
            for (form, vf) in verb_forms {
                writeln!(f, "  ↳ {}: {}", form, vf)?;
            }
        }
        Ok(())
    }
}

impl Display for SenseGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(namespace) = &self.namespace
            && namespace != GLOBAL_NAMESPACE
        {
            writeln!(f, "── {}", namespace)?;
        }
        for (i, sense) in self.senses.iter().enumerate() {
            writeln!(f, "{:>3}. {}", i + 1, sense)?;
        }
        Ok(())
    }
}

impl Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{} ", label)?;
        }
        match &self.description {
            Some(description) => write!(f, "{}", description)?,
            None => {
                let targets: Vec<&str> =
                    self.references.iter().map(|r| r.name.as_str()).collect();
                write!(f, "→ {}", targets.join(", "))?;
            }
        }
        for example in &self.examples {
            write!(f, "\n       · {}", example)?;
        }
        Ok(())
    }
}

impl Display for Idiom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "── idiom: {}", self.name)?;
        for (i, definition) in self.definitions.iter().enumerate() {
            write!(f, "{:>3}. ", i + 1)?;
            if let Some(label) = &definition.label {
                write!(f, "{} ", label)?;
            }
            match &definition.description {
                Some(description) => writeln!(f, "{}", description)?,
                None => {
                    let targets: Vec<&str> = definition
                        .references
                        .iter()
                        .map(|r| r.name.as_str())
                        .collect();
                    writeln!(f, "→ {}", targets.join(", "))?;
                }
            }
            for example in &definition.examples {
                writeln!(f, "       · {}", example)?;
            }
        }
        Ok(())
    }
}

impl Display for VerbForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{} {}", prefix, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}
