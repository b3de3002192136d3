use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::types::{
    Entry, GLOBAL_NAMESPACE, Idiom, IdiomDefinition, IdiomSummary, Pronunciation, Reference,
    RelatedGroup, RelatedResult, Sense, SenseGroup, VerbForm,
};

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css}: {e:?}"))
}

static SEL_ENTRY: LazyLock<Selector> = LazyLock::new(|| sel("#entryContent > .entry"));
static SEL_HEADER: LazyLock<Selector> = LazyLock::new(|| sel(".top-container"));
static SEL_HEADWORD: LazyLock<Selector> = LazyLock::new(|| sel(".top-container .headword"));
static SEL_WORDFORM: LazyLock<Selector> = LazyLock::new(|| sel(".top-container .pos"));
static SEL_GRAMMAR_GLOBAL: LazyLock<Selector> = LazyLock::new(|| sel(".top-container .grammar"));
static SEL_XREF_LINKS: LazyLock<Selector> = LazyLock::new(|| sel(".xrefs a"));

static SEL_NAMESPACES: LazyLock<Selector> = LazyLock::new(|| sel(".senses_multiple > .shcut-g"));
static SEL_SHCUT: LazyLock<Selector> = LazyLock::new(|| sel("h2.shcut"));
static SEL_SENSE: LazyLock<Selector> = LazyLock::new(|| sel(".sense"));
static SEL_SENSES_MULTIPLE: LazyLock<Selector> = LazyLock::new(|| sel(".senses_multiple"));
static SEL_SENSE_SINGLE: LazyLock<Selector> = LazyLock::new(|| sel(".sense_single"));

static SEL_DEFS_FLAT: LazyLock<Selector> =
    LazyLock::new(|| sel(".senses_multiple .sense > .def"));
static SEL_EXAMPLES_FLAT: LazyLock<Selector> =
    LazyLock::new(|| sel(".senses_multiple .sense > .examples .x"));

static SEL_GRAMMAR: LazyLock<Selector> = LazyLock::new(|| sel(".grammar"));
static SEL_LABELS: LazyLock<Selector> = LazyLock::new(|| sel(".labels"));
static SEL_REFER: LazyLock<Selector> = LazyLock::new(|| sel(".dis-g"));
static SEL_DEF: LazyLock<Selector> = LazyLock::new(|| sel(".def"));
static SEL_EXAMPLES: LazyLock<Selector> = LazyLock::new(|| sel(".examples .x"));
static SEL_EXTRA_EXAMPLES: LazyLock<Selector> =
    LazyLock::new(|| sel(r#"[unbox="extra_examples"] .examples .unx"#));
static SEL_X: LazyLock<Selector> = LazyLock::new(|| sel(".x"));

static SEL_IDIOM_GROUPS: LazyLock<Selector> = LazyLock::new(|| sel(".idioms > .idm-g"));
static SEL_IDM_MULTI: LazyLock<Selector> = LazyLock::new(|| sel(".idm-l"));
static SEL_IDM: LazyLock<Selector> = LazyLock::new(|| sel(".idm"));

static SEL_PHRASAL_LINKS: LazyLock<Selector> = LazyLock::new(|| sel(".phrasal_verb_links a"));
static SEL_XH: LazyLock<Selector> = LazyLock::new(|| sel(".xh"));

static SEL_VERB_FORM_ROWS: LazyLock<Selector> = LazyLock::new(|| sel("tr.verb_form[form]"));
static SEL_VERB_FORM_CELL: LazyLock<Selector> = LazyLock::new(|| sel("td.verb_form"));
static SEL_VF_PREFIX: LazyLock<Selector> = LazyLock::new(|| sel("span.vf_prefix"));

static SEL_RELATED: LazyLock<Selector> = LazyLock::new(|| sel("#rightcolumn #relatedentries"));
static SEL_DT: LazyLock<Selector> = LazyLock::new(|| sel("dt"));
static SEL_DD: LazyLock<Selector> = LazyLock::new(|| sel("dd"));
static SEL_LI: LazyLock<Selector> = LazyLock::new(|| sel("li"));
static SEL_SPAN: LazyLock<Selector> = LazyLock::new(|| sel("span"));
static SEL_A: LazyLock<Selector> = LazyLock::new(|| sel("a"));
static SEL_POS_TAG: LazyLock<Selector> = LazyLock::new(|| sel("pos"));

static SEL_NO_MATCH: LazyLock<Selector> = LazyLock::new(|| sel("#search-results > h1"));

/// Boxed extras that share class names with definition content. Removed up
/// front so they are never mistaken for senses or examples.
const NOISE_SELECTORS: [&str; 5] = [
    r#"[title="Oxford Collocations Dictionary"]"#,
    r#"[title="British/American"]"#, // edge case: 'phone'
    r#"[title="Express Yourself"]"#,
    r#"[title="Collocations"]"#,
    r#"[title="Word Origin"]"#,
];

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// First match of `selector` under `scope`, as text. "Nothing matched" is a
/// normal outcome for every optional page region, so this returns an Option
/// instead of an error.
fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(elem_text)
}

fn all_texts(scope: ElementRef, selector: &Selector) -> Vec<String> {
    scope.select(selector).map(elem_text).collect()
}

/// Text of `element` excluding any descendant subtree `skip` matches.
/// Non-destructive: repeated reads never double-strip.
fn text_excluding<F>(element: ElementRef, skip: &F) -> String
where
    F: Fn(&ElementRef) -> bool,
{
    let mut out = String::new();
    collect_text(element, skip, &mut out);
    out
}

fn collect_text<F>(element: ElementRef, skip: &F, out: &mut String)
where
    F: Fn(&ElementRef) -> bool,
{
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !skip(&child_element) {
                collect_text(child_element, skip, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Word id from a link target: the final path segment, verbatim
/// (fragment included, e.g. `content2_3#heart_idmg_50`).
pub fn extract_id(link: &str) -> String {
    link.split('/').next_back().unwrap_or(link).to_string()
}

fn prefix_from_filename(filename: &str) -> Option<&'static str> {
    if filename.contains("_gb_") {
        Some("BrE")
    } else if filename.contains("_us_") {
        Some("NAmE")
    } else {
        None
    }
}

/// Extracts structured data from one parsed dictionary page.
///
/// The document handle is bound at construction: each fetch builds a fresh
/// `Extractor`, independent instances are safe side by side, and every read
/// operation is idempotent. Sanitization (removal of collocation/origin
/// boxes) happens exactly once, during [`Extractor::parse`].
pub struct Extractor {
    document: Html,
}

impl Extractor {
    /// Parse raw page HTML and strip the auxiliary boxed regions.
    pub fn parse(html: &str) -> Self {
        let mut document = Html::parse_document(html);

        for css in NOISE_SELECTORS {
            let selector = sel(css);
            let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
            for id in ids {
                if let Some(mut node) = document.tree.get_mut(id) {
                    node.detach();
                }
            }
        }

        Self { document }
    }

    /// True when the page is a search-results page reporting no exact match.
    pub fn is_no_match(&self) -> bool {
        self.document
            .select(&SEL_NO_MATCH)
            .next()
            .is_some_and(|h1| elem_text(h1).trim_start().starts_with("No exact match found"))
    }

    fn root(&self) -> Option<ElementRef> {
        self.document.select(&SEL_ENTRY).next()
    }

    /// Entry id. Homograph pages sharing one headword (e.g. two pages both
    /// titled "content") carry distinct ids like `content_1` / `content_2`.
    pub fn id(&self) -> Option<String> {
        self.root()
            .and_then(|entry| entry.value().attr("id"))
            .map(str::to_string)
    }

    /// Headword with embedded annotation spans (homograph numbers, symbols)
    /// excluded from the text.
    pub fn name(&self) -> Option<String> {
        self.document.select(&SEL_HEADWORD).next().map(|headword| {
            text_excluding(headword, &|el| el.value().name() == "span")
                .trim()
                .to_string()
        })
    }

    /// Part of speech from the header (verb, noun, adjective, ...).
    pub fn wordform(&self) -> Option<String> {
        self.document.select(&SEL_WORDFORM).next().map(elem_text)
    }

    /// Grammar annotation applying to the whole entry.
    pub fn property_global(&self) -> Option<String> {
        self.document
            .select(&SEL_GRAMMAR_GLOBAL)
            .next()
            .map(elem_text)
    }

    /// British and American pronunciations, in that order.
    pub fn pronunciations(&self) -> Vec<Pronunciation> {
        vec![
            self.pronunciation("br", "BrE"),
            // the source wrote this tag as both "nAmE" and "NAmE"; we use
            // the "NAmE" casing everywhere
            self.pronunciation("n_am", "NAmE"),
        ]
    }

    fn pronunciation(&self, geo: &str, region: &str) -> Pronunciation {
        let phon = sel(&format!(r#"[geo="{geo}"] .phon"#));
        let ogg = sel(&format!(r#"[geo="{geo}"] [data-src-ogg]"#));
        let mp3 = sel(&format!(r#"[geo="{geo}"] [data-src-mp3]"#));

        let mut pron = Pronunciation::default();

        if let Some(phon_tag) = self.document.select(&phon).next() {
            pron.ipa = Some(elem_text(phon_tag));
            pron.prefix = Some(region.to_string());
        }
        pron.ogg = self
            .document
            .select(&ogg)
            .next()
            .and_then(|el| el.value().attr("data-src-ogg"))
            .map(str::to_string);
        pron.mp3 = self
            .document
            .select(&mp3)
            .next()
            .and_then(|el| el.value().attr("data-src-mp3"))
            .map(str::to_string);

        // no phonetic text found, but the audio filename may carry a
        // regional hint (`_gb_` / `_us_`)
        if pron.prefix.is_none() {
            pron.prefix = pron
                .ogg
                .as_deref()
                .and_then(prefix_from_filename)
                .or_else(|| pron.mp3.as_deref().and_then(prefix_from_filename))
                .map(str::to_string);
        }

        pron
    }

    /// "See also"-style links from the entry header.
    pub fn references(&self) -> Vec<Reference> {
        self.document
            .select(&SEL_HEADER)
            .next()
            .map(collect_references)
            .unwrap_or_default()
    }

    /// Senses grouped by namespace heading. Entries without namespace
    /// headings yield one implicit `__GLOBAL__` group, scanned from the
    /// multi-sense container or, failing that, the single-sense one.
    pub fn definition_full(&self) -> Vec<SenseGroup> {
        let mut groups: Vec<SenseGroup> = Vec::new();

        for namespace_tag in self.document.select(&SEL_NAMESPACES) {
            let namespace = first_text(namespace_tag, &SEL_SHCUT);
            let senses = namespace_tag.select(&SEL_SENSE).map(parse_sense).collect();
            groups.push(SenseGroup { namespace, senses });
        }

        if groups.is_empty() {
            let mut bodies = self.document.select(&SEL_SENSES_MULTIPLE).peekable();
            let mut senses = Vec::new();

            if bodies.peek().is_some() {
                for body in bodies {
                    senses.extend(body.select(&SEL_SENSE).map(parse_sense));
                }
            } else {
                for body in self.document.select(&SEL_SENSE_SINGLE) {
                    senses.extend(body.select(&SEL_SENSE).map(parse_sense));
                }
            }

            groups.push(SenseGroup {
                namespace: Some(GLOBAL_NAMESPACE.to_string()),
                senses,
            });
        }

        groups
    }

    /// Flat list of definition texts, ignoring namespace grouping.
    pub fn definitions(&self) -> Vec<String> {
        self.document.select(&SEL_DEFS_FLAT).map(elem_text).collect()
    }

    /// Flat list of example sentences across all senses.
    pub fn examples(&self) -> Vec<String> {
        self.document
            .select(&SEL_EXAMPLES_FLAT)
            .map(elem_text)
            .collect()
    }

    /// Idioms with their summary qualifiers and nested sub-definitions.
    pub fn idioms(&self) -> Vec<Idiom> {
        self.document
            .select(&SEL_IDIOM_GROUPS)
            .map(|idiom_tag| {
                // some idioms sit in an .idm-l wrapper of multiple .idm
                // spans instead of a single .idm
                let name = first_text(idiom_tag, &SEL_IDM_MULTI)
                    .or_else(|| first_text(idiom_tag, &SEL_IDM))
                    .unwrap_or_default();

                let summary = IdiomSummary {
                    label: first_text(idiom_tag, &SEL_LABELS),
                    refer: first_text(idiom_tag, &SEL_REFER),
                    references: collect_references(idiom_tag),
                };

                let definitions = idiom_tag
                    .select(&SEL_SENSE)
                    .map(|definition_tag| IdiomDefinition {
                        description: first_text(definition_tag, &SEL_DEF),
                        label: first_text(definition_tag, &SEL_LABELS),
                        refer: first_text(definition_tag, &SEL_REFER),
                        references: collect_references(definition_tag),
                        examples: all_texts(definition_tag, &SEL_X),
                    })
                    .collect();

                Idiom {
                    name,
                    summary,
                    definitions,
                }
            })
            .collect()
    }

    /// Phrasal verb links (meaningful for verb entries only).
    pub fn phrasal_verbs(&self) -> Vec<Reference> {
        self.document
            .select(&SEL_PHRASAL_LINKS)
            .filter_map(|link| {
                let name = first_text(link, &SEL_XH)?;
                let href = link.value().attr("href")?;
                Some(Reference {
                    id: extract_id(href),
                    name,
                })
            })
            .collect()
    }

    /// Irregular verb forms keyed by the row's `form` attribute. Each value
    /// cell's tense-marker prefix span is read separately, then excluded
    /// from the remaining cell text.
    pub fn verb_forms(&self) -> BTreeMap<String, VerbForm> {
        let mut forms = BTreeMap::new();

        for row in self.document.select(&SEL_VERB_FORM_ROWS) {
            let Some(form) = row.value().attr("form") else {
                continue;
            };
            let Some(cell) = row.select(&SEL_VERB_FORM_CELL).next() else {
                continue;
            };

            let prefix = first_text(cell, &SEL_VF_PREFIX);
            let value = text_excluding(cell, &|el| {
                el.value().name() == "span" && el.value().classes().any(|c| c == "vf_prefix")
            })
            .trim()
            .to_string();

            forms.insert(form.to_string(), VerbForm { prefix, value });
        }

        forms
    }

    /// Related-entries sidebar: ordered heading/list pairs ("All matches",
    /// "Idioms", ...), each kept as its own single-key group.
    pub fn other_results(&self) -> Vec<RelatedGroup> {
        let Some(related) = self.document.select(&SEL_RELATED).next() else {
            return Vec::new();
        };

        let headers = related.select(&SEL_DT);
        let lists = related.select(&SEL_DD);

        headers
            .zip(lists)
            .map(|(header_tag, list_tag)| RelatedGroup {
                header: elem_text(header_tag),
                results: list_tag
                    .select(&SEL_LI)
                    .filter_map(parse_related_item)
                    .collect(),
            })
            .collect()
    }

    /// Aggregate every extraction into one [`Entry`]. The global property
    /// and related-entries fields are dropped entirely when empty; phrasal
    /// verbs and verb forms are attached only for verb entries.
    pub fn entry(&self) -> Entry {
        let wordform = self.wordform();
        let is_verb = wordform.as_deref() == Some("verb");
        let other_results = self.other_results();

        Entry {
            id: self.id(),
            name: self.name(),
            pronunciations: self.pronunciations(),
            property: self.property_global().filter(|p| !p.is_empty()),
            definitions: self.definition_full(),
            idioms: self.idioms(),
            other_results: (!other_results.is_empty()).then_some(other_results),
            phrasal_verbs: is_verb.then(|| self.phrasal_verbs()),
            verb_forms: is_verb.then(|| self.verb_forms()),
            wordform,
        }
    }
}

/// Cross-references under `scope`: each `.xrefs` link becomes a target id
/// plus display text.
fn collect_references(scope: ElementRef) -> Vec<Reference> {
    scope
        .select(&SEL_XREF_LINKS)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            Some(Reference {
                id: extract_id(href),
                name: elem_text(link),
            })
        })
        .collect()
}

/// Shared best-effort sense routine: every field is tried independently and
/// a missing region never aborts the rest.
fn parse_sense(sense_tag: ElementRef) -> Sense {
    Sense {
        property: first_text(sense_tag, &SEL_GRAMMAR),
        label: first_text(sense_tag, &SEL_LABELS),
        refer: first_text(sense_tag, &SEL_REFER),
        references: collect_references(sense_tag),
        // absent when the sense is purely a pointer to another entry
        description: first_text(sense_tag, &SEL_DEF),
        examples: all_texts(sense_tag, &SEL_EXAMPLES),
        extra_examples: all_texts(sense_tag, &SEL_EXTRA_EXAMPLES),
    }
}

fn parse_related_item(item: ElementRef) -> Option<RelatedResult> {
    let span = item.select(&SEL_SPAN).next()?;

    // display name is the item's own text runs, not its nested tags
    let name = span
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        return None;
    }

    let Some(href) = item
        .select(&SEL_A)
        .next()
        .and_then(|link| link.value().attr("href"))
    else {
        log::warn!("Skipping related entry '{}': no link target", name);
        return None;
    };

    let wordform = first_text(item, &SEL_POS_TAG)
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty());

    Some(RelatedResult {
        name,
        id: extract_id(href),
        wordform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load_fixture(name: &str) -> Extractor {
        let html = fs::read_to_string(format!("fixtures/{}", name))
            .expect("Failed to read fixture file");
        Extractor::parse(&html)
    }

    #[test]
    fn test_header_fields_from_content_page() {
        let extractor = load_fixture("word_content");

        assert_eq!(extractor.id(), Some("content_1".to_string()));
        // homograph number span must be excluded from the headword
        assert_eq!(extractor.name(), Some("content".to_string()));
        assert_eq!(extractor.wordform(), Some("noun".to_string()));
        assert_eq!(extractor.property_global(), None);
    }

    #[test]
    fn test_pronunciations_both_regions() {
        let extractor = load_fixture("word_content");
        let prons = extractor.pronunciations();

        assert_eq!(prons.len(), 2);
        assert_eq!(prons[0].prefix.as_deref(), Some("BrE"));
        assert_eq!(prons[0].ipa.as_deref(), Some("/kənˈtent/"));
        assert!(prons[0].ogg.as_deref().unwrap().contains("_gb_"));
        assert!(prons[0].mp3.as_deref().unwrap().contains("_gb_"));
        assert_eq!(prons[1].prefix.as_deref(), Some("NAmE"));
        assert!(prons[1].ogg.as_deref().unwrap().contains("_us_"));
    }

    #[test]
    fn test_pronunciation_prefix_inferred_from_filename() {
        // no .phon text anywhere: the region tag comes from the filename
        let html = r#"
            <div id="entryContent"><div class="entry" id="x_1">
              <div geo="br">
                <div data-src-ogg="https://example.org/media/x__gb_1.ogg"
                     data-src-mp3="https://example.org/media/x__gb_1.mp3"></div>
              </div>
              <div geo="n_am">
                <div data-src-ogg="https://example.org/media/x__us_2.ogg"
                     data-src-mp3="https://example.org/media/x__us_2.mp3"></div>
              </div>
            </div></div>
        "#;
        let extractor = Extractor::parse(html);
        let prons = extractor.pronunciations();

        assert_eq!(prons[0].prefix.as_deref(), Some("BrE"));
        assert_eq!(prons[0].ipa, None);
        assert_eq!(prons[1].prefix.as_deref(), Some("NAmE"));
        assert_eq!(prons[1].ipa, None);
    }

    #[test]
    fn test_pronunciation_prefix_not_overridden_by_filename() {
        // phonetic text present: region tag stays canonical even though the
        // filename hints at the other region
        let html = r#"
            <div geo="n_am">
              <span class="phon">/tɛst/</span>
              <div data-src-mp3="https://example.org/media/x__gb_9.mp3"></div>
            </div>
        "#;
        let extractor = Extractor::parse(html);
        let prons = extractor.pronunciations();

        assert_eq!(prons[1].prefix.as_deref(), Some("NAmE"));
    }

    #[test]
    fn test_references_from_header() {
        let extractor = load_fixture("word_content");
        let references = extractor.references();

        assert_eq!(references.len(), 1);
        assert_eq!(references[0].name, "table of contents");
        assert_eq!(references[0].id, "table-of-contents");
    }

    #[test]
    fn test_reference_id_is_final_path_segment() {
        let link = "https://www.oxfordlearnersdictionaries.com/definition/english/content2_3#heart_idmg_50";
        assert_eq!(extract_id(link), "content2_3#heart_idmg_50");
        assert_eq!(link.split('/').next_back().unwrap(), extract_id(link));
    }

    #[test]
    fn test_definition_full_namespaced_groups() {
        let extractor = load_fixture("word_content");
        let groups = extractor.definition_full();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].namespace.as_deref(), Some("what is in something"));
        assert_eq!(groups[0].senses.len(), 2);
        assert_eq!(
            groups[1].namespace.as_deref(),
            Some("of a book, website, etc.")
        );
        assert_eq!(groups[1].senses.len(), 1);

        let first = &groups[0].senses[0];
        assert_eq!(first.property.as_deref(), Some("[plural]"));
        assert_eq!(
            first.description.as_deref(),
            Some("the things that are contained in something")
        );
        assert_eq!(first.examples.len(), 2);
        assert_eq!(
            first.extra_examples,
            vec!["The drawer had spilled its contents.".to_string()]
        );

        let second = &groups[0].senses[1];
        assert_eq!(second.label.as_deref(), Some("(formal)"));
        assert_eq!(second.property, None);
    }

    #[test]
    fn test_definition_full_fallback_without_namespaces() {
        let html = r#"
            <ol class="senses_multiple">
              <li class="sense">
                <span class="def">first meaning</span>
                <ul class="examples"><li><span class="x">an example</span></li></ul>
              </li>
              <li class="sense"><span class="def">second meaning</span></li>
            </ol>
        "#;
        let extractor = Extractor::parse(html);
        let groups = extractor.definition_full();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].namespace.as_deref(), Some(GLOBAL_NAMESPACE));
        assert_eq!(groups[0].senses.len(), 2);
        assert_eq!(groups[0].senses[0].description.as_deref(), Some("first meaning"));
    }

    #[test]
    fn test_definition_full_single_sense_container() {
        let html = r#"
            <ol class="sense_single">
              <li class="sense">
                <span class="dis-g">(of people)</span>
                <span class="def">only meaning</span>
              </li>
            </ol>
        "#;
        let extractor = Extractor::parse(html);
        let groups = extractor.definition_full();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].namespace.as_deref(), Some(GLOBAL_NAMESPACE));
        assert_eq!(groups[0].senses.len(), 1);
        assert_eq!(groups[0].senses[0].refer.as_deref(), Some("(of people)"));
    }

    #[test]
    fn test_sense_without_description_is_pure_reference() {
        let html = r#"
            <ol class="sense_single">
              <li class="sense">
                <span class="xrefs">
                  <a href="https://www.oxfordlearnersdictionaries.com/definition/english/colour_1">colour</a>
                </span>
              </li>
            </ol>
        "#;
        let extractor = Extractor::parse(html);
        let sense = &extractor.definition_full()[0].senses[0];

        assert_eq!(sense.description, None);
        assert_eq!(sense.references.len(), 1);
        assert_eq!(sense.references[0].id, "colour_1");
        assert_eq!(sense.references[0].name, "colour");
    }

    #[test]
    fn test_flat_definitions_and_examples() {
        let extractor = load_fixture("word_content");

        let definitions = extractor.definitions();
        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[0], "the things that are contained in something");

        let examples = extractor.examples();
        assert_eq!(examples.len(), 4);
        assert_eq!(
            examples[0],
            "She tipped the contents of her bag onto the table."
        );
    }

    #[test]
    fn test_sanitization_removes_noise_boxes() {
        let extractor = load_fixture("word_content");

        // the fixture plants a bogus .def inside a Word Origin box and a
        // bogus .x inside a Collocations box; neither may leak through
        let groups = extractor.definition_full();
        for group in &groups {
            for sense in &group.senses {
                assert_ne!(sense.description.as_deref(), Some("bogus etymology"));
                assert!(!sense.examples.iter().any(|x| x == "bogus collocation"));
            }
        }
    }

    #[test]
    fn test_idioms_from_content_page() {
        let extractor = load_fixture("word_content");
        let idioms = extractor.idioms();

        assert_eq!(idioms.len(), 1);
        assert_eq!(idioms[0].name, "to your heart’s content");
        assert_eq!(idioms[0].summary.label.as_deref(), Some("(informal)"));
        assert_eq!(idioms[0].definitions.len(), 1);
        assert_eq!(
            idioms[0].definitions[0].description.as_deref(),
            Some("as much as you want")
        );
        assert_eq!(idioms[0].definitions[0].examples.len(), 1);
    }

    #[test]
    fn test_idiom_name_from_idm_l_wrapper() {
        let html = r#"
            <div class="idioms">
              <span class="idm-g">
                <span class="idm-l"><span class="idm">be at it</span><span class="idm">go at it</span></span>
                <li class="sense"><span class="def">to be doing something</span></li>
              </span>
            </div>
        "#;
        let extractor = Extractor::parse(html);
        let idioms = extractor.idioms();

        assert_eq!(idioms.len(), 1);
        assert_eq!(idioms[0].name, "be at itgo at it");
    }

    #[test]
    fn test_phrasal_verbs_and_verb_forms() {
        let extractor = load_fixture("word_paint");

        assert_eq!(extractor.wordform(), Some("verb".to_string()));
        assert_eq!(
            extractor.property_global(),
            Some("[transitive, intransitive]".to_string())
        );

        let phrasal_verbs = extractor.phrasal_verbs();
        assert_eq!(phrasal_verbs.len(), 2);
        assert_eq!(phrasal_verbs[0].name, "paint something out");
        assert_eq!(phrasal_verbs[0].id, "paint-out");
        assert_eq!(phrasal_verbs[1].id, "paint-over");

        let verb_forms = extractor.verb_forms();
        assert_eq!(verb_forms.len(), 4);

        let thirdps = &verb_forms["thirdps"];
        assert_eq!(thirdps.prefix.as_deref(), Some("he / she / it"));
        // the prefix span is stripped from the remaining cell text
        assert_eq!(thirdps.value, "paints");

        let root = &verb_forms["root"];
        assert_eq!(root.prefix.as_deref(), Some("I / you / we / they"));
        assert_eq!(root.value, "paint");
        assert_eq!(verb_forms["past"].value, "painted");
        assert_eq!(verb_forms["prespart"].value, "painting");
    }

    #[test]
    fn test_entry_verb_only_fields() {
        let noun = load_fixture("word_content").entry();
        assert!(noun.phrasal_verbs.is_none());
        assert!(noun.verb_forms.is_none());

        let verb = load_fixture("word_paint").entry();
        assert!(verb.phrasal_verbs.is_some());
        assert!(verb.verb_forms.is_some());

        let json = serde_json::to_value(&noun).unwrap();
        assert!(json.get("phrasal_verbs").is_none());
        assert!(json.get("verb_forms").is_none());
    }

    #[test]
    fn test_entry_drops_empty_property_and_other_results() {
        let verb = load_fixture("word_paint").entry();
        assert_eq!(verb.property.as_deref(), Some("[transitive, intransitive]"));
        // the paint fixture has no related-entries sidebar
        assert!(verb.other_results.is_none());

        let json = serde_json::to_value(&verb).unwrap();
        assert!(json.get("other_results").is_none());
    }

    #[test]
    fn test_other_results_groups_and_order() {
        let extractor = load_fixture("word_content");
        let groups = extractor.other_results();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].header, "All matches");
        assert_eq!(groups[0].results.len(), 17);
        assert_eq!(groups[1].header, "Idioms");
        assert_eq!(groups[1].results.len(), 1);

        let first = &groups[0].results[0];
        assert_eq!(first.name, "content");
        assert_eq!(first.id, "content2_1");
        assert_eq!(first.wordform.as_deref(), Some("adjective"));

        let farm = &groups[0].results[3];
        assert_eq!(farm.name, "content farm");
        assert_eq!(farm.id, "content-farm");
        assert_eq!(farm.wordform.as_deref(), Some("noun"));

        let idiom = &groups[1].results[0];
        assert_eq!(idiom.name, "to your heart’s content");
        assert_eq!(idiom.id, "content2_3#heart_idmg_50");
        assert_eq!(idiom.wordform, None);

        let last = groups[0].results.last().unwrap();
        assert_eq!(last.id, "content2_3#heart_idmg_50");
    }

    #[test]
    fn test_other_results_serialize_as_single_key_groups() {
        let extractor = load_fixture("word_content");
        let json = serde_json::to_value(extractor.other_results()).unwrap();

        let groups = json.as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].as_object().unwrap().len(), 1);
        assert_eq!(groups[0]["All matches"].as_array().unwrap().len(), 17);
        assert_eq!(groups[1].as_object().unwrap().len(), 1);
        assert_eq!(groups[1]["Idioms"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_other_results_drops_items_without_text() {
        let html = r#"
            <div id="rightcolumn"><div id="relatedentries">
              <dl>
                <dt>All matches</dt>
                <dd><ul>
                  <li><a href="/definition/english/real_1"><span>real</span></a></li>
                  <li><a href="/definition/english/ghost_1"><span>   </span></a></li>
                </ul></dd>
              </dl>
            </div></div>
        "#;
        let extractor = Extractor::parse(html);
        let groups = extractor.other_results();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].results.len(), 1);
        assert_eq!(groups[0].results[0].name, "real");
    }

    #[test]
    fn test_missing_regions_yield_absent_fields() {
        let extractor = Extractor::parse("<html><body><p>nothing here</p></body></html>");

        assert_eq!(extractor.id(), None);
        assert_eq!(extractor.name(), None);
        assert_eq!(extractor.wordform(), None);
        assert_eq!(extractor.property_global(), None);
        assert!(extractor.references().is_empty());
        assert!(extractor.idioms().is_empty());
        assert!(extractor.phrasal_verbs().is_empty());
        assert!(extractor.verb_forms().is_empty());
        assert!(extractor.other_results().is_empty());

        // still a well-formed record: one empty global group, two empty
        // pronunciation slots
        let entry = extractor.entry();
        assert_eq!(entry.definitions.len(), 1);
        assert!(entry.definitions[0].senses.is_empty());
        assert_eq!(entry.pronunciations.len(), 2);
        assert_eq!(entry.pronunciations[0], Pronunciation::default());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = load_fixture("word_content");

        assert_eq!(extractor.name(), extractor.name());
        assert_eq!(extractor.definition_full(), extractor.definition_full());
        assert_eq!(extractor.idioms(), extractor.idioms());
        assert_eq!(extractor.entry(), extractor.entry());
    }

    #[test]
    fn test_id_stable_across_reparses() {
        let html = fs::read_to_string("fixtures/word_content").unwrap();
        let first = Extractor::parse(&html).id();
        let second = Extractor::parse(&html).id();

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_match_detection() {
        let extractor = load_fixture("no_exact_match");
        assert!(extractor.is_no_match());

        let extractor = load_fixture("word_content");
        assert!(!extractor.is_no_match());
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = load_fixture("word_content").entry();
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, back);
    }
}
