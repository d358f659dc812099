//! Metadata extraction from page markup.
//!
//! Extraction runs an ordered [`RuleSet`]: a list of bundles, each holding
//! per-field rules. For a given field the rules of every applicable bundle are
//! tried in order and the first non-empty value wins, so bundles appended later
//! fill in whatever the earlier ones could not find.

pub mod overrides;
pub mod rules;
pub mod youtube;

use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// The fields a rule can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Image,
    Logo,
    Lang,
    Publisher,
    Author,
    Date,
    Url,
}

/// What a rule gets to look at: the parsed document and the page URL
/// (post-redirect).
pub struct Context<'a> {
    pub document: &'a Html,
    pub url: &'a Url,
}

pub type Rule = Box<dyn Fn(&Context<'_>) -> Option<String> + Send + Sync>;

/// A group of rules, optionally gated on the page URL.
pub struct Bundle {
    test: Option<fn(&Url) -> bool>,
    rules: Vec<(Field, Rule)>,
}

impl Bundle {
    pub fn new() -> Self {
        Bundle {
            test: None,
            rules: Vec::new(),
        }
    }

    /// Only apply this bundle to pages whose URL passes `test`.
    pub fn only_for(mut self, test: fn(&Url) -> bool) -> Self {
        self.test = Some(test);
        self
    }

    pub fn rule(mut self, field: Field, rule: Rule) -> Self {
        self.rules.push((field, rule));
        self
    }

    fn applies_to(&self, url: &Url) -> bool {
        self.test.map_or(true, |test| test(url))
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Bundle::new()
    }
}

#[derive(Default)]
pub struct RuleSet {
    bundles: Vec<Bundle>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    pub fn with(mut self, bundle: Bundle) -> Self {
        self.bundles.push(bundle);
        self
    }

    fn value_for(&self, field: Field, ctx: &Context<'_>) -> Option<String> {
        self.bundles
            .iter()
            .filter(|b| b.applies_to(ctx.url))
            .flat_map(|b| b.rules.iter())
            .filter(|(f, _)| *f == field)
            .find_map(|(_, rule)| rule(ctx).filter(|v| !v.is_empty()))
    }
}

/// Raw extraction output. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub logo: Option<String>,
    pub lang: Option<String>,
    pub publisher: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

pub struct Extractor {
    rules: RuleSet,
}

impl Extractor {
    pub fn new(rules: RuleSet) -> Self {
        Extractor { rules }
    }

    /// Parse `html` served from `page_url` and run every field through the
    /// rule set. Never fails; an unparseable `page_url` yields empty metadata.
    pub fn extract(&self, html: &str, page_url: &str) -> ExtractedMetadata {
        let Ok(url) = Url::parse(page_url) else {
            tracing::warn!(%page_url, "Skipping extraction for unparseable page URL");
            return ExtractedMetadata::default();
        };
        let document = Html::parse_document(html);
        let ctx = Context {
            document: &document,
            url: &url,
        };
        let get = |field| self.rules.value_for(field, &ctx);

        ExtractedMetadata {
            title: get(Field::Title),
            description: get(Field::Description),
            image: get(Field::Image),
            logo: get(Field::Logo),
            lang: get(Field::Lang),
            publisher: get(Field::Publisher),
            author: get(Field::Author),
            date: get(Field::Date),
            url: get(Field::Url),
        }
    }
}

impl Default for Extractor {
    /// Base rules, then YouTube, then this service's overrides (language and
    /// favicon logo fallback).
    fn default() -> Self {
        let mut rules = RuleSet::new();
        for bundle in rules::base_bundles() {
            rules = rules.with(bundle);
        }
        Extractor::new(
            rules
                .with(youtube::bundle())
                .with(overrides::bundle()),
        )
    }
}
