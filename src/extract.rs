//! Best-effort record extraction over parsed pages.
//!
//! A page is a list of item nodes (table rows, listing cards). Each item is
//! turned into at most one record by an [`ExtractionPlan`]:
//!
//! 1. The plan's [`RequiredPolicy`] decides whether the item is worth
//!    looking at at all.
//! 2. Every [`FieldRule`] is evaluated on its own. A [`Locator`] that loses
//!    its way yields `None` for that field and the other fields still run.
//! 3. The record only materializes when all fields resolved.
//!
//! Nothing in here returns an error. Markup on the source site drifts, so a
//! miss is logged at the plan's severity and the item is dropped.

use crate::models::Fields;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{Level, debug, error, info, instrument, trace, warn};

/// A chain of CSS selectors walked from an item node.
///
/// Each step picks the first descendant of the previous node that matches.
#[derive(Debug, Clone)]
pub struct Locator {
    path: String,
    steps: Vec<Selector>,
}

impl Locator {
    /// Compile a locator from its selector steps, outermost first.
    pub fn new(steps: &[&str]) -> Result<Self, Box<dyn Error>> {
        if steps.is_empty() {
            return Err("locator needs at least one step".into());
        }
        let compiled = steps
            .iter()
            .map(|step| {
                Selector::parse(step).map_err(|e| format!("invalid selector {step:?}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            path: steps.join(" > "),
            steps: compiled,
        })
    }

    /// Human-readable form used in diagnostics.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Walk the chain starting at `node`.
    pub fn find<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.steps
            .iter()
            .try_fold(node, |current, step| current.select(step).next())
    }

    /// Text content of the node the chain ends on.
    pub fn text(&self, node: ElementRef<'_>) -> Option<String> {
        self.find(node).map(|el| el.text().collect::<String>())
    }
}

/// Text clean-up applied to a located value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Trim surrounding whitespace.
    Trim,
    /// Trim, then strip enclosing parentheses: `"(1994)"` becomes `"1994"`.
    StripParens,
}

impl Normalize {
    /// Returns `None` when nothing is left after clean-up.
    pub fn apply(self, raw: &str) -> Option<String> {
        let value = match self {
            Normalize::Trim => raw.trim(),
            Normalize::StripParens => raw.trim().trim_matches(['(', ')']).trim(),
        };
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// One named column of a record and how to find it.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub locator: Locator,
    pub normalize: Normalize,
}

impl FieldRule {
    /// Build a rule for the column `name`.
    ///
    /// # Arguments
    ///
    /// * `name` - Column name the value is stored under
    /// * `steps` - Selector chain, outermost first (see [`Locator::new`])
    /// * `normalize` - Clean-up applied to the located text
    ///
    /// # Returns
    ///
    /// The rule, or an error if any selector step fails to compile.
    pub fn new(
        name: &'static str,
        steps: &[&str],
        normalize: Normalize,
    ) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            name,
            locator: Locator::new(steps)?,
            normalize,
        })
    }

    /// Locate and normalize this field. Any failed step is `None`.
    pub fn resolve(&self, item: ElementRef<'_>) -> Option<String> {
        self.locator
            .text(item)
            .and_then(|raw| self.normalize.apply(&raw))
    }
}

/// What an item must have before it can become a record.
#[derive(Debug, Clone)]
pub enum RequiredPolicy {
    /// Every field rule must resolve.
    AllFields,
    /// Every container must exist before any field lookup runs; then every
    /// field rule must resolve.
    Containers(Vec<Locator>),
}

/// Everything needed to turn one page into records of one variant.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    /// Variant name for diagnostics.
    pub variant: &'static str,
    /// Matches the candidate item nodes on a page.
    pub item: Selector,
    pub fields: Vec<FieldRule>,
    pub policy: RequiredPolicy,
    /// Severity of per-item miss diagnostics.
    pub miss_level: Level,
}

impl ExtractionPlan {
    /// Rows of the Top 250 chart table.
    ///
    /// Header rows never carry the columns, so they show up as misses.
    pub fn top_chart() -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            variant: "top_chart",
            item: Selector::parse("tr").map_err(|e| format!("invalid item selector: {e}"))?,
            fields: vec![
                FieldRule::new("title", &["td.titleColumn", "a"], Normalize::Trim)?,
                FieldRule::new("year", &["td.titleColumn", "span"], Normalize::StripParens)?,
                FieldRule::new(
                    "rating",
                    &["td.ratingColumn.imdbRating", "strong"],
                    Normalize::Trim,
                )?,
            ],
            policy: RequiredPolicy::AllFields,
            miss_level: Level::ERROR,
        })
    }

    /// Listing cards of the advanced title search.
    pub fn genre_search() -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            variant: "genre_search",
            item: Selector::parse("div.lister-item")
                .map_err(|e| format!("invalid item selector: {e}"))?,
            fields: vec![
                FieldRule::new("title", &["h3.lister-item-header", "a"], Normalize::Trim)?,
                FieldRule::new("rating", &["div.ratings-bar", "strong"], Normalize::Trim)?,
            ],
            policy: RequiredPolicy::Containers(vec![
                Locator::new(&["h3.lister-item-header"])?,
                Locator::new(&["div.ratings-bar"])?,
            ]),
            miss_level: Level::DEBUG,
        })
    }
}

/// Emit a miss diagnostic at `level`.
fn log_miss(level: Level, variant: &str, index: usize, detail: &str, message: &str) {
    if level == Level::ERROR {
        error!(variant, index, detail, "{message}");
    } else if level == Level::WARN {
        warn!(variant, index, detail, "{message}");
    } else if level == Level::INFO {
        info!(variant, index, detail, "{message}");
    } else if level == Level::DEBUG {
        debug!(variant, index, detail, "{message}");
    } else {
        trace!(variant, index, detail, "{message}");
    }
}

/// Turn one item node into a full set of fields, or nothing.
///
/// `index` is the item's position on the page, used only for diagnostics.
pub fn extract_record(item: ElementRef<'_>, index: usize, plan: &ExtractionPlan) -> Option<Fields> {
    if let RequiredPolicy::Containers(containers) = &plan.policy {
        if let Some(absent) = containers.iter().find(|c| c.find(item).is_none()) {
            log_miss(
                plan.miss_level,
                plan.variant,
                index,
                absent.path(),
                "Item lacks a required container; skipping",
            );
            return None;
        }
    }

    let mut fields = Fields::new();
    let mut missing = Vec::new();
    for rule in &plan.fields {
        match rule.resolve(item) {
            Some(value) => fields.insert(rule.name, value),
            None => missing.push(rule.name),
        }
    }

    if !missing.is_empty() {
        log_miss(
            plan.miss_level,
            plan.variant,
            index,
            &missing.join(","),
            "Item missing required fields; skipping",
        );
        return None;
    }
    debug!(
        variant = plan.variant,
        index,
        title = fields.get("title").unwrap_or_default(),
        fields = fields.len(),
        "Extracted item"
    );
    Some(fields)
}

/// Extract records from at most `cap` item nodes, in document order.
///
/// `build` turns a complete field set into the variant's record. Items that
/// fail extraction or building are skipped; the batch itself never fails.
#[instrument(level = "debug", skip_all, fields(variant = plan.variant, cap = cap))]
pub fn collect_batch<T, F>(
    document: &Html,
    plan: &ExtractionPlan,
    cap: usize,
    mut build: F,
) -> Vec<T>
where
    F: FnMut(Fields) -> Option<T>,
{
    let mut batch = Vec::new();
    let mut visited = 0usize;

    for (index, item) in document.select(&plan.item).take(cap).enumerate() {
        visited += 1;
        if let Some(record) = extract_record(item, index, plan).and_then(&mut build) {
            batch.push(record);
        }
    }

    info!(
        variant = plan.variant,
        collected = batch.len(),
        skipped = visited - batch.len(),
        visited,
        "Collected batch"
    );
    batch
}
