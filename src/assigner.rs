//! Drives product records through the matcher and canonical resolver.

use crate::canonical::resolve_canonical;
use crate::graph::BrandRelationshipMap;
use crate::matcher::{prioritize_view, BrandMatcher, BrandPattern};
use crate::model::{AssignedRecord, MatchError, MatchResult, ProductRecord};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Brand patterns compiled once per session, in graph scan order.
pub struct BrandCatalog {
    matcher: BrandMatcher,
    patterns: Vec<BrandPattern>,
}

impl BrandCatalog {
    pub fn new(matcher: BrandMatcher, graph: &BrandRelationshipMap) -> Result<Self, MatchError> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::new();
        // Later occurrences of a name can never add a match the first one missed.
        for alias in graph.aliases() {
            if seen.insert(alias.to_lowercase()) {
                patterns.push(matcher.compile(alias)?);
            }
        }
        Ok(Self { matcher, patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Accepted brands for one title, deduplicated and prioritized.
    pub fn match_title(&self, title: &str) -> Vec<String> {
        let view = self.matcher.view(title);
        // Patterns are already unique per lowercase name, so matches are too.
        let mut matched: Vec<String> = self
            .patterns
            .iter()
            .filter(|p| p.matches(&view))
            .map(|p| p.brand().to_string())
            .collect();
        prioritize_view(&view, &mut matched);
        matched
    }
}

#[derive(Debug, Default)]
pub struct Assignment {
    pub results: Vec<AssignedRecord>,
    pub errors: Vec<MatchError>,
    pub processed: usize,
    pub skipped: usize,
    pub matched: usize,
    pub unmatched: usize,
}

pub fn assign_record(
    record: &ProductRecord,
    catalog: &BrandCatalog,
    graph: &BrandRelationshipMap,
) -> Result<AssignedRecord, MatchError> {
    let title = match record.title.as_deref() {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            return Err(MatchError::InvalidRecord {
                source_id: record.source_id.clone(),
                reason: "missing title".into(),
            });
        }
    };

    let matched_brands = catalog.match_title(title);
    let canonical_brand = matched_brands
        .first()
        .map(|brand| resolve_canonical(brand, graph));

    debug!(
        "{} -> {:?} -> canonical: {:?}",
        title, matched_brands, canonical_brand
    );

    Ok(AssignedRecord {
        source_id: record.source_id.clone(),
        result: MatchResult {
            matched_brands,
            canonical_brand,
        },
    })
}

/// Runs every record through the engine. Already-mapped records produce no
/// result; records that cannot be matched are reported in `errors`.
pub fn assign_brands(
    records: &[ProductRecord],
    catalog: &BrandCatalog,
    graph: &BrandRelationshipMap,
) -> Assignment {
    let mut out = Assignment::default();

    for record in records {
        if record.already_mapped {
            debug!("Already mapped: {}", record.source_id);
            out.skipped += 1;
            continue;
        }
        out.processed += 1;

        match assign_record(record, catalog, graph) {
            Ok(assigned) => {
                if assigned.result.canonical_brand.is_some() {
                    out.matched += 1;
                } else {
                    out.unmatched += 1;
                }
                out.results.push(assigned);
            }
            Err(e) => {
                warn!("Skipping record: {}", e);
                out.errors.push(e);
            }
        }
    }

    out
}
