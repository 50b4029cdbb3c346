//! Batch drivers over the stores.
//!
//! Every driver keeps going past per-record problems and reports them as
//! counts at the end of the run instead of aborting the batch.

use litscope_core::{AuthorStore, Gender, PaperStore};
use tracing::{info, warn};

use crate::aggregate::{AuthorAggregator, PaperOutcome};
use crate::error::Result;
use crate::hindex::compute_h_index;
use crate::providers::{CountryResolver, GenderProvider};

/// Outcome counts for one attribution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributionSummary {
    pub papers_seen: usize,
    pub papers_attributed: usize,
    pub papers_skipped: usize,
    pub papers_failed: usize,
    pub authors_created: u32,
    pub authors_updated: u32,
    pub already_attributed: u32,
}

/// Outcome counts for one provider-backed enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub records_seen: usize,
    pub records_enriched: usize,
    pub lookups_failed: usize,
}

/// Attribute every scannable paper to its authors.
///
/// A store failure on one paper is logged and counted; that paper's
/// attribution is considered not-yet-done and safe to retry on a later run.
pub fn attribute_papers<P, A>(papers: &P, authors: &A) -> Result<AttributionSummary>
where
    P: PaperStore,
    A: AuthorStore,
{
    let aggregator = AuthorAggregator::new(authors);
    let mut summary = AttributionSummary::default();

    for paper in papers.scan_papers()? {
        summary.papers_seen += 1;
        match aggregator.attribute_paper(&paper) {
            Ok(PaperOutcome::Attributed(counts)) => {
                summary.papers_attributed += 1;
                summary.authors_created += counts.created;
                summary.authors_updated += counts.updated;
                summary.already_attributed += counts.already_attributed;
            }
            Ok(PaperOutcome::Skipped(_)) => {
                summary.papers_skipped += 1;
            }
            Err(err) => {
                warn!(doi = %paper.doi, error = %err, "attribution failed, paper left for retry");
                summary.papers_failed += 1;
            }
        }
    }

    info!(
        seen = summary.papers_seen,
        attributed = summary.papers_attributed,
        skipped = summary.papers_skipped,
        failed = summary.papers_failed,
        "attribution run finished"
    );
    Ok(summary)
}

/// Recompute the h-index of every live author; writes only where the value
/// changed.
pub fn refresh_h_indexes<A: AuthorStore>(authors: &A) -> Result<usize> {
    let mut updated = 0;
    for mut author in authors.scan_authors()? {
        let h_index = compute_h_index(&author.citations, author.papers_with_citations);
        if h_index != author.h_index {
            let name = author.name.clone();
            author.h_index = h_index;
            author.touch();
            authors.update_author(&name, &author)?;
            updated += 1;
        }
    }
    info!(updated, "h-index refresh finished");
    Ok(updated)
}

/// Infer genders for papers whose author list is resolved but whose gender
/// list is missing or the wrong length. A provider failure for one name
/// falls back to `Unknown` and is counted; it is never stored as an error
/// label.
pub async fn enrich_genders<P: PaperStore>(
    papers: &P,
    provider: &dyn GenderProvider,
) -> Result<EnrichmentSummary> {
    let mut summary = EnrichmentSummary::default();

    for mut paper in papers.scan_papers()? {
        let Some(names) = paper.authors.clone().filter(|a| !a.is_empty()) else {
            continue;
        };
        if paper
            .authors_gender
            .as_ref()
            .is_some_and(|g| g.len() == names.len())
        {
            continue;
        }
        summary.records_seen += 1;

        let mut genders = Vec::with_capacity(names.len());
        for name in &names {
            let gender = match provider.infer(name).await {
                Ok(gender) => gender,
                Err(err) => {
                    warn!(name = %name, error = %err, "gender inference failed, using unknown");
                    summary.lookups_failed += 1;
                    Gender::Unknown
                }
            };
            genders.push(gender);
        }

        paper.authors_gender = Some(genders);
        paper.touch();
        let doi = paper.doi.clone();
        papers.update_paper(&doi, &paper)?;
        summary.records_enriched += 1;
    }

    info!(
        enriched = summary.records_enriched,
        failed_lookups = summary.lookups_failed,
        "gender enrichment finished"
    );
    Ok(summary)
}

/// Resolve each author's affiliations to countries and union them into the
/// record. Unresolvable affiliations are skipped; failures are counted.
pub async fn enrich_countries<A: AuthorStore>(
    authors: &A,
    resolver: &dyn CountryResolver,
) -> Result<EnrichmentSummary> {
    let mut summary = EnrichmentSummary::default();

    for mut author in authors.scan_authors()? {
        if author.affiliations.is_empty() {
            continue;
        }
        summary.records_seen += 1;

        let mut changed = false;
        for affiliation in author.affiliations.clone() {
            match resolver.resolve(&affiliation).await {
                Ok(Some(country)) => {
                    changed |= author.countries.insert(country);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        author = %author.name,
                        affiliation = %affiliation,
                        error = %err,
                        "country lookup failed"
                    );
                    summary.lookups_failed += 1;
                }
            }
        }

        if changed {
            let name = author.name.clone();
            author.touch();
            authors.update_author(&name, &author)?;
            summary.records_enriched += 1;
        }
    }

    info!(
        enriched = summary.records_enriched,
        failed_lookups = summary.lookups_failed,
        "country enrichment finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use litscope_core::{AuthorRecord, MemoryStore, PaperRecord};

    use crate::error::CurationError;
    use crate::resolve::IdentityResolver;

    use super::*;

    fn paper(doi: &str, citations: u32, authors: &[&str], genders: &[Gender]) -> PaperRecord {
        let mut p = PaperRecord::new(doi, format!("Paper {doi}"));
        p.citations = citations;
        p.authors = Some(authors.iter().map(|s| s.to_string()).collect());
        p.authors_gender = Some(genders.to_vec());
        p
    }

    struct FixedGender(Gender);

    #[async_trait]
    impl GenderProvider for FixedGender {
        async fn infer(&self, _full_name: &str) -> crate::error::Result<Gender> {
            Ok(self.0)
        }
    }

    struct FailingGender;

    #[async_trait]
    impl GenderProvider for FailingGender {
        async fn infer(&self, _full_name: &str) -> crate::error::Result<Gender> {
            Err(CurationError::Api("gender".into(), "boom".into()))
        }
    }

    struct FixedCountry(&'static str);

    #[async_trait]
    impl CountryResolver for FixedCountry {
        async fn resolve(&self, _affiliation: &str) -> crate::error::Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[test]
    fn attribution_run_counts_outcomes() {
        let store = MemoryStore::new();
        store
            .create_paper(&paper("10.1/a", 3, &["Ana Reyes", "Li Wei"], &[Gender::Female, Gender::Male]))
            .unwrap();
        store
            .create_paper(&paper("10.1/b", 0, &["Ana Reyes"], &[Gender::Female]))
            .unwrap();
        store.create_paper(&PaperRecord::new("10.1/c", "No authors")).unwrap();

        let summary = attribute_papers(&store, &store).unwrap();
        assert_eq!(summary.papers_seen, 3);
        assert_eq!(summary.papers_attributed, 2);
        assert_eq!(summary.papers_skipped, 1);
        assert_eq!(summary.papers_failed, 0);
        assert_eq!(summary.authors_created, 2);
        assert_eq!(summary.authors_updated, 1);

        // a second run changes nothing
        let rerun = attribute_papers(&store, &store).unwrap();
        assert_eq!(rerun.authors_created, 0);
        assert_eq!(rerun.authors_updated, 0);
        assert_eq!(rerun.already_attributed, 3);

        let ana = store.find_author("Ana Reyes").unwrap().unwrap();
        ana.check_invariants();
        assert_eq!(ana.papers, 2);
    }

    #[test]
    fn h_index_refresh_updates_stale_records() {
        let store = MemoryStore::new();
        let mut author = AuthorRecord::new("Ana Reyes", Gender::Female);
        author.dois = vec!["d1".into(), "d2".into()];
        author.citations = vec![5, 3];
        author.papers = 2;
        author.total_citations = 8;
        author.papers_with_citations = 2;
        author.h_index = 0; // stale
        store.create_author(&author).unwrap();

        assert_eq!(refresh_h_indexes(&store).unwrap(), 1);
        assert_eq!(store.find_author("Ana Reyes").unwrap().unwrap().h_index, 2);
        // already fresh: no write
        assert_eq!(refresh_h_indexes(&store).unwrap(), 0);
    }

    #[tokio::test]
    async fn gender_enrichment_fills_missing_lists() {
        let store = MemoryStore::new();
        let mut p = PaperRecord::new("10.1/a", "Needs genders");
        p.authors = Some(vec!["Ana Reyes".to_string(), "Li Wei".to_string()]);
        store.create_paper(&p).unwrap();

        let summary = enrich_genders(&store, &FixedGender(Gender::Female)).await.unwrap();
        assert_eq!(summary.records_enriched, 1);

        let stored = store.find_paper("10.1/a").unwrap().unwrap();
        assert_eq!(
            stored.authors_gender,
            Some(vec![Gender::Female, Gender::Female])
        );

        // already enriched: untouched on the next run
        let rerun = enrich_genders(&store, &FixedGender(Gender::Male)).await.unwrap();
        assert_eq!(rerun.records_seen, 0);
    }

    #[tokio::test]
    async fn provider_failure_stores_unknown_not_error() {
        let store = MemoryStore::new();
        let mut p = PaperRecord::new("10.1/a", "Needs genders");
        p.authors = Some(vec!["Ana Reyes".to_string()]);
        store.create_paper(&p).unwrap();

        let summary = enrich_genders(&store, &FailingGender).await.unwrap();
        assert_eq!(summary.lookups_failed, 1);
        assert_eq!(summary.records_enriched, 1);

        let stored = store.find_paper("10.1/a").unwrap().unwrap();
        assert_eq!(stored.authors_gender, Some(vec![Gender::Unknown]));
    }

    #[tokio::test]
    async fn country_enrichment_unions_resolved_countries() {
        let store = MemoryStore::new();
        let mut author = AuthorRecord::new("Ana Reyes", Gender::Female);
        author.affiliations.insert("universitat de barcelona".to_string());
        store.create_author(&author).unwrap();

        let summary = enrich_countries(&store, &FixedCountry("Spain")).await.unwrap();
        assert_eq!(summary.records_enriched, 1);
        let stored = store.find_author("Ana Reyes").unwrap().unwrap();
        assert!(stored.countries.contains("Spain"));

        // idempotent: the country is already present, so no write happens
        let rerun = enrich_countries(&store, &FixedCountry("Spain")).await.unwrap();
        assert_eq!(rerun.records_enriched, 0);
    }

    #[test]
    fn attribute_then_merge_then_reattribute() {
        let store = MemoryStore::new();
        store
            .create_paper(&paper("10.1/a", 3, &["Ana M Reyes"], &[Gender::Female]))
            .unwrap();
        store
            .create_paper(&paper("10.1/b", 5, &["Ana Maria Reyes"], &[Gender::Female]))
            .unwrap();
        attribute_papers(&store, &store).unwrap();
        assert_eq!(store.count_authors().unwrap(), 2);

        let resolver = IdentityResolver::default();
        let authors = store.scan_authors().unwrap();
        let candidates = resolver.find_duplicate_candidates(&authors);
        assert_eq!(candidates.len(), 1);

        let merged = resolver
            .merge(&store, &candidates[0].left, &candidates[0].right)
            .unwrap();
        merged.check_invariants();
        assert_eq!(merged.papers, 2);
        assert_eq!(store.count_authors().unwrap(), 1);

        // a new paper under the absorbed spelling lands on the survivor
        store
            .create_paper(&paper("10.1/c", 1, &["Ana Maria Reyes"], &[Gender::Female]))
            .unwrap();
        attribute_papers(&store, &store).unwrap();

        let survivor = store.find_author(&merged.name).unwrap().unwrap();
        survivor.check_invariants();
        assert_eq!(survivor.papers, 3);
        assert_eq!(store.count_authors().unwrap(), 1);
    }
}
