//! Cultural-tradition labeling and batch assignment.
//!
//! Labeling is heuristic and sits outside the pipeline's correctness
//! contract; the round validator only reads the resulting
//! `cultural_tradition` strings. Swap the labeler by implementing
//! [`TraditionLabeler`].

use crate::domain::models::{field_text, Entry, LabelReport, StagingStatus, TraditionCounts};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tradition {
    NonWestern,
    Western,
    Unknown,
}

impl Tradition {
    pub fn as_str(self) -> &'static str {
        match self {
            Tradition::NonWestern => "Non-Western",
            Tradition::Western => "Western",
            Tradition::Unknown => "Unknown",
        }
    }
}

pub trait TraditionLabeler {
    fn label(&self, entry: &Entry) -> Tradition;
}

/// Keyword and authority-name indicators for one tradition.
#[derive(Debug, Clone)]
pub struct Indicators {
    pub keywords: Vec<String>,
    pub authorities: Vec<String>,
    pub domain_terms: Vec<String>,
}

impl Indicators {
    fn from_static(keywords: &[&str], authorities: &[&str], domain_terms: &[&str]) -> Self {
        let lower = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_lowercase()).collect() };
        Self {
            keywords: lower(keywords),
            authorities: lower(authorities),
            domain_terms: lower(domain_terms),
        }
    }

    fn content_score(&self, text: &str, authority: &str) -> u32 {
        let kw = self.keywords.iter().filter(|k| text.contains(k.as_str())).count();
        let auth = self
            .authorities
            .iter()
            .filter(|a| authority.contains(a.as_str()))
            .count();
        (kw + 2 * auth) as u32
    }

    fn domain_hit(&self, domain: &str) -> bool {
        self.domain_terms.iter().any(|t| domain.contains(t.as_str()))
    }
}

/// Scores entry text against two indicator sets.
///
/// +1 per keyword found in claim, reason, example, authority or domain; +2 per
/// authority name found in the citation; +1 for a domain term, non-western
/// terms checked first. Equal scores yield [`Tradition::Unknown`].
#[derive(Debug, Clone)]
pub struct KeywordLabeler {
    non_western: Indicators,
    western: Indicators,
}

impl KeywordLabeler {
    pub fn new(non_western: Indicators, western: Indicators) -> Self {
        Self {
            non_western,
            western,
        }
    }
}

impl Default for KeywordLabeler {
    fn default() -> Self {
        Self::new(
            Indicators::from_static(
                &[
                    "Pāṇini", "Sanskrit", "Aṣṭādhyāyī", "sūtra", "kāraka", "samāsa", "Islamic",
                    "Al-Ghazali", "Sufism", "Chinese", "Confucian", "ren", "li", "Hindu",
                    "Buddhist", "Vedic", "dharma", "karma", "moksha", "Taoism", "Zen",
                    "Madhyamaka", "Advaita",
                ],
                &[
                    "Pāṇinian Grammar",
                    "Islamic Philosophy",
                    "Chinese Philosophy",
                    "Hindu Philosophy",
                    "Buddhist Philosophy",
                    "Comparative Method",
                ],
                &["sanskrit", "pāṇinian", "islamic", "chinese"],
            ),
            Indicators::from_static(
                &[
                    "Aristotelian", "Kantian", "Cartesian", "Thomistic", "Platonic", "analytical",
                    "phenomenology", "existentialism", "pragmatism", "logical positivism",
                    "speech acts", "Austin", "Searle",
                ],
                &[
                    "Stanford Encyclopedia",
                    "Contemporary Philosophy",
                    "Western Philosophy",
                    "Analytic Philosophy",
                    "Continental Philosophy",
                ],
                &["western", "analytic", "continental"],
            ),
        )
    }
}

impl TraditionLabeler for KeywordLabeler {
    fn label(&self, entry: &Entry) -> Tradition {
        let text = ["pratijna", "hetu", "udaharana", "grounding_authority", "domain"]
            .iter()
            .map(|k| field_text(entry, k))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let authority = field_text(entry, "grounding_authority").to_lowercase();
        let domain = field_text(entry, "domain").to_lowercase();

        let mut nw = self.non_western.content_score(&text, &authority);
        let mut w = self.western.content_score(&text, &authority);
        if self.non_western.domain_hit(&domain) {
            nw += 1;
        } else if self.western.domain_hit(&domain) {
            w += 1;
        }

        match nw.cmp(&w) {
            std::cmp::Ordering::Greater => Tradition::NonWestern,
            std::cmp::Ordering::Less => Tradition::Western,
            std::cmp::Ordering::Equal => Tradition::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchCategory {
    Sanskrit,
    Philosophy,
    Linguistic,
    Comparative,
    Theoretical,
    General,
}

pub fn categorize_domain(domain: &str) -> BatchCategory {
    let d = domain.to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| d.contains(t));
    if any(&["sanskrit", "pāṇinian", "grammar"]) {
        BatchCategory::Sanskrit
    } else if any(&["philosophy", "epistemology", "metaphysics"]) {
        BatchCategory::Philosophy
    } else if any(&["linguistic", "philology", "language"]) {
        BatchCategory::Linguistic
    } else if any(&["comparative", "cultural", "cross-cultural"]) {
        BatchCategory::Comparative
    } else if any(&["theory", "model", "sociological"]) {
        BatchCategory::Theoretical
    } else {
        BatchCategory::General
    }
}

pub fn batch_id(category: BatchCategory, date: chrono::NaiveDate) -> String {
    let prefix = match category {
        BatchCategory::Sanskrit => "sanskrit_grammar",
        BatchCategory::Philosophy => "philosophy_expansion",
        BatchCategory::Linguistic => "linguistic_analysis",
        BatchCategory::Comparative => "comparative_studies",
        BatchCategory::Theoretical => "theoretical_frameworks",
        BatchCategory::General => "general_syllogisms",
    };
    format!("{}_{}", prefix, date.format("%Y%m%d"))
}

fn is_unclassified(entry: &Entry) -> bool {
    let t = field_text(entry, "cultural_tradition");
    let t = t.trim();
    t.is_empty() || t == Tradition::Unknown.as_str()
}

fn is_unbatched(entry: &Entry) -> bool {
    let b = field_text(entry, "batch_id");
    let b = b.trim();
    b.is_empty() || b == "None"
}

/// Fill missing traditions and batch ids in place.
pub fn label_entries(
    target: &str,
    entries: &mut [Entry],
    labeler: &dyn TraditionLabeler,
    date: chrono::NaiveDate,
) -> LabelReport {
    let mut classified = 0;
    let mut batched = 0;
    let mut batch_assignments = BTreeMap::new();
    let mut distribution = TraditionCounts::default();

    for e in entries.iter_mut() {
        if is_unclassified(e) {
            let t = labeler.label(e);
            e.insert("cultural_tradition".into(), Value::String(t.as_str().into()));
            classified += 1;
            tracing::debug!(id = %field_text(e, "id"), tradition = t.as_str(), "classified");
        }
        if is_unbatched(e) {
            let id = batch_id(categorize_domain(&field_text(e, "domain")), date);
            *batch_assignments.entry(id.clone()).or_insert(0) += 1;
            e.insert("batch_id".into(), Value::String(id));
            batched += 1;
        }
        match field_text(e, "cultural_tradition").as_str() {
            "Non-Western" => distribution.non_western += 1,
            "Western" => distribution.western += 1,
            "Unknown" => distribution.unknown += 1,
            _ => distribution.other += 1,
        }
    }

    LabelReport {
        target: target.to_string(),
        total: entries.len(),
        classified,
        batched,
        distribution,
        batch_assignments,
    }
}

pub fn staging_status(file: &str, entries: &[Entry]) -> StagingStatus {
    StagingStatus {
        file: file.to_string(),
        total: entries.len(),
        unclassified: entries.iter().filter(|e| is_unclassified(e)).count(),
        unbatched: entries.iter().filter(|e| is_unbatched(e)).count(),
    }
}
