use crate::domain::models::{field_text, Entry};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichOptions {
    pub tag_non_western: bool,
    pub add_urls: bool,
}

fn has_url(s: &str) -> bool {
    s.contains("http://") || s.contains("https://")
}

/// Default citation for an entry whose grounding authority carries no URL.
pub fn default_citation(domain: &str, accessed: &str) -> String {
    let d = domain.to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| d.contains(t));
    if any(&["pāṇini", "panini", "sanskrit", "pāṇinian", "philology"]) {
        format!(
            "Sanskrit Grammar / Aṣṭādhyāyī (Pāṇini), https://ashtadhyayi.com/ (accessed {})",
            accessed
        )
    } else if any(&[
        "hanuman",
        "chalisa",
        "indology",
        "awadhi",
        "comparative philosophy",
        "epistemology",
    ]) {
        format!(
            "Indology / Hanuman Chalisa (Wikipedia), https://en.wikipedia.org/wiki/Hanuman_Chalisa (accessed {})",
            accessed
        )
    } else {
        format!(
            "Reference / Wikipedia, https://en.wikipedia.org/ (accessed {})",
            accessed
        )
    }
}

/// Enrich entries in place; returns how many changed.
pub fn enrich_entries(entries: &mut [Entry], opts: EnrichOptions, accessed: &str) -> usize {
    let mut changed = 0;
    for e in entries.iter_mut() {
        let mut updated = false;
        if opts.tag_non_western && field_text(e, "cultural_tradition").trim().is_empty() {
            e.insert(
                "cultural_tradition".into(),
                Value::String("Non-Western".into()),
            );
            updated = true;
        }
        if opts.add_urls && !has_url(&field_text(e, "grounding_authority")) {
            let citation = default_citation(&field_text(e, "domain"), accessed);
            e.insert("grounding_authority".into(), Value::String(citation));
            updated = true;
        }
        if updated {
            changed += 1;
        }
    }
    changed
}
