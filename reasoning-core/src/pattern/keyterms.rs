//! Key-term extraction from problem text (`spec.md` §4.4 step 1, §9
//! glossary "Key terms"). Deterministic and dictionary-driven rather than
//! a full NLP pipeline: the catalogue and the insight templates only need
//! stable bags of words to weight indicators and fill placeholders, not a
//! linguistically precise parse.

use std::collections::HashSet;
use std::sync::LazyLock;

/// The four key-term bags plus the single `primary_subject`, extracted
/// once per problem and reused by both the matcher and the insight
/// generator.
#[derive(Debug, Clone, Default)]
pub struct KeyTerms {
    pub primary_subject: Option<String>,
    pub domain_terms: Vec<String>,
    pub action_verbs: Vec<String>,
    pub noun_phrases: Vec<String>,
    pub terms: Vec<String>,
}

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "to", "of", "in",
        "on", "at", "for", "with", "and", "or", "but", "this", "that", "it", "its", "we", "our",
        "has", "have", "had", "as", "by", "from", "when", "what", "why", "how", "not", "no",
        "there", "which", "who", "do", "does", "did", "can", "will", "would", "should",
    ]
    .into_iter()
    .collect()
});

static DOMAIN_VOCAB: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "latency", "throughput", "database", "api", "memory", "cpu", "network", "service",
        "queue", "cache", "disk", "cluster", "server", "client", "request", "response",
        "deployment", "configuration", "pipeline", "replica", "connection", "thread", "process",
        "container", "load", "traffic", "bandwidth", "storage", "index", "schema", "endpoint",
    ]
    .into_iter()
    .collect()
});

static ACTION_VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "increase", "increased", "increasing", "decrease", "decreased", "drop", "dropped",
        "fail", "failed", "failing", "crash", "crashed", "crashing", "degrade", "degraded",
        "degrading", "spike", "spiked", "spiking", "timeout", "timed", "restart", "restarted",
        "scale", "scaled", "scaling", "optimize", "optimized", "optimizing", "investigate",
        "monitor", "monitored", "review", "reviewed", "slow", "slowed", "slowing", "stall",
        "stalled", "stalling", "leak", "leaking", "block", "blocked", "blocking", "retry",
        "retried", "retrying", "exceed", "exceeded", "exceeding",
    ]
    .into_iter()
    .collect()
});

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Extracts key terms from problem text.
#[must_use]
pub fn extract_key_terms(text: &str) -> KeyTerms {
    let tokens = tokenize(text);
    let significant: Vec<&String> = tokens.iter().filter(|t| !STOPWORDS.contains(t.as_str())).collect();

    let mut domain_terms = Vec::new();
    let mut action_verbs = Vec::new();
    let mut terms = Vec::new();
    let mut seen = HashSet::new();

    for token in &significant {
        if seen.insert(token.as_str().to_string()) {
            terms.push(token.to_string());
        }
        if DOMAIN_VOCAB.contains(token.as_str()) && !domain_terms.contains(*token) {
            domain_terms.push(token.to_string());
        }
        if ACTION_VERBS.contains(token.as_str()) && !action_verbs.contains(*token) {
            action_verbs.push(token.to_string());
        }
    }

    let noun_phrases = extract_noun_phrases(&significant);
    let primary_subject = noun_phrases
        .first()
        .cloned()
        .or_else(|| significant.first().map(|s| s.to_string()));

    KeyTerms {
        primary_subject,
        domain_terms,
        action_verbs,
        noun_phrases,
        terms,
    }
}

/// Groups consecutive non-verb, non-stopword tokens into short phrases,
/// the simplest possible stand-in for noun-phrase chunking.
fn extract_noun_phrases(significant: &[&String]) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in significant {
        if ACTION_VERBS.contains(token.as_str()) {
            if current.len() >= 2 {
                phrases.push(current.join(" "));
            }
            current.clear();
        } else {
            current.push(token.as_str());
        }
    }
    if current.len() >= 2 {
        phrases.push(current.join(" "));
    }
    phrases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_domain_terms_and_action_verbs() {
        let terms = extract_key_terms("The database latency increased after the deployment.");
        assert!(terms.domain_terms.contains(&"database".to_string()));
        assert!(terms.domain_terms.contains(&"latency".to_string()));
        assert!(terms.action_verbs.contains(&"increased".to_string()));
    }

    #[test]
    fn primary_subject_defaults_to_first_significant_term_when_no_phrase() {
        let terms = extract_key_terms("crashed");
        assert_eq!(terms.primary_subject, Some("crashed".to_string()));
    }

    #[test]
    fn empty_text_yields_empty_bags() {
        let terms = extract_key_terms("");
        assert!(terms.terms.is_empty());
        assert!(terms.primary_subject.is_none());
    }
}
