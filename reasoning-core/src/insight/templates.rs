//! Template placeholder substitution (`spec.md` §4.5). Pure string
//! transformation — recognised placeholders always resolve to a default
//! when their key-term bag is empty, so no literal `{{...}}` ever escapes
//! the Insight Generator.

use crate::pattern::KeyTerms;

const PRIMARY_SUBJECT_DEFAULT: &str = "the system";
const DOMAIN_TERMS_DEFAULT: &str = "relevant components";
const ACTION_VERBS_DEFAULT: &str = "operations";
const NOUN_PHRASES_DEFAULT: &str = "system components";
const TERMS_DEFAULT: &str = "relevant aspects";

/// Replaces every recognised `{{placeholder}}` in `text` with the
/// comma-joined contents of the matching key-term bag, falling back to a
/// fixed default when the bag is empty.
#[must_use]
pub fn substitute(text: &str, key_terms: &KeyTerms) -> String {
    let mut result = text.to_string();
    result = result.replace(
        "{{primarySubject}}",
        key_terms.primary_subject.as_deref().unwrap_or(PRIMARY_SUBJECT_DEFAULT),
    );
    result = result.replace("{{domainTerms}}", &joined_or(&key_terms.domain_terms, DOMAIN_TERMS_DEFAULT));
    result = result.replace("{{actionVerbs}}", &joined_or(&key_terms.action_verbs, ACTION_VERBS_DEFAULT));
    result = result.replace("{{nounPhrases}}", &joined_or(&key_terms.noun_phrases, NOUN_PHRASES_DEFAULT));
    let first_five: Vec<String> = key_terms.terms.iter().take(5).cloned().collect();
    result = result.replace("{{terms}}", &joined_or(&first_five, TERMS_DEFAULT));
    result
}

fn joined_or(bag: &[String], default: &str) -> String {
    if bag.is_empty() {
        default.to_string()
    } else {
        bag.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_defaults_when_bags_are_empty() {
        let key_terms = KeyTerms::default();
        let text = "{{primarySubject}} needs {{domainTerms}} review via {{actionVerbs}} on {{nounPhrases}} ({{terms}})";
        let substituted = substitute(text, &key_terms);
        assert!(!substituted.contains("{{"));
        assert!(substituted.contains("the system"));
        assert!(substituted.contains("relevant components"));
    }

    #[test]
    fn uses_bag_contents_when_present() {
        let key_terms = KeyTerms {
            primary_subject: Some("database".into()),
            domain_terms: vec!["latency".into(), "throughput".into()],
            action_verbs: vec!["increased".into()],
            noun_phrases: vec!["the database latency".into()],
            terms: vec!["database".into(), "latency".into()],
        };
        let substituted = substitute("{{primarySubject}} and {{domainTerms}}", &key_terms);
        assert_eq!(substituted, "database and latency, throughput");
    }
}
