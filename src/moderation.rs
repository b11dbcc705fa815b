/// Inline profanity screen applied to customer-supplied task text before it
/// is persisted. Token-based so ordinary words containing a blocked stem
/// ("ассистент", "classic") are not flagged.
const BLOCKED_WORDS: &[&str] = &[
    // en
    "fuck", "shit", "bitch", "bastard", "asshole",
    // bg
    "курва", "копеле", "педал", "путка",
    // ru / uk
    "блять", "сука", "мудак", "хуй", "пизда",
];

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Returns the first blocked word found in `text`, if any.
pub fn find_profanity(text: &str) -> Option<&'static str> {
    for token in tokens(text) {
        if let Some(hit) = BLOCKED_WORDS.iter().find(|w| **w == token) {
            return Some(hit);
        }
    }
    None
}

/// Screens every supplied field; `None` entries are skipped.
pub fn screen_fields(fields: &[Option<&str>]) -> Option<&'static str> {
    fields
        .iter()
        .flatten()
        .find_map(|text| find_profanity(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_passes() {
        assert_eq!(find_profanity("Paint my fence, two coats"), None);
        assert_eq!(find_profanity("Ремонт на баня в Лозенец"), None);
    }

    #[test]
    fn test_profanity_is_caught() {
        assert_eq!(find_profanity("this is shit work"), Some("shit"));
        assert_eq!(find_profanity("Каква курва само"), Some("курва"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(find_profanity("SHIT"), Some("shit"));
    }

    #[test]
    fn test_substrings_are_not_flagged() {
        // "Shitake" style false positives must not trigger.
        assert_eq!(find_profanity("shiitake mushrooms delivery"), None);
        assert_eq!(find_profanity("classic assembly"), None);
    }

    #[test]
    fn test_screen_fields_skips_none() {
        assert_eq!(screen_fields(&[None, Some("clean text"), None]), None);
        assert_eq!(
            screen_fields(&[Some("ok"), Some("total bastard move")]),
            Some("bastard")
        );
    }
}
