const CZECH_ACCENTED_LOWER: &str = "áčďéěíňóřšťúůýž";

// Lower-cases, then deletes every character outside the allowed alphabet.
// Whitespace and punctuation are removed outright rather than collapsed, so
// word boundaries do not survive normalization.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|character| is_retained(*character))
        .collect()
}

pub(crate) fn normalized_char_count(text: &str) -> usize {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|character| is_retained(*character))
        .count()
}

fn is_retained(character: char) -> bool {
    character.is_ascii_alphanumeric() || CZECH_ACCENTED_LOWER.contains(character)
}
