//! English singularization for default id parameters.
//!
//! Resource names are conventionally plural (`forums`, `categories`); the
//! default id parameter and context key is the singular form (`forum`,
//! `category`). Rules are checked in order: uncountables, irregulars, then
//! suffix rewrites. Words that do not look plural are returned unchanged.

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "media",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("statuses", "status"),
    ("aliases", "alias"),
];

// (plural suffix, singular replacement)
const SUFFIXES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("ches", "ch"),
    ("xes", "x"),
    ("zzes", "zz"),
];

/// Return the singular form of `word`.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_string();
    }

    for (plural, singular) in SUFFIXES {
        // Keep at least one character of stem ("yes", "ties" are not rewritten to "y").
        if lower.len() > plural.len() + 1 && lower.ends_with(plural) {
            let stem = &word[..word.len() - plural.len()];
            return format!("{}{}", stem, singular);
        }
    }

    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }

    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(singularize("forums"), "forum");
        assert_eq!(singularize("threads"), "thread");
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("pets"), "pet");
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("archives"), "archive");
    }

    #[test]
    fn test_irregular_and_uncountable() {
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("sheep"), "sheep");
        assert_eq!(singularize("news"), "news");
    }

    #[test]
    fn test_already_singular() {
        assert_eq!(singularize("forum"), "forum");
        assert_eq!(singularize("user"), "user");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("class"), "class");
        assert_eq!(singularize("s"), "s");
    }
}
