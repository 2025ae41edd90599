//! Badge vocabulary.
//!
//! The keyword list is matched by substring in order, so short entries such
//! as `"c"` fire on most labels; the allow-list is what keeps the output
//! honest. Both lists mirror what the badge service has rendered over time.

pub const BADGE_KEYWORDS: [&str; 20] = [
    "java",
    "python",
    "sql",
    "javascript",
    "cpp",
    "problem solving",
    "algorithms",
    "data structures",
    "30 days",
    "10 days",
    "ruby",
    "swift",
    "golang",
    "rust",
    "kotlin",
    "scala",
    "c",
    "shell",
    "functional programming",
    "object oriented programming",
];

pub const KNOWN_BADGES: [&str; 31] = [
    "Problem Solving",
    "Java",
    "Python",
    "C Language",
    "Cpp",
    "C#",
    "JavaScript",
    "Sql",
    "30 Days of Code",
    "10 Days of JavaScript",
    "10 Days of Statistics",
    "Algorithms",
    "Data Structures",
    "Regex",
    "Artificial Intelligence",
    "Databases",
    "Shell",
    "Linux Shell",
    "Functional Programming",
    "Mathematics",
    "Days of ML",
    "Rust",
    "Kotlin",
    "Swift",
    "Scala",
    "Ruby",
    "Go",
    "Statistics",
    "Interview Preparation Kit",
    "Object Oriented Programming",
    "Security",
];

/// First keyword contained in the label, compared case-insensitively.
pub fn matching_keyword(label: &str) -> Option<&'static str> {
    let lower = label.to_lowercase();
    BADGE_KEYWORDS.into_iter().find(|k| lower.contains(k))
}

/// Maps a label to its canonical badge name.
///
/// The label must hit a keyword and its title-cased form must be an exact
/// allow-list entry.
pub fn recognize(label: &str) -> Option<String> {
    let label = label.trim();
    matching_keyword(label)?;
    let titled = title_case(label);
    KNOWN_BADGES
        .iter()
        .any(|known| *known == titled)
        .then_some(titled)
}

/// Upper-cases every letter that follows a non-letter and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
