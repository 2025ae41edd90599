//! Star-count inference for badge labels.
//!
//! The badge image only links a label to its stars through layout, so each
//! label is resolved by the first of these that yields a count:
//!
//! 1. a star section inside one of the label's enclosing groups;
//! 2. a star section that is a direct child of an enclosing group's parent;
//! 3. the star section whose `translate` offset is nearest the label;
//! 4. the document-wide star total split evenly across keyword labels.
//!
//! The root element spans every badge and never counts as an enclosing group.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::catalog;
use super::document::MarkupDocument;
use crate::models::Badge;

const STAR_SECTION_CLASS: &str = "star-section";
const BADGE_STAR_CLASS: &str = "badge-star";
const MAX_ANCESTOR_LEVELS: usize = 5;
const MAX_STARS: usize = 5;

static TRANSLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"translate\(\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)[\s,]+([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)",
    )
    .expect("translate pattern is valid")
});

struct StarSection {
    offset: Option<(f64, f64)>,
    stars: usize,
}

/// Extracts de-duplicated badges in label order, or `None` when nothing matches.
pub fn extract_badges<D: MarkupDocument>(doc: &D) -> Option<Vec<Badge>> {
    let root = doc.root_element();

    let labels: Vec<(D::Node, String)> = doc
        .elements_by_tag("text")
        .into_iter()
        .filter_map(|node| {
            let text = doc.text(node).trim().to_string();
            (text.chars().count() > 1).then_some((node, text))
        })
        .collect();

    let sections: Vec<StarSection> = doc
        .elements_by_tag("g")
        .into_iter()
        .filter(|&node| doc.has_class(node, STAR_SECTION_CLASS))
        .map(|node| StarSection {
            offset: doc.attribute(node, "transform").and_then(parse_translate),
            stars: count_stars(doc, node),
        })
        .collect();

    let total_stars = doc.descendants_with_class(root, BADGE_STAR_CLASS).len();
    let keyword_labels = labels
        .iter()
        .filter(|(_, text)| catalog::matching_keyword(text).is_some())
        .count();

    let mut seen = HashSet::new();
    let mut badges = Vec::new();

    for (node, text) in &labels {
        let Some(name) = catalog::recognize(text) else {
            continue;
        };
        if !seen.insert(name.to_lowercase()) {
            continue;
        }

        let stars = enclosing_section_stars(doc, *node)
            .or_else(|| nearest_section_stars(doc, *node, &sections))
            .or_else(|| proportional_stars(&sections, total_stars, keyword_labels))
            .unwrap_or(0);

        tracing::trace!(badge = %name, stars, "badge resolved");
        badges.push(Badge {
            name,
            stars: stars.min(MAX_STARS) as u8,
        });
    }

    (!badges.is_empty()).then_some(badges)
}

fn is_star_section<D: MarkupDocument>(doc: &D, node: D::Node) -> bool {
    doc.tag_name(node) == "g" && doc.has_class(node, STAR_SECTION_CLASS)
}

fn count_stars<D: MarkupDocument>(doc: &D, section: D::Node) -> usize {
    doc.descendants_with_class(section, BADGE_STAR_CLASS).len()
}

fn enclosing_section_stars<D: MarkupDocument>(doc: &D, label: D::Node) -> Option<usize> {
    let root = doc.root_element();
    let mut current = label;

    for _ in 0..MAX_ANCESTOR_LEVELS {
        let ancestor = doc.parent(current).filter(|&a| a != root)?;

        let contained = doc
            .descendants_with_class(ancestor, STAR_SECTION_CLASS)
            .into_iter()
            .find(|&n| is_star_section(doc, n));
        if let Some(section) = contained {
            return Some(count_stars(doc, section));
        }

        let sibling = doc
            .parent(ancestor)
            .filter(|&p| p != root)
            .and_then(|p| {
                doc.children(p)
                    .into_iter()
                    .find(|&n| is_star_section(doc, n))
            });
        if let Some(section) = sibling {
            return Some(count_stars(doc, section));
        }

        current = ancestor;
    }

    None
}

fn nearest_section_stars<D: MarkupDocument>(
    doc: &D,
    label: D::Node,
    sections: &[StarSection],
) -> Option<usize> {
    let x = coordinate(doc.attribute(label, "x"));
    let y = coordinate(doc.attribute(label, "y"));

    let mut best: Option<(f64, usize)> = None;
    for section in sections {
        let Some((sx, sy)) = section.offset else {
            continue;
        };
        let distance = (x - sx).hypot(y - sy);
        // strict comparison keeps the earliest section on ties
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, section.stars));
        }
    }
    best.map(|(_, stars)| stars)
}

fn proportional_stars(
    sections: &[StarSection],
    total_stars: usize,
    keyword_labels: usize,
) -> Option<usize> {
    if sections.is_empty() || keyword_labels == 0 {
        return None;
    }
    Some(total_stars / keyword_labels)
}

fn coordinate(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_translate(transform: &str) -> Option<(f64, f64)> {
    let caps = TRANSLATE.captures(transform)?;
    let x = caps.get(1)?.as_str().parse().ok()?;
    let y = caps.get(2)?.as_str().parse().ok()?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::document::SvgDocument;

    fn extract(svg: &str) -> Option<Vec<Badge>> {
        let doc = SvgDocument::parse(svg).unwrap();
        extract_badges(&doc)
    }

    fn stars(n: usize) -> String {
        r#"<svg class="badge-star"><path d="M0 0"/></svg>"#.repeat(n)
    }

    fn badge(name: &str, stars: u8) -> Badge {
        Badge {
            name: name.into(),
            stars,
        }
    }

    #[test]
    fn parses_translate_offsets() {
        assert_eq!(parse_translate("translate(10, 20)"), Some((10.0, 20.0)));
        assert_eq!(parse_translate("translate(-1.5 3e1)"), Some((-1.5, 30.0)));
        assert_eq!(
            parse_translate("scale(2) translate(.5,7)"),
            Some((0.5, 7.0))
        );
        assert_eq!(parse_translate("translate(10)"), None);
        assert_eq!(parse_translate("rotate(45)"), None);
        assert_eq!(parse_translate(""), None);
    }

    #[test]
    fn coordinates_default_to_zero() {
        assert_eq!(coordinate(Some("12.5")), 12.5);
        assert_eq!(coordinate(Some("auto")), 0.0);
        assert_eq!(coordinate(None), 0.0);
    }

    #[test]
    fn direct_containment_counts_enclosed_stars() {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g class="badge">
    <text x="10" y="20">Problem Solving</text>
    <g class="star-section" transform="translate(10, 30)">{}</g>
  </g>
  <g class="badge">
    <g class="label"><text x="200" y="20">Python</text></g>
    <g class="inner"><g class="star-section">{}</g></g>
  </g>
</svg>"#,
            stars(3),
            stars(5)
        );

        assert_eq!(
            extract(&svg),
            Some(vec![badge("Problem Solving", 3), badge("Python", 5)])
        );
    }

    #[test]
    fn sibling_section_beats_nested_one() {
        let svg = format!(
            r#"<svg>
  <g class="row">
    <g class="label"><text>Java</text></g>
    <g class="wrap"><g class="star-section">{}</g></g>
    <g class="star-section">{}</g>
  </g>
</svg>"#,
            stars(1),
            stars(3)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Java", 3)]));
    }

    #[test]
    fn enclosing_section_wins_over_closer_positional_match() {
        let svg = format!(
            r#"<svg>
  <g class="badge">
    <text x="0" y="0">Java</text>
    <g class="star-section" transform="translate(500, 500)">{}</g>
  </g>
  <g class="star-section" transform="translate(1, 1)">{}</g>
</svg>"#,
            stars(2),
            stars(4)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Java", 2)]));
    }

    #[test]
    fn positional_fallback_picks_nearest_offset() {
        let svg = format!(
            r#"<svg>
  <text x="10" y="10">Java</text>
  <text x="10" y="100">Python</text>
  <g class="star-section" transform="translate(12, 15)">{}</g>
  <g class="star-section" transform="translate(12, 105)">{}</g>
  <g class="star-section">{}</g>
</svg>"#,
            stars(2),
            stars(5),
            stars(1)
        );

        assert_eq!(
            extract(&svg),
            Some(vec![badge("Java", 2), badge("Python", 5)])
        );
    }

    #[test]
    fn positional_ties_keep_document_order() {
        let svg = format!(
            r#"<svg>
  <text x="0" y="0">Ruby</text>
  <g class="star-section" transform="translate(3, 4)">{}</g>
  <g class="star-section" transform="translate(-3, -4)">{}</g>
</svg>"#,
            stars(1),
            stars(4)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Ruby", 1)]));
    }

    #[test]
    fn lone_section_outside_label_group_resolves_by_position() {
        let svg = format!(
            r#"<svg>
  <g class="labels"><text x="5" y="5">Sql</text></g>
  <g class="star-section" transform="translate(400, 400)">{}</g>
</svg>"#,
            stars(4)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Sql", 4)]));
    }

    #[test]
    fn unparseable_transform_falls_back_to_proportional_split() {
        let svg = format!(
            r#"<svg>
  <g class="labels"><text x="5" y="5">Sql</text></g>
  <g class="star-section" transform="rotate(15)">{}</g>
</svg>"#,
            stars(4)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Sql", 4)]));
    }

    #[test]
    fn proportional_split_counts_every_keyword_label() {
        // "Basic Certificate" hits the "c" keyword but is not a known badge,
        // so six stars are split three ways.
        let svg = format!(
            r#"<svg>
  <text>Java</text>
  <text>Python</text>
  <text>Basic Certificate</text>
  <g class="star-section">{}</g>
  <g class="decor">{}</g>
</svg>"#,
            stars(4),
            stars(2)
        );

        assert_eq!(
            extract(&svg),
            Some(vec![badge("Java", 2), badge("Python", 2)])
        );
    }

    #[test]
    fn no_star_sections_means_zero_stars() {
        let svg = format!(
            r#"<svg><text>Java</text><g class="decor">{}</g></svg>"#,
            stars(3)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Java", 0)]));
    }

    #[test]
    fn stars_are_clamped_to_five() {
        let svg = format!(
            r#"<svg><g><text>Kotlin</text><g class="star-section">{}</g></g></svg>"#,
            stars(8)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Kotlin", 5)]));
    }

    #[test]
    fn duplicate_labels_keep_first_occurrence() {
        let svg = format!(
            r#"<svg>
  <g><text>Python</text><g class="star-section">{}</g></g>
  <g><text>PYTHON</text><g class="star-section">{}</g></g>
  <g><text>python</text><g class="star-section">{}</g></g>
</svg>"#,
            stars(1),
            stars(2),
            stars(3)
        );

        assert_eq!(extract(&svg), Some(vec![badge("Python", 1)]));
    }

    #[test]
    fn unknown_and_short_labels_yield_nothing() {
        let svg = r#"<svg>
  <text>C</text>
  <text> </text>
  <text>30 Days of Code</text>
  <text>Golang</text>
  <text>HackerRank</text>
</svg>"#;

        assert_eq!(extract(svg), None);
    }

    #[test]
    fn every_badge_is_known_unique_and_in_range() {
        let svg = format!(
            r#"<svg>
  <g><text>Java</text><g class="star-section">{}</g></g>
  <g><text>java</text></g>
  <text x="1" y="1">C Language</text>
  <text>Shell</text>
  <g class="star-section" transform="translate(0,0)">{}</g>
</svg>"#,
            stars(9),
            stars(0)
        );

        let badges = extract(&svg).unwrap();
        let mut names = HashSet::new();
        for b in &badges {
            assert!(b.stars <= 5);
            assert!(catalog::KNOWN_BADGES.iter().any(|k| *k == b.name));
            assert!(names.insert(b.name.to_lowercase()));
        }
        assert_eq!(badges.len(), 3);
    }
}
