//! APA-style citation formatting
//!
//! Every segment ends in a period and a missing field collapses to a bare
//! `"."`, so the output always has four space-separated segments:
//! `"{authors} {year} {title} {publisher}"`.

use crate::types::{extract_year, BibliographicRecord};

const MISSING: &str = ".";

/// Format a record as an APA-like citation string
///
/// Pure and total: missing fields degrade to placeholders instead of failing.
///
/// ```
/// use citecam_core::{format_citation, BibliographicRecord};
///
/// let record = BibliographicRecord::new()
///     .with_author("Jane Q. Public")
///     .with_published_year("2001-05-01")
///     .with_title("Systems Design")
///     .with_publisher("Acme Press");
///
/// assert_eq!(
///     format_citation(&record),
///     "Public, J.Q., (2001). Systems Design. Acme Press."
/// );
/// ```
pub fn format_citation(record: &BibliographicRecord) -> String {
    format!(
        "{} {} {} {}",
        format_authors(&record.authors),
        format_year(record.published_year.as_deref()),
        format_terminated(record.title.as_deref()),
        format_terminated(record.publisher.as_deref()),
    )
}

/// "Jane Q. Public" -> "Public, J.Q.,"; a single token is kept as-is with a trailing comma
pub fn format_author(author: &str) -> Option<String> {
    let parts: Vec<&str> = author.split_whitespace().collect();

    match parts.split_last() {
        None => None,
        Some((only, [])) => Some(format!("{only},")),
        Some((last, given)) => {
            let initials: String = given
                .iter()
                .filter_map(|name| name.chars().next())
                .map(|initial| format!("{initial}."))
                .collect();
            Some(format!("{last}, {initials},"))
        }
    }
}

fn format_authors(authors: &[String]) -> String {
    let formatted: Vec<String> = authors.iter().filter_map(|a| format_author(a)).collect();

    if formatted.is_empty() {
        MISSING.to_string()
    } else {
        formatted.join(" ")
    }
}

fn format_year(date: Option<&str>) -> String {
    date.and_then(extract_year)
        .map(|year| format!("({year})."))
        .unwrap_or_else(|| MISSING.to_string())
}

fn format_terminated(field: Option<&str>) -> String {
    match field.map(str::trim) {
        Some(value) if !value.is_empty() => format!("{value}."),
        _ => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_record() -> BibliographicRecord {
        BibliographicRecord::new()
            .with_author("Jane Q. Public")
            .with_published_year("2001-05-01")
            .with_title("Systems Design")
            .with_publisher("Acme Press")
    }

    #[test]
    fn test_full_record() {
        assert_eq!(
            format_citation(&sample_record()),
            "Public, J.Q., (2001). Systems Design. Acme Press."
        );
    }

    #[test]
    fn test_empty_record_degrades_to_placeholders() {
        assert_eq!(format_citation(&BibliographicRecord::new()), ". . . .");
    }

    #[test]
    fn test_single_token_author_is_not_initialized() {
        assert_eq!(format_author("Plato"), Some("Plato,".to_string()));
        assert_eq!(format_author("   "), None);
    }

    #[test]
    fn test_multiple_authors() {
        let record = BibliographicRecord::new()
            .with_author("Brian W. Kernighan")
            .with_author("Dennis Ritchie")
            .with_author("")
            .with_published_year("1988")
            .with_title("The C Programming Language");

        insta::assert_snapshot!(
            format_citation(&record),
            @"Kernighan, B.W., Ritchie, D., (1988). The C Programming Language. ."
        );
    }

    #[test]
    fn test_year_without_four_digits() {
        let record = sample_record().with_published_year("05-01");
        assert_eq!(
            format_citation(&record),
            "Public, J.Q., . Systems Design. Acme Press."
        );
    }

    proptest! {
        #[test]
        fn formatting_is_pure(
            title in proptest::option::of("[A-Za-z ]{0,20}"),
            authors in proptest::collection::vec("[A-Za-z. ]{0,20}", 0..4),
            year in proptest::option::of("[0-9-]{0,10}"),
        ) {
            let record = BibliographicRecord {
                title,
                authors,
                publisher: None,
                published_year: year,
                cover_image_ref: None,
            };
            let first = format_citation(&record);
            prop_assert_eq!(&first, &format_citation(&record));
            prop_assert!(first.ends_with('.'));
        }
    }
}
