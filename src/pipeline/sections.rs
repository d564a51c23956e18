//! Section scoping: which header each element sits under.
//!
//! Reading order is the only structure the extractor guarantees, so the
//! section of an element is the nearest section-header element at or before
//! it. A header belongs to the section it opens. Elements before the first
//! header have no section. Headers whose text is blank do not open a section.

use crate::document::DocumentElement;

/// Fold over `elements` in order, yielding one section label per element.
pub fn section_labels(elements: &[DocumentElement], section_label: &str) -> Vec<Option<String>> {
    elements
        .iter()
        .scan(None::<String>, |current, element| {
            let title = element.text.trim();
            if element.label == section_label && !title.is_empty() {
                *current = Some(title.to_string());
            }
            Some(current.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(text: &str, label: &str) -> DocumentElement {
        DocumentElement::new(text, label)
    }

    #[test]
    fn elements_inherit_nearest_header() {
        let elements = vec![
            el("Preamble", "text"),
            el("1 Introduction", "section_header"),
            el("First paragraph", "text"),
            el("Second paragraph", "list_item"),
            el("2 Method", "section_header"),
            el("Third paragraph", "text"),
        ];
        let labels = section_labels(&elements, "section_header");
        assert_eq!(
            labels,
            vec![
                None,
                Some("1 Introduction".to_string()),
                Some("1 Introduction".to_string()),
                Some("1 Introduction".to_string()),
                Some("2 Method".to_string()),
                Some("2 Method".to_string()),
            ]
        );
    }

    #[test]
    fn custom_label_and_blank_header() {
        let elements = vec![el("Paper", "title"), el("  ", "title"), el("body", "text")];
        let labels = section_labels(&elements, "title");
        assert_eq!(labels, vec![Some("Paper".to_string()); 3]);
    }

    #[test]
    fn empty_input() {
        assert!(section_labels(&[], "section_header").is_empty());
    }
}
