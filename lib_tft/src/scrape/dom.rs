use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static ANY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("*").expect("static selector"));

/// Every element of a document in document order.
///
/// `find_next` returns the first matching element that starts after a given
/// one, whether it is a descendant or lies further down the page.
pub struct DocumentOrder<'a> {
    elements: Vec<ElementRef<'a>>,
}

impl<'a> DocumentOrder<'a> {
    /// Indexes `doc`.
    pub fn new(doc: &'a Html) -> Self {
        Self {
            elements: doc.select(&ANY).collect(),
        }
    }

    /// First element after `after` matching `selector`.
    pub fn find_next(&self, after: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
        let start = self.elements.iter().position(|el| el == after)?;
        self.elements[start + 1..].iter().find(|el| selector.matches(el)).copied()
    }
}

/// Concatenated, trimmed text content of an element.
pub fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_next_searches_descendants_then_following() {
        let doc = Html::parse_document(
            r#"<div id="a"><span class="x">inner</span></div><p class="y">after</p><p class="x">later</p>"#,
        );
        let order = DocumentOrder::new(&doc);
        let a = doc.select(&Selector::parse("#a").unwrap()).next().unwrap();

        let x = order.find_next(&a, &Selector::parse(".x").unwrap()).unwrap();
        assert_eq!(text_of(&x), "inner");
        let y = order.find_next(&a, &Selector::parse(".y").unwrap()).unwrap();
        assert_eq!(text_of(&y), "after");
        assert!(order.find_next(&y, &Selector::parse("#a").unwrap()).is_none());
    }
}
