//! Listing extraction from fetched markup.
//!
//! A container missing its name or price element is an ad or placeholder
//! tile, not a failure; it is skipped without affecting the run.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{FetchError, FetchResult, InputValidationError};
use crate::types::{RawListing, SiteExtractionConfig};

/// Compiled selectors for one site.
#[derive(Debug)]
pub struct ListingSelectors {
    container: Selector,
    name: Selector,
    price: Selector,
    name_attribute: Option<String>,
}

impl ListingSelectors {
    pub fn compile(site: &SiteExtractionConfig) -> Result<Self, InputValidationError> {
        Ok(Self {
            container: compile_selector("container", &site.container)?,
            name: compile_selector("name", &site.name_selector)?,
            price: compile_selector("price", &site.price_selector)?,
            name_attribute: site.name_attribute.clone(),
        })
    }

    fn name_of(&self, element: ElementRef<'_>) -> Option<String> {
        match &self.name_attribute {
            Some(attr) => element.value().attr(attr).map(collapse_whitespace),
            None => Some(collapse_whitespace(&element.text().collect::<String>())),
        }
    }
}

fn compile_selector(field: &'static str, selector: &str) -> Result<Selector, InputValidationError> {
    Selector::parse(selector).map_err(|e| InputValidationError::InvalidSelector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a fetched body, rejecting blank documents.
pub fn parse_document(url: &str, body: &str) -> FetchResult<Html> {
    if body.trim().is_empty() {
        return Err(FetchError::EmptyDocument {
            url: url.to_string(),
        });
    }
    Ok(Html::parse_document(body))
}

/// Lazily yield one [`RawListing`] per complete container, in document order.
///
/// The iterator borrows the document and is empty when no container matches.
pub fn extract_listings<'a>(
    document: &'a Html,
    selectors: &'a ListingSelectors,
) -> impl Iterator<Item = RawListing> + 'a {
    document
        .select(&selectors.container)
        .enumerate()
        .filter_map(move |(index, container)| {
            let name = container
                .select(&selectors.name)
                .next()
                .and_then(|el| selectors.name_of(el));
            let price = container.select(&selectors.price).next();

            match (name, price) {
                (Some(name), Some(price)) => Some(RawListing {
                    name,
                    price_text: price.text().collect(),
                }),
                _ => {
                    debug!(index, "Skipping container without name or price");
                    None
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn books_selectors() -> ListingSelectors {
        ListingSelectors::compile(&SiteExtractionConfig::books()).unwrap()
    }

    #[test]
    fn test_books_extraction_reads_title_attribute() {
        let html = fixtures::books_page(&[
            ("A Light in the Attic", "£51.77"),
            ("Tipping the Velvet", "£53.74"),
        ]);
        let document = parse_document("https://books.test", &html).unwrap();
        let selectors = books_selectors();

        let listings: Vec<_> = extract_listings(&document, &selectors).collect();

        assert_eq!(
            listings,
            vec![
                RawListing {
                    name: "A Light in the Attic".into(),
                    price_text: "£51.77".into()
                },
                RawListing {
                    name: "Tipping the Velvet".into(),
                    price_text: "£53.74".into()
                },
            ]
        );
    }

    #[test]
    fn test_jumia_extraction_collapses_name_whitespace() {
        let html = fixtures::jumia_page(&[("Samsung   Galaxy\n A15", "KSh 18,999")]);
        let document = parse_document("https://jumia.test", &html).unwrap();
        let selectors = ListingSelectors::compile(&SiteExtractionConfig::jumia()).unwrap();

        let listings: Vec<_> = extract_listings(&document, &selectors).collect();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "Samsung Galaxy A15");
        assert_eq!(listings[0].price_text, "KSh 18,999");
    }

    #[test]
    fn test_incomplete_containers_are_skipped() {
        let html = r#"
            <html><body>
              <article class="product_pod"><h3><a title="Kept">Kept</a></h3><p class="price_color">£1.00</p></article>
              <article class="product_pod"><h3><a title="No price">No price</a></h3></article>
              <article class="product_pod"><p class="price_color">£2.00</p></article>
              <article class="product_pod"><h3><a>No title attr</a></h3><p class="price_color">£3.00</p></article>
              <article class="product_pod"><h3><a title="Also kept">x</a></h3><p class="price_color">£4.00</p></article>
            </body></html>
        "#;
        let document = parse_document("https://books.test", html).unwrap();
        let selectors = books_selectors();

        let names: Vec<_> = extract_listings(&document, &selectors)
            .map(|l| l.name)
            .collect();

        assert_eq!(names, vec!["Kept", "Also kept"]);
    }

    #[test]
    fn test_no_containers_yields_empty_sequence() {
        let document = parse_document("https://books.test", "<html><body><p>Closed</p></body></html>")
            .unwrap();
        let selectors = books_selectors();
        assert_eq!(extract_listings(&document, &selectors).count(), 0);
    }

    #[test]
    fn test_blank_document_is_fetch_error() {
        let err = parse_document("https://books.test", "  \n ").unwrap_err();
        assert!(matches!(err, FetchError::EmptyDocument { .. }));
    }
}
