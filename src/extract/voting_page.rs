//! Extraction from the voting form page.

use scraper::{Html, Selector};

use crate::extract::ExtractError;

/// Extract the value of the input nested under the `carnivoreatingbambu`
/// element.
///
/// This value becomes the query-parameter *name* in the `daxiongmao.js`
/// URL, so losing it stalls the whole sequence.
pub fn carnivore_value(html: &str) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("#carnivoreatingbambu input").expect("valid selector");

    let input = document
        .select(&selector)
        .next()
        .ok_or(ExtractError::MissingCarnivoreInput)?;

    let value = input
        .value()
        .attr("value")
        .ok_or(ExtractError::MissingCarnivoreValue)?;

    Ok(value.to_string())
}
