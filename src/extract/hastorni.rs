//! Extraction from the `hastorni.js` file.
//!
//! The script holds two things: the `ursidae` name (an array of character
//! codes that changes per session) and the `kretzoi` letter mapping used to
//! derive the rats hash.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use std::collections::HashMap;

use crate::extract::ExtractError;

/// Extract the name stored in the `ursidae` variable.
///
/// The name arrives as a JSON array of character codes and is decoded to a
/// string. It later goes into the base64 query value that validates the
/// `daxiongmao.js` download.
pub fn ursidae_name(js: &str) -> Result<String, ExtractError> {
    let re = Regex::new(r"ursidae = (.*?);").expect("valid regex");

    let caps = re.captures(js).ok_or(ExtractError::MissingUrsidae)?;
    let char_codes: Vec<u32> =
        serde_json::from_str(&caps[1]).map_err(ExtractError::BadUrsidae)?;

    char_codes
        .into_iter()
        .map(|code| char::from_u32(code).ok_or(ExtractError::BadCharCode(code)))
        .collect()
}

/// Extract the `kretzoi` letter mapping.
///
/// Each letter of a voter name maps to a number that changes per session.
pub fn letters_map(js: &str) -> Result<HashMap<String, i64>, ExtractError> {
    let re = Regex::new(r"kretzoi = (.*?);").expect("valid regex");

    let caps = re.captures(js).ok_or(ExtractError::MissingLettersMap)?;
    serde_json::from_str(&caps[1]).map_err(ExtractError::BadLettersMap)
}

/// Derive the rats hash for a voter name.
///
/// Every letter of the name is replaced by its number from the mapping, the
/// numbers are joined with `|`, and the result is base64-encoded:
///
/// ```text
/// {B: 1, E: 2, L: 3, V: 4, O: 5}   "BELVO" → "1|2|3|4|5" → base64
/// ```
pub fn rats_hash(
    map: &HashMap<String, i64>,
    voter_name: &str,
) -> Result<String, ExtractError> {
    let mut numbers = Vec::with_capacity(voter_name.len());
    for letter in voter_name.chars() {
        let number = map
            .get(&letter.to_string())
            .ok_or(ExtractError::UnmappedLetter(letter))?;
        numbers.push(number.to_string());
    }

    Ok(BASE64.encode(numbers.join("|")))
}
