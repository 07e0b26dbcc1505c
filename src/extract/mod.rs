//! Extraction routines for the election site's pages and scripts.
//!
//! One module per resource, in the order a browser would load them:
//! voting page → `hastorni.js` → `daxiongmao.js`. Each routine is a free
//! function that pulls out exactly one value the next request needs. The
//! token derivations were reverse-engineered from the site's client-side
//! JavaScript.

pub mod daxiongmao;
pub mod hastorni;
pub mod voting_page;

use thiserror::Error;

/// A value the voting sequence needs was missing or malformed.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no set-cookie header in the response")]
    MissingSetCookie,
    #[error("session cookie not found in set-cookie header")]
    MissingSessionCookie,
    #[error("input element under '#carnivoreatingbambu' not found in the voting page")]
    MissingCarnivoreInput,
    #[error("value attribute missing on the carnivore input element")]
    MissingCarnivoreValue,
    #[error("ursidae char-code array not found in hastorni.js")]
    MissingUrsidae,
    #[error("ursidae char codes are not valid JSON")]
    BadUrsidae(#[source] serde_json::Error),
    #[error("char code {0} is not a valid character")]
    BadCharCode(u32),
    #[error("letter mapping (kretzoi) not found in hastorni.js")]
    MissingLettersMap,
    #[error("letter mapping is not valid JSON")]
    BadLettersMap(#[source] serde_json::Error),
    #[error("letter '{0}' missing from the kretzoi mapping")]
    UnmappedLetter(char),
    #[error("rogue-racoons hash not found in daxiongmao.js")]
    MissingRogueRacoons,
    #[error("cannot resolve '{0}' against the form page URL")]
    BadUrl(String),
}

/// Extract the session cookie from a raw `Set-Cookie` header value.
///
/// The session cookie authenticates every request of a voting attempt until
/// the vote is submitted. Returns the `(name, value)` pair, where the name
/// is always `session`.
pub fn session_cookie(set_cookie: Option<&str>) -> Result<(String, String), ExtractError> {
    let header = set_cookie.ok_or(ExtractError::MissingSetCookie)?;

    for cookie in header.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == "session" {
                return Ok((name.to_string(), value.to_string()));
            }
        }
    }

    Err(ExtractError::MissingSessionCookie)
}
