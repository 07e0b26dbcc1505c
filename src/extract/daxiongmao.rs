//! Extraction from (and URL construction for) the `daxiongmao.js` file.
//!
//! The download URL is where the council checks the faked platform: the
//! query value is a base64 fusion of user-agent, ursidae name, and OS
//! label, so all three must describe the same fake machine.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use url::Url;

use crate::extract::ExtractError;

/// Build the URL for downloading `daxiongmao.js`.
///
/// The carnivore value becomes the query-parameter name and the value is
/// `base64(user_agent + ursidae_name + os)`, resolved against the form
/// page URL.
pub fn script_url(
    form_page_url: &str,
    carnivore_value: &str,
    user_agent: &str,
    ursidae_name: &str,
    os: &str,
) -> Result<String, ExtractError> {
    let fused = format!("{user_agent}{ursidae_name}{os}");
    let fused_b64 = BASE64.encode(fused.as_bytes());

    let endpoint = format!("/daxiongmao.js?{carnivore_value}={fused_b64}&key=aadfa");

    let base = Url::parse(form_page_url)
        .map_err(|_| ExtractError::BadUrl(form_page_url.to_string()))?;
    let resolved = base
        .join(&endpoint)
        .map_err(|_| ExtractError::BadUrl(endpoint.clone()))?;

    Ok(resolved.to_string())
}

/// Extract the rogue-racoons hash, an md5-looking token embedded in the
/// script that the voting form requires.
pub fn rogue_racoons_hash(js: &str) -> Result<String, ExtractError> {
    let re = Regex::new(r#"oons" value="(.*?)""#).expect("valid regex");

    let caps = re.captures(js).ok_or(ExtractError::MissingRogueRacoons)?;
    Ok(caps[1].to_string())
}
