//! The vote sequence runner.
//!
//! Per voter, one attempt walks the site the way a browser would:
//! form page → `hastorni.js` → `daxiongmao.js` → POST the vote. A failed
//! attempt abandons its fingerprint, tokens, and session, and restarts
//! from the form page with a freshly drawn platform.

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use url::Url;

use crate::ballot::{roster, Decision, Voter};
use crate::extract;
use crate::http::HttpClient;
use crate::platform::Fingerprint;
use crate::report::{ElectionReport, VoterOutcome};

/// Marker the voting endpoint returns when a single vote is accepted.
const VOTE_ACCEPTED_MARKER: &str = "Thank you bea";

/// Marker present in the final election tally JSON.
const TALLY_MARKER: &str = "pandas_future";

/// Runtime configuration for one election run.
#[derive(Debug, Clone)]
pub struct ElectionConfig {
    /// Base URL of the election site.
    pub base_url: String,
    /// Trial key appended to the voting form URL.
    pub trial_key: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Attempts per voter before the run is aborted.
    pub max_attempts: u32,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://panda.belvo.io".to_string(),
            trial_key: "A3F3D333452DF83D32A387F3FC3-GUBA".to_string(),
            timeout_ms: 10_000,
            max_attempts: 3,
        }
    }
}

impl ElectionConfig {
    fn form_page_url(&self) -> String {
        format!(
            "{}/?trial_key={}",
            self.base_url.trim_end_matches('/'),
            self.trial_key
        )
    }

    fn voting_url(&self) -> String {
        format!(
            "{}/ursidaecarinove_eating_bambu_must_die",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// Run the full election: five voters, strictly sequential, one accepted
/// vote each.
///
/// Returns the accumulated report; the caller decides where to write it.
/// Any voter exhausting its attempts aborts the whole run.
pub async fn run(config: &ElectionConfig, decision: Decision) -> Result<ElectionReport> {
    let client = HttpClient::new(config.timeout_ms);

    let mut outcomes = Vec::with_capacity(5);
    let mut tally = None;

    for voter in roster(decision) {
        info!(voter = voter.name, "sending group to vote");

        let (attempts, vote_tally) = vote_until_accepted(&client, config, &voter).await?;
        if let Some(t) = vote_tally {
            info!(voter = voter.name, "election result received");
            tally = Some(t);
        }

        outcomes.push(VoterOutcome {
            name: voter.name.to_string(),
            survive: voter.survive.to_string(),
            attempts,
        });
    }

    Ok(ElectionReport::new(decision, outcomes, tally))
}

/// Retry loop for one voter.
///
/// Every retry draws a fingerprint different from the one the council just
/// rejected.
async fn vote_until_accepted(
    client: &HttpClient,
    config: &ElectionConfig,
    voter: &Voter,
) -> Result<(u32, Option<serde_json::Value>)> {
    let mut fingerprint = Fingerprint::random();
    let mut last_error = anyhow::anyhow!("no attempts were made");

    for attempt in 1..=config.max_attempts {
        match vote_once(client, config, voter, &fingerprint).await {
            Ok(tally) => {
                info!(voter = voter.name, attempt, "vote accepted");
                return Ok((attempt, tally));
            }
            Err(e) => {
                warn!(
                    voter = voter.name,
                    attempt,
                    "vote attempt failed ({e:#}), restarting with a fresh platform"
                );
                fingerprint = Fingerprint::random_excluding(&fingerprint);
                last_error = e;
            }
        }
    }

    Err(last_error.context(format!(
        "voter '{}' exhausted {} attempts",
        voter.name, config.max_attempts
    )))
}

/// One complete voting attempt under a single fake platform.
///
/// Returns the parsed tally if the response was the final election result
/// rather than the plain acceptance message.
async fn vote_once(
    client: &HttpClient,
    config: &ElectionConfig,
    voter: &Voter,
    fingerprint: &Fingerprint,
) -> Result<Option<serde_json::Value>> {
    let ua_header = (
        "user-agent".to_string(),
        fingerprint.user_agent.to_string(),
    );

    // Step 1: the voting form page yields the session cookie and the
    // carnivore value.
    let form_page_url = config.form_page_url();
    let form_page = client
        .get(&form_page_url, std::slice::from_ref(&ua_header))
        .await
        .context("fetching the voting form page")?;
    if form_page.status != 200 {
        bail!("voting form page returned status {}", form_page.status);
    }
    if form_page.final_url != form_page.url {
        debug!(
            voter = voter.name,
            final_url = %form_page.final_url,
            "form page request was redirected"
        );
    }

    let (cookie_name, cookie_value) = extract::session_cookie(form_page.header("set-cookie"))?;
    let carnivore_value = extract::voting_page::carnivore_value(&form_page.body)?;
    debug!(voter = voter.name, %carnivore_value, "form page parsed");

    let session_headers = vec![
        ua_header.clone(),
        (
            "cookie".to_string(),
            format!("{cookie_name}={cookie_value}"),
        ),
    ];

    // Step 2: hastorni.js yields the ursidae name and the letter mapping.
    let hastorni_url = Url::parse(&form_page_url)
        .and_then(|u| u.join("/hastorni.js"))
        .context("resolving hastorni.js URL")?;
    let hastorni = client
        .get(hastorni_url.as_str(), &session_headers)
        .await
        .context("fetching hastorni.js")?;
    if hastorni.status != 200 {
        bail!("hastorni.js returned status {}", hastorni.status);
    }

    let ursidae_name = extract::hastorni::ursidae_name(&hastorni.body)?;
    let letters_map = extract::hastorni::letters_map(&hastorni.body)?;
    let rats_hash = extract::hastorni::rats_hash(&letters_map, voter.name)?;
    debug!(voter = voter.name, %ursidae_name, "hastorni.js parsed");

    // Step 3: daxiongmao.js yields the rogue-racoons hash and a fresh
    // session for the vote itself. Its URL carries the platform check.
    let daxiongmao_url = extract::daxiongmao::script_url(
        &form_page_url,
        &carnivore_value,
        fingerprint.user_agent,
        &ursidae_name,
        fingerprint.os,
    )?;
    let daxiongmao = client
        .get(&daxiongmao_url, &session_headers)
        .await
        .context("fetching daxiongmao.js")?;
    if daxiongmao.status != 200 {
        bail!("daxiongmao.js returned status {}", daxiongmao.status);
    }

    let rogue_racoons = extract::daxiongmao::rogue_racoons_hash(&daxiongmao.body)?;
    let (fresh_name, fresh_value) = extract::session_cookie(daxiongmao.header("set-cookie"))?;

    // Step 4: the vote itself, under the fresh session.
    let form_fields = vec![
        ("rogue_racoons".to_string(), rogue_racoons),
        ("username".to_string(), voter.name.to_string()),
        ("survive".to_string(), voter.survive.to_string()),
        ("rats".to_string(), rats_hash),
    ];
    let vote_headers = vec![
        ua_header,
        ("cookie".to_string(), format!("{fresh_name}={fresh_value}")),
    ];

    info!(voter = voter.name, "sending vote");
    let response = client
        .post_form(&config.voting_url(), &form_fields, &vote_headers)
        .await
        .context("submitting the vote")?;

    validate_vote_response(&response.body)
}

/// A vote response is valid iff it carries the acceptance message or the
/// final election tally. Anything else fails the attempt.
fn validate_vote_response(body: &str) -> Result<Option<serde_json::Value>> {
    if body.contains(TALLY_MARKER) {
        let tally: serde_json::Value =
            serde_json::from_str(body).context("could not read the election result")?;
        return Ok(Some(tally));
    }

    if body.contains(VOTE_ACCEPTED_MARKER) {
        return Ok(None);
    }

    let preview: String = body.chars().take(120).collect();
    bail!("unexpected voting response: {preview}")
}
