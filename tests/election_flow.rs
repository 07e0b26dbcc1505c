//! End-to-end election runs against a mocked Great Bear Council site.
//!
//! The mock serves the full four-step sequence: voting form page with a
//! session cookie and carnivore value, `hastorni.js` with ursidae char
//! codes and the kretzoi letter mapping, `daxiongmao.js` with the
//! rogue-racoons hash and a fresh session, and the voting endpoint itself.
//! Cookie propagation is enforced by the mock matchers: a request carrying
//! the wrong session never matches and the attempt fails.

use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pandavote::ballot::Decision;
use pandavote::cli::vote_cmd;
use pandavote::election::{self, ElectionConfig};

const TRIAL_KEY: &str = "A3F3D333452DF83D32A387F3FC3-GUBA";
const VOTING_PATH: &str = "/ursidaecarinove_eating_bambu_must_die";
const FINAL_VOTER: &str = "beary_pawsitively_forbearance";

fn config_for(server: &MockServer) -> ElectionConfig {
    ElectionConfig {
        base_url: server.uri(),
        trial_key: TRIAL_KEY.to_string(),
        timeout_ms: 5_000,
        max_attempts: 3,
    }
}

fn form_page_html() -> String {
    r#"<html><body>
        <h1>The Great Bear Council panda election</h1>
        <div id="carnivoreatingbambu"><input type="hidden" value="ursusarctos"></div>
    </body></html>"#
        .to_string()
}

fn hastorni_js() -> String {
    let char_codes: Vec<u32> = "||bearcool||".chars().map(|c| c as u32).collect();

    // Map every lowercase letter plus underscore, as the live site does.
    let mut letters = serde_json::Map::new();
    for (i, c) in ('a'..='z').chain(std::iter::once('_')).enumerate() {
        letters.insert(c.to_string(), serde_json::json!(100 + i as i64));
    }

    format!(
        "var ursidae = {};\nvar kretzoi = {};\n",
        serde_json::to_string(&char_codes).unwrap(),
        serde_json::to_string(&letters).unwrap(),
    )
}

fn daxiongmao_js() -> String {
    r#"window.__guard = '<input name="rogue_racoons" value="c4ca4238a0b923820dcc509a6f75849b">';"#
        .to_string()
}

/// Mount the three token-source resources. Vote endpoint mocks are mounted
/// separately by each test.
async fn mount_token_sources(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("trial_key", TRIAL_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=first-jar; Path=/; HttpOnly")
                .set_body_string(form_page_html()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hastorni.js"))
        .and(header("cookie", "session=first-jar"))
        .respond_with(ResponseTemplate::new(200).set_body_string(hastorni_js()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/daxiongmao.js"))
        .and(query_param("key", "aadfa"))
        .and(header("cookie", "session=first-jar"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=second-jar; Path=/")
                .set_body_string(daxiongmao_js()),
        )
        .mount(server)
        .await;
}

/// Mount the voting endpoint: acceptance message for the first four
/// voters, final tally JSON for the last one. The fresh session cookie
/// from daxiongmao.js is required.
async fn mount_vote_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(VOTING_PATH))
        .and(header("cookie", "session=second-jar"))
        .and(body_string_contains(format!("username={FINAL_VOTER}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"pandas_future": "bright", "votes_for_survival": 3, "votes_against": 2}"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(VOTING_PATH))
        .and(header("cookie", "session=second-jar"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Thank you bearepresentative!"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_election_records_five_votes_and_tally() {
    let server = MockServer::start().await;
    mount_token_sources(&server).await;
    mount_vote_endpoint(&server).await;

    let report = election::run(&config_for(&server), Decision::Live)
        .await
        .unwrap();

    assert_eq!(report.voters.len(), 5);
    assert!(report.voters.iter().all(|v| v.attempts == 1));

    let last = report.voters.last().unwrap();
    assert_eq!(last.name, FINAL_VOTER);
    assert_eq!(last.survive, "1");

    let tally = report.tally.as_ref().unwrap();
    assert_eq!(tally["pandas_future"], "bright");

    // Exactly one vote POST per voter.
    let requests = server.received_requests().await.unwrap();
    let votes = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == VOTING_PATH)
        .count();
    assert_eq!(votes, 5);
}

#[tokio::test]
async fn final_vote_carries_cli_decision() {
    let server = MockServer::start().await;
    mount_token_sources(&server).await;
    mount_vote_endpoint(&server).await;

    let report = election::run(&config_for(&server), Decision::Die)
        .await
        .unwrap();
    assert_eq!(report.voters.last().unwrap().survive, "0");

    let requests = server.received_requests().await.unwrap();
    let final_vote_body = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .find(|b| b.contains(FINAL_VOTER))
        .unwrap();
    assert!(final_vote_body.contains("survive=0"));
    assert!(final_vote_body.contains("rogue_racoons=c4ca4238a0b923820dcc509a6f75849b"));
}

#[tokio::test]
async fn failed_vote_retries_with_a_different_fingerprint() {
    let server = MockServer::start().await;
    mount_token_sources(&server).await;

    // The council blocks the very first vote submission once.
    Mock::given(method("POST"))
        .and(path(VOTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("The Great Bear Council smells a bot"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_vote_endpoint(&server).await;

    let report = election::run(&config_for(&server), Decision::Live)
        .await
        .unwrap();

    assert_eq!(report.voters[0].attempts, 2);
    assert!(report.voters[1..].iter().all(|v| v.attempts == 1));

    // The retried attempt restarted from the form page with a fresh
    // user-agent.
    let requests = server.received_requests().await.unwrap();
    let form_page_uas: Vec<String> = requests
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/")
        .map(|r| {
            r.headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    assert_eq!(form_page_uas.len(), 6);
    assert_ne!(form_page_uas[0], form_page_uas[1]);
}

#[tokio::test]
async fn transient_script_failure_is_retried_without_a_sequence_restart() {
    let server = MockServer::start().await;

    // hastorni.js stumbles once with a 500 before recovering.
    Mock::given(method("GET"))
        .and(path("/hastorni.js"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_token_sources(&server).await;
    mount_vote_endpoint(&server).await;

    let report = election::run(&config_for(&server), Decision::Live)
        .await
        .unwrap();

    // The 500 was absorbed by the client's in-place retry: every voter
    // still needed a single attempt.
    assert!(report.voters.iter().all(|v| v.attempts == 1));

    // And the form page was fetched exactly once per voter, so the
    // sequence never restarted.
    let requests = server.received_requests().await.unwrap();
    let form_page_gets = requests
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/")
        .count();
    assert_eq!(form_page_gets, 5);
}

#[tokio::test]
async fn blocked_votes_abort_without_a_result_file() {
    let server = MockServer::start().await;
    mount_token_sources(&server).await;

    // Every submission is rejected; no success mock at all.
    Mock::given(method("POST"))
        .and(path(VOTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("The Great Bear Council smells a bot"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let results_dir = dir.path().join("results");

    let config = ElectionConfig {
        max_attempts: 2,
        ..config_for(&server)
    };
    let result = vote_cmd::run(Decision::Live, config, &results_dir).await;

    // The error names the exhausted voter and still carries the last
    // attempt's failure, the only diagnostic a hard block produces.
    let chain = format!("{:#}", result.unwrap_err());
    assert!(chain.contains("exhausted 2 attempts"));
    assert!(chain.contains("unexpected voting response"));

    assert!(!results_dir.exists());
}
