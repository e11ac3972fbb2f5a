/// End-to-end tests over real HTTP.
///
/// Each test starts the crate's mock engine on an ephemeral loopback port and
/// points an `HttpEndpoint` at it, so status codes, content types and body
/// decoding all go through `ureq` and `tiny_http` for real.
use aether::analysis::{AnalysisOutcome, RequestFailure, UNAVAILABLE_MESSAGE};
use aether::client::{HttpEndpoint, request_analysis};
use aether::controller::{AnalysisController, UiPhase, UiSinks};
use aether::mock::{self, Scenario};
use aether::render::html::HtmlResults;
use aether::render::memory::{MemoryResults, MemorySpinner, MemoryStatus, MemoryTrigger};
use aether::render::{CLOSE_LABEL, RAW_ANOMALY_TITLE};

fn outcome_for(scenario: Scenario) -> AnalysisOutcome {
    let engine = mock::spawn(scenario).expect("mock engine starts");
    request_analysis(&HttpEndpoint::new(engine.url()))
}

#[test]
fn anomaly_scenario_over_http() {
    let outcome = outcome_for(Scenario::Anomaly);
    let AnalysisOutcome::AnomalyFound {
        raw_anomaly_details,
        strategic_analysis,
    } = outcome
    else {
        panic!("expected anomaly, got {outcome:?}");
    };
    assert_eq!(raw_anomaly_details["symbol"], "IBM");
    assert!(strategic_analysis.starts_with("Volume is below"));
}

#[test]
fn normal_scenario_over_http() {
    assert_eq!(outcome_for(Scenario::Normal).kind(), "normal_status");
}

#[test]
fn unknown_and_error_scenarios_are_not_failures() {
    assert_eq!(
        outcome_for(Scenario::Unknown),
        AnalysisOutcome::UnknownResponse { error: None }
    );
    assert_eq!(
        outcome_for(Scenario::Error),
        AnalysisOutcome::UnknownResponse {
            error: Some("Could not fetch market data.".to_string())
        }
    );
}

#[test]
fn non_2xx_is_http_failure_even_with_json_body() {
    assert_eq!(
        outcome_for(Scenario::HttpError),
        AnalysisOutcome::failed(RequestFailure::Http { status: 503 })
    );
}

#[test]
fn html_body_is_malformed() {
    assert!(matches!(
        outcome_for(Scenario::Malformed),
        AnalysisOutcome::RequestFailed {
            failure: RequestFailure::Malformed(_)
        }
    ));
}

#[test]
fn unknown_path_is_http_404() {
    let engine = mock::spawn(Scenario::Anomaly).unwrap();
    let endpoint = HttpEndpoint::new(&format!("{}/nope", engine.base_url()));
    assert_eq!(
        request_analysis(&endpoint),
        AnalysisOutcome::failed(RequestFailure::Http { status: 404 })
    );
}

#[test]
fn closed_port_is_transport_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let outcome = request_analysis(&HttpEndpoint::new(&format!(
        "http://127.0.0.1:{port}/analyze"
    )));
    assert!(matches!(
        outcome,
        AnalysisOutcome::RequestFailed {
            failure: RequestFailure::Transport(_)
        }
    ));
}

#[test]
fn full_cycle_against_mock_engine() {
    let engine = mock::spawn(Scenario::Normal).unwrap();

    let mut trigger = MemoryTrigger::default();
    let mut status = MemoryStatus::default();
    let mut spinner = MemorySpinner::default();
    let mut results = MemoryResults::default();
    {
        let mut controller = AnalysisController::new(
            HttpEndpoint::new(engine.url()),
            UiSinks {
                trigger: &mut trigger,
                status: &mut status,
                spinner: &mut spinner,
                results: &mut results,
            },
            "$",
        );
        let activation = controller.activate();
        assert_eq!(activation.phase, UiPhase::Complete);
    }

    assert_eq!(results.cards.len(), 1);
    assert_eq!(results.cards[0].field(CLOSE_LABEL), Some("$949.50"));
    assert!(trigger.enabled);
    assert!(!spinner.visible);
}

#[test]
fn html_cycle_against_failing_engine() {
    let engine = mock::spawn(Scenario::HttpError).unwrap();

    let mut trigger = MemoryTrigger::default();
    let mut status = MemoryStatus::default();
    let mut spinner = MemorySpinner::default();
    let mut results = HtmlResults::default();
    {
        let mut controller = AnalysisController::new(
            HttpEndpoint::new(engine.url()),
            UiSinks {
                trigger: &mut trigger,
                status: &mut status,
                spinner: &mut spinner,
                results: &mut results,
            },
            "$",
        );
        assert_eq!(controller.activate().phase, UiPhase::Failed);
    }

    assert!(results.fragments().is_empty());
    assert_eq!(status.text, UNAVAILABLE_MESSAGE);
    assert!(trigger.enabled);
}

#[test]
fn html_cycle_renders_anomaly_cards() {
    let engine = mock::spawn(Scenario::Anomaly).unwrap();

    let mut trigger = MemoryTrigger::default();
    let mut status = MemoryStatus::default();
    let mut spinner = MemorySpinner::default();
    let mut results = HtmlResults::default();
    {
        let mut controller = AnalysisController::new(
            HttpEndpoint::new(engine.url()),
            UiSinks {
                trigger: &mut trigger,
                status: &mut status,
                spinner: &mut spinner,
                results: &mut results,
            },
            "$",
        );
        controller.activate();
    }

    let fragments = results.fragments();
    assert_eq!(fragments.len(), 2);
    assert!(fragments[0].contains(&format!("<h2>{RAW_ANOMALY_TITLE}</h2>")));
    assert!(fragments[0].contains("&quot;symbol&quot;: &quot;IBM&quot;"));
}
