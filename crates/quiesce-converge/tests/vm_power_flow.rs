//! End-to-end power-off of one VM against a mock management plane: real
//! HTTP adapter, observation mapping, and the convergence engine together.

use std::time::Duration;

use quiesce_audit::AuditSink;
use quiesce_converge::ops::vm::VmPowerOp;
use quiesce_converge::converge;
use quiesce_core::{ConvergenceOutcome, ConvergencePolicy, Credentials, Endpoint, PowerState};
use quiesce_transport::{HttpHypervisorApi, RestConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn open_api(server: &MockServer) -> HttpHypervisorApi {
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tok-e2e")))
        .mount(server)
        .await;

    let addr = server.address();
    HttpHypervisorApi::connect(
        Endpoint::new(addr.ip().to_string(), addr.port()),
        &Credentials::new("admin", "secret"),
        RestConfig {
            use_tls: false,
            accept_invalid_certs: true,
            timeout: Duration::from_secs(5),
        },
    )
    .await
    .unwrap()
}

/// Zero-interval policy so the poll loop runs without wall-clock sleeps.
fn instant_policy() -> ConvergencePolicy {
    ConvergencePolicy::new(0, 5, 5)
}

#[tokio::test]
async fn powers_off_after_two_polls_with_one_command() {
    let server = MockServer::start().await;
    let api = open_api(&server).await;

    // The first two reads see the VM still on; the third sees it off.
    Mock::given(method("GET"))
        .and(path("/api/vms/vm-101/power"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "POWERED_ON" })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vms/vm-101/power"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "POWERED_OFF" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vms/vm-101/guest/shutdown"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut op = VmPowerOp::new(&api, "vm-101", PowerState::PoweredOff, true);
    let report = converge(
        &mut op,
        &PowerState::PoweredOff,
        &instant_policy(),
        &AuditSink::discard(),
    )
    .await;

    assert_eq!(report.outcome, ConvergenceOutcome::Converged);
    assert_eq!(report.attempts, 2);
    assert_eq!(report.last_observed, Some(PowerState::PoweredOff));
}

#[tokio::test]
async fn already_off_vm_is_never_commanded() {
    let server = MockServer::start().await;
    let api = open_api(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/vms/vm-101/power"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "POWERED_OFF" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vms/vm-101/guest/shutdown"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vms/vm-101/power"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut op = VmPowerOp::new(&api, "vm-101", PowerState::PoweredOff, true);
    let report = converge(
        &mut op,
        &PowerState::PoweredOff,
        &instant_policy(),
        &AuditSink::discard(),
    )
    .await;

    assert_eq!(report.outcome, ConvergenceOutcome::AlreadyConverged);
    assert_eq!(report.attempts, 0);
}

#[tokio::test]
async fn missing_vm_reports_target_not_found() {
    let server = MockServer::start().await;
    let api = open_api(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/vms/vm-999/power"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "no such vm" })))
        .mount(&server)
        .await;

    let mut op = VmPowerOp::new(&api, "vm-999", PowerState::PoweredOff, false);
    let report = converge(
        &mut op,
        &PowerState::PoweredOff,
        &instant_policy(),
        &AuditSink::discard(),
    )
    .await;

    assert_eq!(report.outcome, ConvergenceOutcome::TargetNotFound);
    assert_eq!(report.attempts, 0);
}

#[tokio::test]
async fn flapping_backend_times_out_with_last_observation() {
    let server = MockServer::start().await;
    let api = open_api(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/vms/vm-101/power"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "POWERED_ON" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vms/vm-101/power"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut op = VmPowerOp::new(&api, "vm-101", PowerState::PoweredOff, false);
    let report = converge(
        &mut op,
        &PowerState::PoweredOff,
        &ConvergencePolicy::new(0, 3, 5),
        &AuditSink::discard(),
    )
    .await;

    assert_eq!(report.outcome, ConvergenceOutcome::TimedOut);
    assert_eq!(report.attempts, 3);
    assert_eq!(report.last_observed, Some(PowerState::PoweredOn));
}
