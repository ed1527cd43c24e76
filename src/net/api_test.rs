use super::*;
use crate::net::error::TransportError;
use crate::state::notify::NotificationLevel;
use crate::test_support::{Harness, harness};

fn signin_body() -> String {
    serde_json::json!({
        "accessToken": "jwt-new",
        "refreshToken": "ref-new",
        "type": "Bearer",
        "id": 42,
        "username": "alice",
        "email": "alice@example.com",
        "roles": ["ROLE_EMPLOYER"]
    })
    .to_string()
}

fn job_payload() -> JobPayload {
    JobPayload {
        title: "Rust Engineer".to_owned(),
        description: "Systems work".to_owned(),
        location: "Remote".to_owned(),
        salary: 120_000.0,
        job_type: "FULL_TIME".to_owned(),
        company_id: 3,
    }
}

fn query_value<'a>(request: &'a ApiRequest, key: &str) -> Option<&'a str> {
    request.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

// =============================================================
// Endpoints and operation table
// =============================================================

#[test]
fn endpoints_match_backend_routes() {
    assert_eq!(auth_endpoint("signin"), "/api/auth/signin");
    assert_eq!(job_endpoint("12"), "/api/jobs/12");
    assert_eq!(jobs_by_company_endpoint("3"), "/api/jobs/company/3");
    assert_eq!(verify_company_endpoint("3"), "/api/companies/3/verify");
    assert_eq!(applications_by_job_endpoint("5"), "/api/applications/job/5");
    assert_eq!(applications_by_user_endpoint("7"), "/api/applications/user/7");
    assert_eq!(content_endpoint("admin"), "/api/test/admin");
}

#[test]
fn endpoint_ids_are_single_segments() {
    assert_eq!(job_endpoint("../admin"), "/api/jobs/..%2Fadmin");
    assert_eq!(company_endpoint("a b"), "/api/companies/a%20b");
}

#[test]
fn named_mutations_are_exactly_the_notifying_operations() {
    let named = [
        Operation::SignIn,
        Operation::SignUp,
        Operation::CreateJob,
        Operation::UpdateJob,
        Operation::DeleteJob,
        Operation::RegisterCompany,
        Operation::UpdateCompany,
        Operation::VerifyCompany,
        Operation::ApplyForJob,
        Operation::UpdateApplicationStatus,
        Operation::WithdrawApplication,
    ];
    for op in named {
        assert!(op.is_named_mutation(), "{}", op.name());
    }
    for op in [Operation::Logout, Operation::RefreshToken, Operation::ListJobs, Operation::AdminContent] {
        assert!(!op.is_named_mutation(), "{}", op.name());
    }
}

#[test]
fn credential_endpoints_never_carry_a_token() {
    for op in [Operation::SignIn, Operation::SignUp, Operation::RefreshToken, Operation::ConfirmRegistration] {
        assert_eq!(op.auth(), Auth::None, "{}", op.name());
    }
}

#[test]
fn error_message_prefers_json_fields() {
    assert_eq!(error_message(r#"{"message":"Bad credentials"}"#).as_deref(), Some("Bad credentials"));
    assert_eq!(error_message(r#"{"error":"Forbidden"}"#).as_deref(), Some("Forbidden"));
    let plain = "Error: Username is already taken!";
    assert_eq!(error_message(plain).as_deref(), Some(plain));
    assert_eq!(error_message("<html><body>502</body></html>"), None);
    assert_eq!(error_message("   "), None);
    assert_eq!(error_message(r#"{"status":500}"#), None);
}

#[test]
fn decode_text_unquotes_json_strings() {
    assert_eq!(decode_text("\"Admin Board.\""), "Admin Board.");
    assert_eq!(decode_text("Public Content."), "Public Content.");
}

// =============================================================
// Sign-in / sign-up
// =============================================================

#[tokio::test]
async fn sign_in_replaces_session_and_notifies_once() {
    let Harness { client, transport, notes, session } = harness();
    transport.reply(200, signin_body());

    let auth = client.sign_in("alice", "pw").await.unwrap();

    assert_eq!(auth.access_token, "jwt-new");
    let snapshot = session.snapshot();
    assert!(snapshot.is_logged_in);
    assert_eq!(snapshot.access_token.as_deref(), Some("jwt-new"));
    assert_eq!(snapshot.refresh_token.as_deref(), Some("ref-new"));
    assert!(snapshot.has_role(&Role::Employer));

    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/auth/signin");
    assert_eq!(request.bearer, None);
    assert_eq!(request.body, Some(serde_json::json!({ "username": "alice", "password": "pw" })));
    assert_eq!(notes.count(NotificationLevel::Success), 1);
    assert_eq!(notes.count(NotificationLevel::Error), 0);
}

#[tokio::test]
async fn sign_in_never_sends_existing_token() {
    let h = harness();
    h.sign_in_as(&[Role::JobSeeker]);
    h.transport.reply(200, signin_body());
    h.client.sign_in("alice", "pw").await.unwrap();
    assert_eq!(h.transport.last_request().bearer, None);
}

#[tokio::test]
async fn sign_in_rejection_leaves_session_and_surfaces_server_message() {
    let Harness { client, transport, notes, session } = harness();
    transport.reply(401, r#"{"message":"Bad credentials"}"#);

    let err = client.sign_in("alice", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(!session.is_logged_in());
    let entries = notes.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, NotificationLevel::Error);
    assert_eq!(entries[0].message, "Bad credentials");
}

#[tokio::test]
async fn sign_in_with_malformed_body_is_invalid_response() {
    let h = harness();
    h.sign_in_as(&[Role::JobSeeker]);
    h.transport.reply(200, r#"{"accessToken":"x","id":1,"username":"a","roles":[]}"#);

    let err = h.client.sign_in("alice", "pw").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidAuthResponse(_)), "{err:?}");
    // The previous session survives an unusable response.
    assert_eq!(h.session.access_token().as_deref(), Some("tok-1"));
    assert_eq!(h.notes.count(NotificationLevel::Error), 1);
}

#[tokio::test]
async fn sign_up_sends_role_and_uses_server_message() {
    let Harness { client, transport, notes, session } = harness();
    transport.reply(200, r#"{"message":"User registered successfully!"}"#);

    let response = client.sign_up("bob", "bob@example.com", "pw", &Role::JobSeeker).await.unwrap();

    assert_eq!(response.message, "User registered successfully!");
    assert!(!session.is_logged_in());
    let request = transport.last_request();
    assert_eq!(request.path, "/api/auth/signup");
    assert_eq!(request.body.unwrap()["role"], serde_json::json!(["job_seeker"]));
    assert_eq!(notes.entries()[0].message, "User registered successfully!");
}

#[tokio::test]
async fn sign_up_with_empty_body_uses_default_message() {
    let Harness { client, transport, notes, .. } = harness();
    transport.reply(200, "");
    client.sign_up("bob", "bob@example.com", "pw", &Role::Employer).await.unwrap();
    assert_eq!(notes.entries()[0].message, "Sign-up successful! Please check your email for verification.");
}

#[tokio::test]
async fn confirm_registration_passes_token_as_query() {
    let Harness { client, transport, notes, .. } = harness();
    transport.reply(200, "Account verified successfully!");

    let response = client.confirm_registration("abc-123").await.unwrap();

    assert_eq!(response.message, "Account verified successfully!");
    let request = transport.last_request();
    assert_eq!(request.path, "/api/auth/registrationConfirm");
    assert_eq!(query_value(&request, "token"), Some("abc-123"));
    assert!(notes.entries().is_empty());
}

// =============================================================
// Refresh / logout
// =============================================================

#[tokio::test]
async fn refresh_swaps_access_token_only() {
    let h = harness();
    h.sign_in_as(&[Role::Admin]);
    h.transport.reply(200, r#"{"accessToken":"tok-2","refreshToken":"ref-1","tokenType":"Bearer"}"#);

    h.client.refresh().await.unwrap();

    let request = h.transport.last_request();
    assert_eq!(request.path, "/api/auth/refreshtoken");
    assert_eq!(request.bearer, None);
    assert_eq!(request.body, Some(serde_json::json!({ "refreshToken": "ref-1" })));
    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.access_token.as_deref(), Some("tok-2"));
    assert!(snapshot.has_role(&Role::Admin));
}

#[tokio::test]
async fn refresh_without_session_sends_nothing() {
    let Harness { client, transport, .. } = harness();
    assert_eq!(client.refresh().await.unwrap_err(), ApiError::NotAuthenticated);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn logout_clears_session_on_success() {
    let h = harness();
    h.sign_in_as(&[Role::JobSeeker]);
    h.transport.reply(200, r#"{"message":"Log out successful!"}"#);

    h.client.logout().await.unwrap();

    assert_eq!(h.transport.last_request().bearer.as_deref(), Some("tok-1"));
    assert_eq!(h.session.snapshot(), crate::state::session::SessionSnapshot::default());
}

#[tokio::test]
async fn logout_clears_session_even_when_server_is_unreachable() {
    let h = harness();
    h.sign_in_as(&[Role::JobSeeker]);
    h.transport.fail(TransportError::Connect("connection refused".to_owned()));

    let err = h.client.logout().await.unwrap_err();

    assert!(err.is_transport());
    let snapshot = h.session.snapshot();
    assert!(!snapshot.is_logged_in);
    assert_eq!(snapshot.access_token, None);
    assert_eq!(snapshot.identity, None);
    assert!(h.notes.entries().is_empty());
}

#[tokio::test]
async fn logout_clears_session_on_server_error() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    h.transport.reply(500, "");
    assert_eq!(h.client.logout().await.unwrap_err().status(), Some(500));
    assert!(!h.session.is_logged_in());
}

// =============================================================
// Bearer rules
// =============================================================

#[tokio::test]
async fn browse_attaches_token_only_when_signed_in() {
    let h = harness();
    h.transport.reply(200, r#"{"content":[]}"#).reply(200, r#"{"content":[]}"#);

    h.client.list_jobs(0, 10).await.unwrap();
    assert_eq!(h.transport.last_request().bearer, None);

    h.sign_in_as(&[Role::JobSeeker]);
    h.client.list_jobs(1, 10).await.unwrap();
    let request = h.transport.last_request();
    assert_eq!(request.authorization().as_deref(), Some("Bearer tok-1"));
    assert_eq!(query_value(&request, "page"), Some("1"));
    assert_eq!(query_value(&request, "size"), Some("10"));
}

#[tokio::test]
async fn token_is_read_at_call_time() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    h.transport.reply(200, "[]").reply(200, "[]");

    h.client.jobs_by_company("3").await.unwrap();
    h.session.set_token("tok-9".to_owned()).unwrap();
    h.client.jobs_by_company("3").await.unwrap();

    let bearers: Vec<_> = h.transport.requests().into_iter().map(|r| r.bearer).collect();
    assert_eq!(bearers, vec![Some("tok-1".to_owned()), Some("tok-9".to_owned())]);
}

#[tokio::test]
async fn protected_call_without_session_fails_locally() {
    let Harness { client, transport, notes, .. } = harness();

    let err = client.create_job(&job_payload()).await.unwrap_err();

    assert_eq!(err, ApiError::NotAuthenticated);
    assert!(transport.requests().is_empty());
    assert_eq!(notes.count(NotificationLevel::Error), 1);
}

#[tokio::test]
async fn unauthorized_response_is_not_retried_and_keeps_session() {
    let h = harness();
    h.sign_in_as(&[Role::JobSeeker]);
    h.transport.reply(401, "");

    let err = h.client.my_applications().await.unwrap_err();

    assert!(err.is_authorization());
    assert_eq!(h.transport.requests().len(), 1);
    assert!(h.session.is_logged_in());
}

// =============================================================
// Notifications
// =============================================================

#[tokio::test]
async fn failed_mutation_notifies_exactly_once_and_returns_error() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    h.transport.reply(500, r#"{"message":"Database unavailable"}"#);

    let err = h.client.create_job(&job_payload()).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    let entries = h.notes.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, NotificationLevel::Error);
    assert_eq!(entries[0].message, "Database unavailable");
}

#[tokio::test]
async fn failed_mutation_without_server_message_uses_fallback() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    h.transport.fail(TransportError::Timeout);

    h.client.delete_job("12").await.unwrap_err();

    let entries = h.notes.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].message.starts_with("Failed to delete job"), "{}", entries[0].message);
}

#[tokio::test]
async fn successful_mutation_notifies_once() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    h.transport.reply(204, "");

    h.client.delete_job("12").await.unwrap();

    let request = h.transport.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/api/jobs/12");
    assert_eq!(h.notes.entries(), vec![Notification::success("Job deleted successfully!")]);
}

#[tokio::test]
async fn failed_read_does_not_notify() {
    let Harness { client, transport, notes, .. } = harness();
    transport.reply(503, "");
    assert!(client.list_jobs(0, 10).await.is_err());
    assert!(notes.entries().is_empty());
}

// =============================================================
// Jobs / companies / applications
// =============================================================

#[tokio::test]
async fn filter_sends_default_salary_bounds() {
    let Harness { client, transport, .. } = harness();
    transport.reply(200, r#"{"content":[]}"#);
    let filter = JobFilter { job_type: "CONTRACT".to_owned(), ..JobFilter::default() };

    client.filter_jobs(&filter, 0, 10).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.path, "/api/jobs/filter");
    assert_eq!(query_value(&request, "minSalary"), Some("0"));
    assert_eq!(query_value(&request, "maxSalary"), Some("999999999"));
    assert_eq!(query_value(&request, "jobType"), Some("CONTRACT"));
}

#[tokio::test]
async fn search_sends_trimmed_fields() {
    let Harness { client, transport, .. } = harness();
    transport.reply(200, r#"{"content":[{"id":1,"title":"Dev"}],"totalPages":1}"#);
    let search = JobSearch { title: " Dev ".to_owned(), ..JobSearch::default() };

    let page = client.search_jobs(&search, 0, 10).await.unwrap();

    assert_eq!(page.content[0].title, "Dev");
    assert_eq!(query_value(&transport.last_request(), "title"), Some("Dev"));
}

#[tokio::test]
async fn undecodable_read_is_decode_error() {
    let Harness { client, transport, .. } = harness();
    transport.reply(200, "not json");
    assert!(matches!(client.get_job("1").await.unwrap_err(), ApiError::Decode(_)));
}

#[tokio::test]
async fn verify_company_is_put_to_verify() {
    let h = harness();
    h.sign_in_as(&[Role::Admin]);
    h.transport.reply(200, r#"{"id":3,"name":"Acme","verified":true}"#);

    let company = h.client.verify_company("3").await.unwrap();

    assert!(company.verified);
    let request = h.transport.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/api/companies/3/verify");
    assert_eq!(h.notes.entries(), vec![Notification::success("Company verified successfully!")]);
}

#[tokio::test]
async fn apply_uses_session_user_and_resume_placeholder() {
    let h = harness();
    h.sign_in_as(&[Role::JobSeeker]);
    h.transport.reply(200, r#"{"id":"a1","jobId":5,"status":"PENDING"}"#);

    h.client.apply_for_job(5, "Hire me", Some("cv.pdf")).await.unwrap();

    let body = h.transport.last_request().body.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "jobId": 5, "userId": "7", "coverLetter": "Hire me", "resumeUrl": "/uploads/cv.pdf" })
    );
}

#[tokio::test]
async fn status_update_sends_wire_value() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    h.transport.reply(200, r#"{"id":"a1","status":"HIRED"}"#);

    let application = h.client.update_application_status("a1", &ApplicationStatus::Hired).await.unwrap();

    assert_eq!(application.status, ApplicationStatus::Hired);
    assert_eq!(h.transport.last_request().body, Some(serde_json::json!({ "status": "HIRED" })));
}

#[tokio::test]
async fn my_applications_without_session_sends_nothing() {
    let Harness { client, transport, notes, .. } = harness();
    assert_eq!(client.my_applications().await.unwrap_err(), ApiError::NotAuthenticated);
    assert!(transport.requests().is_empty());
    assert!(notes.entries().is_empty());
}

// =============================================================
// Tiered content
// =============================================================

#[tokio::test]
async fn public_content_is_anonymous_text() {
    let Harness { client, transport, .. } = harness();
    transport.reply(200, "Public Content.");
    assert_eq!(client.public_content().await.unwrap(), "Public Content.");
    assert_eq!(transport.last_request().path, "/api/test/all");
}

#[tokio::test]
async fn tier_denial_is_returned_without_notification() {
    let h = harness();
    h.sign_in_as(&[Role::JobSeeker]);
    h.transport.reply(403, "");

    let err = h.client.admin_content().await.unwrap_err();

    assert!(err.is_authorization());
    assert_eq!(err.user_message(Operation::AdminContent.failure_message()), "Access Denied for Admin Content.");
    assert!(h.notes.entries().is_empty());
}
