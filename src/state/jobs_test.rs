use super::*;
use crate::state::role::Role;
use crate::test_support::harness;

fn jobs_page(ids: &[u32], total_pages: u32) -> String {
    let content: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({ "id": id, "title": format!("Job {id}") }))
        .collect();
    serde_json::json!({ "content": content, "totalPages": total_pages, "totalElements": ids.len() }).to_string()
}

// =============================================================
// Query selection
// =============================================================

#[test]
fn search_text_wins_over_filter() {
    let search = JobSearch { title: "Rust".to_owned(), ..JobSearch::default() };
    let filter = JobFilter { location: "Remote".to_owned(), ..JobFilter::default() };
    assert_eq!(JobQuery::from_form(search.clone(), filter), JobQuery::Search(search));
}

#[test]
fn filter_used_without_search_text() {
    let filter = JobFilter { min_salary: Some(50_000.0), ..JobFilter::default() };
    assert_eq!(JobQuery::from_form(JobSearch::default(), filter.clone()), JobQuery::Filter(filter));
}

#[test]
fn blank_form_lists_everything() {
    let search = JobSearch { title: "   ".to_owned(), ..JobSearch::default() };
    assert_eq!(JobQuery::from_form(search, JobFilter::default()), JobQuery::All);
}

// =============================================================
// Board
// =============================================================

#[tokio::test]
async fn overlapping_fetches_keep_only_latest() {
    let h = harness();
    let mut board = JobBoard::new(10);
    h.transport.reply(200, jobs_page(&[1], 1)).reply(200, jobs_page(&[2, 3], 1));

    let slow = board.prepare(0);
    board.set_query(JobQuery::Search(JobSearch { title: "x".to_owned(), ..JobSearch::default() }));
    let fast = board.prepare(0);

    // The older request finishes last.
    let fast_done = fast.run(&h.client).await;
    let slow_done = slow.run(&h.client).await;
    assert!(board.complete(fast_done));
    assert!(!board.complete(slow_done));

    let ids: Vec<_> = board.list.items.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["1"]);
}

#[tokio::test]
async fn paging_moves_within_bounds() {
    let h = harness();
    let mut board = JobBoard::new(5);
    h.transport.reply(200, jobs_page(&[1], 2)).reply(200, jobs_page(&[6], 2));

    board.refresh(&h.client).await;
    board.next_page(&h.client).await;
    assert_eq!(board.list.page, 1);

    // Already on the last page: nothing is sent.
    board.next_page(&h.client).await;
    assert_eq!(h.transport.requests().len(), 2);
    let pages: Vec<_> = h
        .transport
        .requests()
        .iter()
        .map(|r| r.query.iter().find(|(k, _)| k == "page").map(|(_, v)| v.clone()))
        .collect();
    assert_eq!(pages, vec![Some("0".to_owned()), Some("1".to_owned())]);
}

#[tokio::test]
async fn fetch_failure_is_inline_without_notification() {
    let h = harness();
    let mut board = JobBoard::new(10);
    h.transport.reply(502, "");

    board.refresh(&h.client).await;

    assert_eq!(board.list.error.as_deref(), Some("Failed to fetch jobs"));
    assert!(h.notes.entries().is_empty());
}

#[tokio::test]
async fn delete_removes_row_on_success() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    let mut board = JobBoard::new(10);
    h.transport.reply(200, jobs_page(&[1, 2], 1)).reply(200, "");

    board.refresh(&h.client).await;
    board.delete(&h.client, "1").await.unwrap();

    assert_eq!(board.list.items.len(), 1);
    assert_eq!(board.list.message.as_deref(), Some("Job deleted successfully!"));
}

#[tokio::test]
async fn delete_failure_keeps_row_for_retry() {
    let h = harness();
    h.sign_in_as(&[Role::Employer]);
    let mut board = JobBoard::new(10);
    h.transport
        .reply(200, jobs_page(&[1], 1))
        .reply(403, r#"{"message":"Not your posting"}"#);

    board.refresh(&h.client).await;
    let err = board.delete(&h.client, "1").await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(board.list.items.len(), 1);
    assert_eq!(board.list.error.as_deref(), Some("Not your posting"));
}
