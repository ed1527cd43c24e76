use super::*;

#[test]
fn log_records_in_order() {
    let log = NotificationLog::new();
    log.notify(Notification::success("Job created successfully!"));
    log.notify(Notification::error("Sign-in failed"));
    assert_eq!(
        log.entries(),
        vec![Notification::success("Job created successfully!"), Notification::error("Sign-in failed")]
    );
    assert_eq!(log.count(NotificationLevel::Error), 1);
    assert_eq!(log.count(NotificationLevel::Success), 1);
}

#[test]
fn drain_empties_the_log() {
    let log = NotificationLog::new();
    log.notify(Notification::error("x"));
    assert_eq!(log.drain().len(), 1);
    assert!(log.entries().is_empty());
}

#[test]
fn tracing_notifier_accepts_both_levels() {
    TracingNotifier.notify(Notification::success("ok"));
    TracingNotifier.notify(Notification::error("nope"));
}
