use std::time::Duration;

use booking_form::form::{
    FormController, FormOptions, InMemoryDraftStore, RuleTable, SimulatedSubmitter,
    SubmitOutcome, SubmitState,
};
use booking_form::schedule::{BookingWindow, format_date, local_today};
use booking_form::BookingForm;
use futures::executor::block_on;

#[test]
fn simulated_endpoint_completes_a_booking() {
    let store = InMemoryDraftStore::new();
    let controller = FormController::<BookingForm>::new(
        RuleTable::booking().expect("booking rules"),
        FormOptions {
            success_display: Duration::from_millis(5),
            ..FormOptions::default()
        },
    )
    .with_draft_store(store.clone());

    let window = BookingWindow::from_today(local_today());
    let date = window
        .earliest
        .succ_opt()
        .expect("tomorrow exists");
    assert!(window.contains(date));

    controller.input("name", "Bilal Ahmed").expect("name");
    controller.input("phone", "+92 321 7654321").expect("phone");
    controller.input("car", "Kia Sportage 2023").expect("car");
    controller.input("service", "ceramic").expect("service");
    controller.input("date", &format_date(date)).expect("date");

    let submitter = SimulatedSubmitter::seeded(42)
        .latency(Duration::from_millis(5))
        .success_rate(1.0);
    let report = block_on(controller.submit_and_settle(&submitter)).expect("submit");
    assert_eq!(report.outcome, SubmitOutcome::Succeeded);
    assert_eq!(report.visited.last(), Some(&SubmitState::Idle));
    assert_eq!(store.raw("prestigeFormData"), None);
    assert_eq!(
        controller.snapshot().expect("snapshot").submit_state,
        SubmitState::Idle
    );
}
