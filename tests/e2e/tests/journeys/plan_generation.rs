//! Journey: a learner generates a study plan for an upcoming exam

use cadence_core::planning::{available_dates, ALL_WEEKDAYS};
use cadence_core::prelude::*;
use cadence_core::{PlanError, SchedulerError};
use cadence_e2e_tests::{TestDataFactory, TestDatabaseManager};
use chrono::{Duration, Weekday};

#[test]
fn test_plan_respects_prerequisites_across_subjects() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();
    let today = TestDataFactory::today();
    let dates = available_dates(today, today + Duration::days(13), &ALL_WEEKDAYS);

    let plan = scheduler
        .build_plan(
            "learner-1",
            &[TestDataFactory::linear_algebra(), TestDataFactory::biology()],
            &dates,
            TestDataFactory::now(),
        )
        .unwrap();

    assert_eq!(plan.total_topics(), 7);
    assert_eq!(plan.overflow_placements, 0);
    assert_eq!(plan.daily_capacity_hours, 3.0);

    let order = ["Vectors", "Matrices", "Determinants", "Eigenvalues"];
    for pair in order.windows(2) {
        assert!(plan.date_of(pair[0]).unwrap() <= plan.date_of(pair[1]).unwrap());
    }
    assert!(plan.date_of("Cells").unwrap() <= plan.date_of("Genetics").unwrap());

    // Each subject fits on its own, so only merged days may exceed capacity
    for day in plan.days.values() {
        for subject in ["Linear Algebra", "Biology"] {
            let hours: f64 = day
                .topics
                .iter()
                .filter(|t| t.subject == subject)
                .map(|t| t.estimated_hours)
                .sum();
            assert!(hours <= plan.daily_capacity_hours);
        }
    }

    assert_eq!(plan.milestones.len(), 4);
    assert_eq!(plan.milestones[3].topics_scheduled, 7);
    assert!(plan.insights[0].starts_with("Total study time planned"));
}

#[test]
fn test_profile_drives_capacity_and_tips() {
    let db = TestDatabaseManager::new_temp();
    db.store
        .upsert_profile("learner-1", &TestDataFactory::visual_morning_profile())
        .unwrap();
    let scheduler = db.scheduler();
    let today = TestDataFactory::today();
    let dates = available_dates(today, today + Duration::days(6), &ALL_WEEKDAYS);

    let plan = scheduler
        .build_plan("learner-1", &[TestDataFactory::linear_algebra()], &dates, TestDataFactory::now())
        .unwrap();

    assert!((plan.daily_capacity_hours - 4.4).abs() < 1e-9);
    assert!(plan.insights.iter().any(|i| i.contains("diagrams")));
}

#[test]
fn test_weekday_only_plan_with_overflow() {
    let db = TestDatabaseManager::new_temp();
    db.store
        .upsert_profile("learner-1", &TestDataFactory::short_attention_profile())
        .unwrap();
    let scheduler = db.scheduler();

    // Monday to Sunday, Mondays and Thursdays only
    let today = TestDataFactory::today();
    let dates = available_dates(today, today + Duration::days(6), &[Weekday::Mon, Weekday::Thu]);
    assert_eq!(dates.len(), 2);

    let plan = scheduler
        .build_plan("learner-1", &[TestDataFactory::linear_algebra()], &dates, TestDataFactory::now())
        .unwrap();

    assert!((plan.daily_capacity_hours - 1.8).abs() < 1e-9);
    assert_eq!(plan.total_topics(), 4);
    assert!(plan.overflow_placements > 0);
    assert!(plan.days.values().any(|d| d.overflowed));
    assert!(plan.insights.iter().any(|i| i.contains("did not fit")));
    assert!(plan.days.keys().all(|d| dates.contains(d)));
}

#[test]
fn test_cycles_are_reported_not_fatal() {
    let db = TestDatabaseManager::new_temp();
    let today = TestDataFactory::today();
    let dates = available_dates(today, today + Duration::days(2), &ALL_WEEKDAYS);

    let plan = db
        .scheduler()
        .build_plan("learner-1", &[TestDataFactory::cyclic_subject()], &dates, TestDataFactory::now())
        .unwrap();

    assert_eq!(plan.total_topics(), 2);
    assert_eq!(plan.ignored_cycle_edges.len(), 1);
    assert!(plan.insights.iter().any(|i| i.contains("circular")));
}

#[test]
fn test_latest_plan_is_replaced_and_survives_reopen() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();
    let today = TestDataFactory::today();
    let dates = available_dates(today, today + Duration::days(9), &ALL_WEEKDAYS);

    scheduler
        .build_plan("learner-1", &[TestDataFactory::biology()], &dates, TestDataFactory::now())
        .unwrap();
    let second = scheduler
        .build_plan("learner-1", &[TestDataFactory::linear_algebra()], &dates, TestDataFactory::now())
        .unwrap();

    let reopened = db.reopen();
    let latest = reopened.latest_plan("learner-1").unwrap().unwrap();
    assert_eq!(latest, second);
    assert!(reopened.latest_plan("learner-2").unwrap().is_none());
}

#[test]
fn test_precondition_failures() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();
    let today = TestDataFactory::today();

    // Saturday and Sunday only, on a range with neither
    let weekend_only = available_dates(today, today + Duration::days(4), &[Weekday::Sat, Weekday::Sun]);
    assert!(matches!(
        scheduler.build_plan("learner-1", &[TestDataFactory::biology()], &weekend_only, TestDataFactory::now()),
        Err(SchedulerError::Plan(PlanError::NoAvailableDays))
    ));

    let dates = available_dates(today, today + Duration::days(4), &ALL_WEEKDAYS);
    assert!(matches!(
        scheduler.build_plan("learner-1", &[Subject::new("Empty", vec![])], &dates, TestDataFactory::now()),
        Err(SchedulerError::Plan(PlanError::EmptySubjectList))
    ));
    assert!(scheduler.latest_plan("learner-1").unwrap().is_none());
}
