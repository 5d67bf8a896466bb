use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use services::{ErrorKind, GoalTracker};
use study_core::model::{
    Achievement, AchievementId, Experience, Goal, GoalDraft, GoalId, GoalKind, Rarity,
};
use study_core::time::fixed_clock;

fn deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
}

fn fresh_goal(id: u64, target: f64, milestones: Vec<f64>, xp: u32) -> Goal {
    GoalDraft::new(format!("goal {id}"), GoalKind::StudyTime, target, "hours", deadline())
        .with_milestones(milestones)
        .with_xp_reward(xp)
        .validate()
        .unwrap()
        .assign_id(GoalId::new(id))
}

#[test]
fn initial_counts_round_trip() {
    let mut done = fresh_goal(1, 10.0, vec![], 100);
    done.record_progress(10.0, deadline()).unwrap();
    let goals = vec![done, fresh_goal(2, 5.0, vec![], 50), fresh_goal(3, 8.0, vec![], 20)];

    let stats = GoalTracker::new(goals, []).with_clock(fixed_clock()).stats();
    assert_eq!(stats.total_goals, 3);
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.active_count, 2);
    assert_eq!(stats.total_xp, 100);
}

#[test]
fn negative_progress_is_validation_and_atomic() {
    let mut tracker = GoalTracker::new([fresh_goal(1, 10.0, vec![5.0], 0)], []);
    tracker.update_progress(GoalId::new(1), 3.0).unwrap();

    let err = tracker.update_progress(GoalId::new(1), -1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(tracker.goal(GoalId::new(1)).unwrap().current(), 3.0);
    assert!(!tracker.milestone_states(GoalId::new(1)).unwrap()[0].completed);
}

#[test]
fn xp_counts_each_reward_once() {
    let achievements = [
        Achievement::new(AchievementId::new(1), "Speed Reader", "", 150, Rarity::Rare).unwrap(),
        Achievement::new(AchievementId::new(2), "Perfect Focus", "", 250, Rarity::Legendary)
            .unwrap(),
    ];
    let mut tracker =
        GoalTracker::new([fresh_goal(1, 4.0, vec![], 350)], achievements).with_clock(fixed_clock());

    for _ in 0..3 {
        tracker.update_progress(GoalId::new(1), 4.0).unwrap();
        tracker.unlock_achievement(AchievementId::new(1)).unwrap();
    }
    let stats = tracker.stats();
    assert_eq!(stats.total_xp, 500);
    assert_eq!(stats.level, 2);
}

#[test]
fn goal_past_deadline_reads_overdue_until_completed() {
    let mut clock = fixed_clock();
    clock.advance(Duration::days(365 * 10));
    let mut tracker = GoalTracker::new([fresh_goal(1, 2.0, vec![], 10)], []).with_clock(clock);
    assert_eq!(tracker.stats().overdue_count, 1);

    tracker.update_progress(GoalId::new(1), 2.0).unwrap();
    let stats = tracker.stats();
    assert_eq!(stats.overdue_count, 0);
    assert_eq!(stats.completed_count, 1);
}

proptest! {
    #[test]
    fn percent_stays_in_range(target in 1u32..1_000, updates in prop::collection::vec(0u32..2_000, 1..8)) {
        let mut tracker = GoalTracker::new([fresh_goal(1, f64::from(target), vec![], 0)], []);
        for value in updates {
            tracker.update_progress(GoalId::new(1), f64::from(value)).unwrap();
            let percent = tracker.progress_percent(GoalId::new(1)).unwrap();
            prop_assert!((0.0..=100.0).contains(&percent));
            prop_assert_eq!(percent == 100.0, value >= target);
        }
    }

    #[test]
    fn completed_milestones_never_revert(updates in prop::collection::vec(0u32..=100, 1..12)) {
        let mut tracker = GoalTracker::new(
            [fresh_goal(1, 100.0, vec![25.0, 50.0, 75.0, 100.0], 0)],
            [],
        );
        let mut seen_max = 0u32;
        for value in updates {
            tracker.update_progress(GoalId::new(1), f64::from(value)).unwrap();
            seen_max = seen_max.max(value);
            for milestone in tracker.milestone_states(GoalId::new(1)).unwrap() {
                prop_assert_eq!(milestone.completed, milestone.threshold <= f64::from(seen_max));
            }
        }
    }

    #[test]
    fn level_matches_formula(total in 0u64..100_000) {
        prop_assert_eq!(Experience::from_total(total, 500).level(), total / 500 + 1);
    }
}
