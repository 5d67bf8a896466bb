use std::io::{self, Write};

use services::{GoalTracker, due_by_topic};
use study_core::model::{Exercise, GoalStatus, Rarity};

fn status_label(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Active => "active",
        GoalStatus::Completed => "completed",
        GoalStatus::Overdue => "overdue",
    }
}

fn rarity_label(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "common",
        Rarity::Rare => "rare",
        Rarity::Epic => "epic",
        Rarity::Legendary => "legendary",
    }
}

/// Render the goal dashboard as plain text.
pub fn write_stats(
    out: &mut impl Write,
    tracker: &GoalTracker,
    exercises: &[Exercise],
) -> io::Result<()> {
    let stats = tracker.stats();
    let experience = tracker.experience();

    writeln!(
        out,
        "Level {} · {} XP ({} to next level)",
        stats.level,
        stats.total_xp,
        experience.xp_to_next_level()
    )?;
    writeln!(
        out,
        "Goals: {} total, {} active, {} completed, {} overdue, {}% average progress",
        stats.total_goals,
        stats.active_count,
        stats.completed_count,
        stats.overdue_count,
        stats.average_progress
    )?;

    for goal in tracker.goals() {
        let status = tracker.status(goal.id()).unwrap_or(goal.status());
        writeln!(out)?;
        writeln!(out, "[{}] {}", status_label(status), goal.title())?;
        write!(
            out,
            "    {}/{} {} ({:.1}%)",
            goal.current(),
            goal.target(),
            goal.unit(),
            goal.progress_percent()
        )?;
        if status != GoalStatus::Completed {
            if let Ok(deadline) = tracker.deadline_status(goal.id()) {
                write!(out, " · {deadline}")?;
            }
        }
        writeln!(out, " · {} XP", goal.xp_reward())?;

        if !goal.milestones().is_empty() {
            let marks: Vec<String> = goal
                .milestones()
                .iter()
                .map(|m| format!("{} {}", if m.completed { "✓" } else { "·" }, m.threshold))
                .collect();
            writeln!(out, "    milestones: {}", marks.join("  "))?;
        }
    }

    if !tracker.achievements().is_empty() {
        writeln!(out)?;
        writeln!(out, "Achievements:")?;
        for achievement in tracker.achievements() {
            writeln!(
                out,
                "  [{}] {} ({}, {} XP)",
                if achievement.is_unlocked() { "x" } else { " " },
                achievement.title(),
                rarity_label(achievement.rarity()),
                achievement.xp_reward()
            )?;
        }
    }

    let topics = due_by_topic(exercises);
    if !topics.is_empty() {
        writeln!(out)?;
        writeln!(out, "Exercises due:")?;
        for topic in topics {
            let name = if topic.topic.is_empty() { "(no topic)" } else { topic.topic.as_str() };
            writeln!(out, "  {name}: {}", topic.due)?;
        }
    }

    Ok(())
}
