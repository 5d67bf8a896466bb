use study_core::model::Exercise;

use crate::error::PracticeError;

/// Selection result for a practice run.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticePlan {
    pub exercises: Vec<Exercise>,
    /// Due exercises in the pool before the limit was applied.
    pub due_total: usize,
}

impl PracticePlan {
    /// Keep the first `limit` due exercises in pool order.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::EmptyPool` for an empty pool,
    /// `PracticeError::InvalidLimit` for a zero limit and
    /// `PracticeError::NoDueExercises` when nothing in the pool is due.
    pub fn from_pool(
        pool: impl IntoIterator<Item = Exercise>,
        limit: usize,
    ) -> Result<Self, PracticeError> {
        let pool: Vec<Exercise> = pool.into_iter().collect();
        if pool.is_empty() {
            return Err(PracticeError::EmptyPool);
        }
        if limit == 0 {
            return Err(PracticeError::InvalidLimit);
        }

        let pool_size = pool.len();
        let mut due: Vec<Exercise> = pool.into_iter().filter(Exercise::is_due).collect();
        if due.is_empty() {
            return Err(PracticeError::NoDueExercises { pool_size });
        }

        let due_total = due.len();
        due.truncate(limit);
        Ok(Self {
            exercises: due,
            due_total,
        })
    }
}

/// Number of due exercises for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDue {
    pub topic: String,
    pub due: usize,
}

/// Due counts per topic, in the order topics first appear in the pool.
///
/// Topics with nothing due are listed with a count of 0.
#[must_use]
pub fn due_by_topic(pool: &[Exercise]) -> Vec<TopicDue> {
    let mut topics: Vec<TopicDue> = Vec::new();
    for exercise in pool {
        let increment = usize::from(exercise.is_due());
        match topics.iter_mut().find(|t| t.topic == exercise.topic()) {
            Some(entry) => entry.due += increment,
            None => topics.push(TopicDue {
                topic: exercise.topic().to_string(),
                due: increment,
            }),
        }
    }
    topics
}
