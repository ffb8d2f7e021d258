//! # Evaluation Context
//!
//! Inputs a render is evaluated against. Built per apply call, never stored.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Inputs for resolving directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationContext {
    /// Moment the render is evaluated at
    pub evaluation_instant: DateTime<Utc>,

    /// Zone calendar dates are taken in
    pub time_zone: Tz,

    /// Caller the render runs on behalf of
    pub acting_user_id: i64,
}

impl EvaluationContext {
    pub fn new(evaluation_instant: DateTime<Utc>, time_zone: Tz, acting_user_id: i64) -> Self {
        Self {
            evaluation_instant,
            time_zone,
            acting_user_id,
        }
    }

    /// Context evaluated at the current moment
    pub fn now(time_zone: Tz, acting_user_id: i64) -> Self {
        Self::new(Utc::now(), time_zone, acting_user_id)
    }

    /// Calendar date of the evaluation instant in the context's zone
    pub fn local_date(&self) -> NaiveDate {
        self.evaluation_instant
            .with_timezone(&self.time_zone)
            .date_naive()
    }
}
