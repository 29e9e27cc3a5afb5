use uuid::Uuid;

/// Error type for every fallible operation of the planner.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error("trip '{0}' not found")]
    TripNotFound(Uuid),

    #[error("suggested date '{0}' not found")]
    SuggestionNotFound(Uuid),

    #[error("trip '{0}' is not a group trip")]
    NotAGroupTrip(Uuid),

    #[error("holiday index {index} out of range ({len} holidays)")]
    HolidayIndexOutOfRange {
        index: usize,
        len: usize
    },

    #[error("invalid trip: {0}")]
    InvalidTrip(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("year {0} cannot be indexed")]
    YearOutOfRange(i32)
}

impl PlannerError {
    pub fn invalid_trip(reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidTrip(reason.into())
    }

    pub fn invalid_configuration(reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidConfiguration(reason.into())
    }
}
