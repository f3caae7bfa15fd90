use sporza_api::WeekSchedule;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    RefreshWeek,
}

#[derive(Debug)]
pub enum NetworkResponse {
    /// A full refresh cycle succeeded; replaces the cached week wholesale.
    WeekLoaded { week: WeekSchedule },
    Error { message: String },
}
