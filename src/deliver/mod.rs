pub mod alert_matcher;
pub mod delivery;
pub mod render_message;
pub mod send_alerts_job;

pub use alert_matcher::AlertMatcher;
pub use delivery::DeliveryDriver;
pub use send_alerts_job::SendAlertsJob;

pub const JOB_TYPE: &str = "deliver";
