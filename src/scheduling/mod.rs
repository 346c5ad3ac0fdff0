mod alarm;
mod scheduler;
mod tokio_alarm;

pub use alarm::{AlarmError, AlarmFacility, AlarmHandler};
pub use scheduler::{ExamReminderScheduler, ScheduleError};
pub use tokio_alarm::TokioAlarmFacility;
