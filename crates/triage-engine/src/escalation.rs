use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};

/// Offset of the operating region: UTC+05:30.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 5 * 60 + 30;
pub const DEFAULT_WORK_START_HOUR: u32 = 9;
pub const DEFAULT_WORK_END_HOUR: u32 = 18;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EscalationError {
    #[error("UTC offset out of range: {0} minutes")]
    InvalidOffset(i32),
    #[error("invalid working window: {start}:00-{end}:00")]
    InvalidWindow { start: u32, end: u32 },
}

/// Weekday window during which critical documents go through the normal
/// review queue instead of an immediate alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkingHours {
    offset: FixedOffset,
    start_hour: u32,
    end_hour: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
                .expect("+05:30 is a valid offset"),
            start_hour: DEFAULT_WORK_START_HOUR,
            end_hour: DEFAULT_WORK_END_HOUR,
        }
    }
}

impl WorkingHours {
    /// Window `[start_hour, end_hour)` local time, Monday to Friday.
    pub fn new(
        utc_offset_minutes: i32,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Self, EscalationError> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60)
            .ok_or(EscalationError::InvalidOffset(utc_offset_minutes))?;
        if start_hour >= end_hour || end_hour > 24 {
            return Err(EscalationError::InvalidWindow {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            offset,
            start_hour,
            end_hour,
        })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// True when `now`, seen in the local offset, falls on a weekday inside
    /// the window.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.offset);
        let weekday = !matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
        let hour = local.hour();
        weekday && hour >= self.start_hour && hour < self.end_hour
    }
}

/// Critical documents arriving outside working hours are escalated.
pub fn should_send_immediate_alert(is_critical: bool, is_working_hours: bool) -> bool {
    is_critical && !is_working_hours
}
