use garde::Validate;
use kernel::model::availability::event::RescheduleSlot;
use kernel::model::availability::slot::{Availability, ResolvedSlot};
use kernel::model::availability::{BlockedSlot, DayOfWeek, Hour, SlotDate};
use kernel::service::reassignment::ReassignmentResult;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSlotResponse {
    pub hour: u8,
    pub start: String,
    pub end: String,
    pub duration: u8,
    pub display_time: String,
}

impl From<ResolvedSlot> for ResolvedSlotResponse {
    fn from(value: ResolvedSlot) -> Self {
        let ResolvedSlot {
            hour,
            start,
            end,
            duration,
            display_time,
        } = value;
        Self {
            hour: hour.value(),
            start,
            end,
            duration,
            display_time,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub date: String,
    pub is_specific_date: bool,
    pub degraded: bool,
    pub slots: Vec<ResolvedSlotResponse>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(value: Availability) -> Self {
        let Availability {
            date,
            is_specific_date,
            degraded,
            slots,
        } = value;
        Self {
            date: date.to_string(),
            is_specific_date,
            degraded,
            slots: slots.into_iter().map(ResolvedSlotResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertHoursRequest {
    #[garde(inner(range(min = 0, max = 23)))]
    pub hours: Vec<i32>,
}

impl UpsertHoursRequest {
    pub fn into_hours(self) -> Result<Vec<Hour>, AppError> {
        self.hours.into_iter().map(Hour::new).collect()
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlockedSlotRequest {
    #[garde(range(min = 0, max = 23))]
    pub hour: i32,
    #[garde(skip)]
    pub is_recurring: bool,
    #[garde(range(min = 0, max = 6))]
    pub day_of_week: Option<i32>,
    #[garde(skip)]
    pub date: Option<String>,
}

impl TryFrom<BlockedSlotRequest> for BlockedSlot {
    type Error = AppError;

    fn try_from(value: BlockedSlotRequest) -> Result<Self, Self::Error> {
        let BlockedSlotRequest {
            hour,
            is_recurring,
            day_of_week,
            date,
        } = value;
        let hour = Hour::new(hour)?;
        match (is_recurring, day_of_week, date) {
            (true, Some(day_of_week), None) => {
                Ok(BlockedSlot::recurring(hour, DayOfWeek::new(day_of_week)?))
            }
            (false, None, Some(date)) => Ok(BlockedSlot::one_off(hour, SlotDate::new(&date)?)),
            _ => Err(AppError::UnprocessableEntity(
                "isRecurring に応じて dayOfWeek か date のどちらか一方だけを指定してください"
                    .into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReassignSlotRequest {
    #[garde(range(min = 0, max = 23))]
    pub old_hour: i32,
    #[garde(range(min = 0, max = 6))]
    pub old_day_of_week: i32,
    #[garde(range(min = 0, max = 23))]
    pub new_hour: i32,
    #[garde(range(min = 0, max = 6))]
    pub new_day_of_week: i32,
}

impl TryFrom<ReassignSlotRequest> for RescheduleSlot {
    type Error = AppError;

    fn try_from(value: ReassignSlotRequest) -> Result<Self, Self::Error> {
        let ReassignSlotRequest {
            old_hour,
            old_day_of_week,
            new_hour,
            new_day_of_week,
        } = value;
        Ok(RescheduleSlot::new(
            Hour::new(old_hour)?,
            DayOfWeek::new(old_day_of_week)?,
            Hour::new(new_hour)?,
            DayOfWeek::new(new_day_of_week)?,
        ))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignmentResponse {
    pub changed: bool,
    pub new_slot_blocked: bool,
    pub old_slot_released: bool,
    pub requires_follow_up: bool,
}

impl From<ReassignmentResult> for ReassignmentResponse {
    fn from(value: ReassignmentResult) -> Self {
        let requires_follow_up = value.requires_follow_up();
        let ReassignmentResult {
            changed,
            new_slot_blocked,
            old_slot_released,
        } = value;
        Self {
            changed,
            new_slot_blocked,
            old_slot_released,
            requires_follow_up,
        }
    }
}
