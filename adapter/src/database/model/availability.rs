use kernel::model::availability::{
    BlockScope, BlockedSlot, DateOverride, DayOfWeek, Hour, SlotDate, WeekdayTemplate,
};
use serde_json::Value as JsonValue;
use shared::error::AppError;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct WeeklyTemplateRow {
    pub day_of_week: i32,
    pub hours: JsonValue,
}

impl TryFrom<WeeklyTemplateRow> for WeekdayTemplate {
    type Error = AppError;

    fn try_from(value: WeeklyTemplateRow) -> Result<Self, Self::Error> {
        let WeeklyTemplateRow { day_of_week, hours } = value;
        Ok(WeekdayTemplate {
            day_of_week: DayOfWeek::new(day_of_week)?,
            hours: coerce_hours(&hours),
        })
    }
}

#[derive(FromRow)]
pub struct DateOverrideRow {
    pub slot_date: String,
    pub hours: JsonValue,
}

impl TryFrom<DateOverrideRow> for DateOverride {
    type Error = AppError;

    fn try_from(value: DateOverrideRow) -> Result<Self, Self::Error> {
        let DateOverrideRow { slot_date, hours } = value;
        Ok(DateOverride {
            date: SlotDate::new(&slot_date)?,
            hours: coerce_hours(&hours),
        })
    }
}

#[derive(FromRow)]
pub struct BlockedSlotRow {
    pub hour: i32,
    pub is_recurring: bool,
    pub day_of_week: Option<i32>,
    pub slot_date: Option<String>,
}

impl TryFrom<BlockedSlotRow> for BlockedSlot {
    type Error = AppError;

    fn try_from(value: BlockedSlotRow) -> Result<Self, Self::Error> {
        let BlockedSlotRow {
            hour,
            is_recurring,
            day_of_week,
            slot_date,
        } = value;
        let hour = Hour::new(hour)?;
        match (is_recurring, day_of_week, slot_date) {
            (true, Some(day_of_week), None) => {
                Ok(BlockedSlot::recurring(hour, DayOfWeek::new(day_of_week)?))
            }
            (false, None, Some(slot_date)) => {
                Ok(BlockedSlot::one_off(hour, SlotDate::new(&slot_date)?))
            }
            _ => Err(AppError::ConversionEntityError(
                "blocked_slots の day_of_week / slot_date の組み合わせが不正です".into(),
            )),
        }
    }
}

// ブロックの適用範囲をカラム表現 (is_recurring, day_of_week, slot_date) に
// 分解する
pub(crate) fn scope_columns(scope: &BlockScope) -> (bool, Option<i32>, Option<String>) {
    match scope {
        BlockScope::Recurring(day_of_week) => {
            (true, Some(i32::from(day_of_week.value())), None)
        }
        BlockScope::OneOff(date) => (false, None, Some(date.to_string())),
    }
}

// ストア由来の時間値を検証済みの整数へそろえる唯一の変換点。
// 旧クライアントが書いた JSONB 配列には数値と文字列が混在するため
// 両方を受け付け、変換できない値はエラーにせず読み飛ばす。
// 壊れた 1 件が残りの正常な値の解決を妨げてはならない
pub(crate) fn coerce_hours(value: &JsonValue) -> Vec<Hour> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    let mut hours: Vec<Hour> = items.iter().filter_map(coerce_hour).collect();
    hours.sort_unstable();
    hours.dedup();
    hours
}

fn coerce_hour(value: &JsonValue) -> Option<Hour> {
    let raw = match value {
        JsonValue::Number(n) => n.as_i64()?,
        JsonValue::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(raw).ok().and_then(|hour| Hour::new(hour).ok())
}

pub(crate) fn hours_to_json(hours: &[Hour]) -> JsonValue {
    JsonValue::from(
        hours
            .iter()
            .map(|hour| i64::from(hour.value()))
            .collect::<Vec<_>>(),
    )
}
