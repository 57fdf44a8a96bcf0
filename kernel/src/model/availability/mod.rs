use chrono::{Datelike, NaiveDate};
use shared::error::{AppError, AppResult};

pub mod event;
pub mod slot;

// 1 日の中の開始時刻（0〜23）。検証済みの値だけが解決ロジックへ入るように、
// 生成は new 経由に限定する
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hour(u8);

impl Hour {
    pub fn new(value: i32) -> AppResult<Self> {
        if (0..=23).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AppError::InvalidHour(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

// 曜日。日曜 = 0 〜 土曜 = 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn new(value: i32) -> AppResult<Self> {
        if (0..=6).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AppError::ConversionEntityError(format!(
                "曜日は 0〜6 で指定してください: {value}"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

// 予約対象の暦日。タイムゾーン正規化は行わず、YYYY-MM-DD の文字列表現で
// 厳密に比較する。呼び出し元がスペースの現地日付を渡す責務を持つ
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotDate(NaiveDate);

impl SlotDate {
    pub fn new(value: &str) -> AppResult<Self> {
        let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(value.into()))?;

        // ゼロ埋めなしの表記（2024-6-10 など）が別表記の同じ日付として
        // すり抜けると文字列厳密比較が壊れるため、正規形のみ受け付ける
        if parsed.format("%Y-%m-%d").to_string() != value {
            return Err(AppError::InvalidDate(value.into()));
        }

        Ok(Self(parsed))
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek(self.0.weekday().num_days_from_sunday() as u8)
    }
}

impl std::fmt::Display for SlotDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// 毎週繰り返す曜日ごとの空き時間テンプレート
#[derive(Debug, Clone)]
pub struct WeekdayTemplate {
    pub day_of_week: DayOfWeek,
    pub hours: Vec<Hour>,
}

// 特定の日付に対する空き時間の上書き。
// hours が空でない場合、その日はテンプレートとマージせず完全に置き換える
#[derive(Debug, Clone)]
pub struct DateOverride {
    pub date: SlotDate,
    pub hours: Vec<Hour>,
}

// 解決結果から時間を取り除く例外エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedSlot {
    pub hour: Hour,
    pub scope: BlockScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockScope {
    // 指定曜日のすべての日付に適用する
    Recurring(DayOfWeek),
    // 指定日付にのみ適用する
    OneOff(SlotDate),
}

impl BlockedSlot {
    pub fn recurring(hour: Hour, day_of_week: DayOfWeek) -> Self {
        Self {
            hour,
            scope: BlockScope::Recurring(day_of_week),
        }
    }

    pub fn one_off(hour: Hour, date: SlotDate) -> Self {
        Self {
            hour,
            scope: BlockScope::OneOff(date),
        }
    }

    // このエントリが指定の (時間, 曜日, 日付) を予約不可にするかどうか
    pub fn excludes(&self, hour: Hour, day_of_week: DayOfWeek, date: &SlotDate) -> bool {
        if self.hour != hour {
            return false;
        }
        match &self.scope {
            BlockScope::Recurring(blocked_day) => *blocked_day == day_of_week,
            BlockScope::OneOff(blocked_date) => blocked_date == date,
        }
    }
}
