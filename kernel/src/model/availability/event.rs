use derive_new::new;

use super::{DayOfWeek, Hour};

// 予約済みイベントの開催時間が変更されたときの入力。
// 旧スロットと新スロットそれぞれの (時間, 曜日) の組を持つ
#[derive(Debug, Clone, Copy, new)]
pub struct RescheduleSlot {
    pub old_hour: Hour,
    pub old_day_of_week: DayOfWeek,
    pub new_hour: Hour,
    pub new_day_of_week: DayOfWeek,
}
