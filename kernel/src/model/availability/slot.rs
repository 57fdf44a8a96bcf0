use super::{Hour, SlotDate};

// 予約可能な 1 時間枠。問い合わせのたびにゼロから再計算される導出値であり、
// 永続化しない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    pub hour: Hour,
    pub start: String,
    pub end: String,
    pub duration: u8,
    pub display_time: String,
}

impl ResolvedSlot {
    pub fn from_hour(hour: Hour) -> Self {
        let h = hour.value();
        let end_hour = (h + 1) % 24;
        Self {
            hour,
            start: format!("{:02}:00:00", h),
            end: format!("{:02}:00:00", end_hour),
            // 部分枠や複数時間の枠はこのモデルには存在しない。常にちょうど 1 時間
            duration: 1,
            display_time: display_time(h),
        }
    }
}

// 12 時間表記。0 時と 12 時は "12" に正規化する
fn display_time(hour: u8) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", hour12, suffix)
}

// resolve の結果。スロット一覧に加えて、日付指定の上書きが候補を供給したか、
// 上書き層の問い合わせに失敗してフォールバックしたかを持つ。
// 後者がないと「設定が空」と「問い合わせできなかった」を呼び出し側で
// 区別できない
#[derive(Debug, Clone)]
pub struct Availability {
    pub date: SlotDate,
    pub is_specific_date: bool,
    pub degraded: bool,
    pub slots: Vec<ResolvedSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(value: i32) -> Hour {
        Hour::new(value).unwrap()
    }

    #[test]
    fn test_slot_spans_exactly_one_hour() {
        let slot = ResolvedSlot::from_hour(hour(10));
        assert_eq!(slot.start, "10:00:00");
        assert_eq!(slot.end, "11:00:00");
        assert_eq!(slot.duration, 1);
        assert_eq!(slot.display_time, "10:00 AM");
    }

    #[test]
    fn test_end_hour_wraps_at_midnight() {
        let slot = ResolvedSlot::from_hour(hour(23));
        assert_eq!(slot.start, "23:00:00");
        assert_eq!(slot.end, "00:00:00");
        assert_eq!(slot.display_time, "11:00 PM");
    }

    #[test]
    fn test_display_time_normalizes_twelve() {
        assert_eq!(ResolvedSlot::from_hour(hour(0)).display_time, "12:00 AM");
        assert_eq!(ResolvedSlot::from_hour(hour(12)).display_time, "12:00 PM");
        assert_eq!(ResolvedSlot::from_hour(hour(13)).display_time, "1:00 PM");
    }

    #[test]
    fn test_end_hour_is_start_plus_one_mod_24() {
        for h in 0..24 {
            let slot = ResolvedSlot::from_hour(hour(h));
            let end_hour: u8 = slot.end[0..2].parse().unwrap();
            assert_eq!(i32::from(end_hour), (h + 1) % 24);
        }
    }
}
