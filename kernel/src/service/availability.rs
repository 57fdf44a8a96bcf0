use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shared::error::{AppError, AppResult};
use tokio::time::timeout;

use crate::model::availability::slot::{Availability, ResolvedSlot};
use crate::model::availability::{Hour, SlotDate};
use crate::model::id::SpaceId;
use crate::repository::availability::AvailabilityRepository;

// 候補時間を供給する設定レイヤ。リストの先頭から順に問い合わせ、
// 最初に空でない時間集合を返したレイヤが候補を確定する。
// 優先順位を条件分岐のネストではなくリストとして持つことで、
// テストで順序そのものを確認できるようにしている
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource {
    DateOverride,
    WeeklyTemplate,
}

pub struct AvailabilityResolver {
    availability_repository: Arc<dyn AvailabilityRepository>,
    store_timeout: Duration,
    sources: Vec<SlotSource>,
}

impl AvailabilityResolver {
    pub fn new(
        availability_repository: Arc<dyn AvailabilityRepository>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            availability_repository,
            store_timeout,
            // 日付指定の上書き → 週次テンプレート の順
            sources: vec![SlotSource::DateOverride, SlotSource::WeeklyTemplate],
        }
    }

    // 指定スペース・指定日付の予約可能な 1 時間枠を解決する。
    // 設定がどのレイヤにも存在しない場合は空のリストを返す
    // （既定の営業時間を合成することはしない）
    pub async fn resolve(&self, space_id: SpaceId, date: &SlotDate) -> AppResult<Availability> {
        let day_of_week = date.day_of_week();

        let mut candidate: Option<(Vec<Hour>, bool)> = None;
        let mut degraded = false;
        let mut last_source_failed = false;

        for source in &self.sources {
            let hours = match source {
                SlotSource::DateOverride => self
                    .with_timeout(
                        self.availability_repository
                            .get_date_override(space_id, date),
                    )
                    .await
                    .map(|found| found.map(|date_override| date_override.hours)),
                SlotSource::WeeklyTemplate => self
                    .with_timeout(
                        self.availability_repository
                            .get_weekly_template(space_id, day_of_week),
                    )
                    .await
                    .map(|found| found.map(|template| template.hours)),
            };

            match hours {
                Ok(Some(hours)) if !hours.is_empty() => {
                    candidate = Some((hours, matches!(source, SlotSource::DateOverride)));
                    break;
                }
                // 設定が無い、または空の場合は次のレイヤへフォールバックする
                Ok(_) => last_source_failed = false,
                Err(e) => {
                    tracing::warn!(
                        %space_id,
                        %date,
                        source = ?source,
                        error = %e,
                        "空き状況レイヤの問い合わせに失敗しました。次のレイヤへフォールバックします"
                    );
                    degraded = true;
                    last_source_failed = true;
                }
            }
        }

        let (hours, is_specific_date) = match candidate {
            Some(found) => found,
            // 最後のフォールバック先まで失敗した場合は空リストを返さず、
            // 「問い合わせできなかった」ことをエラーとして呼び出し元へ伝える。
            // 空リストは「この日は枠なし」と見分けが付かないため
            None if last_source_failed => {
                return Err(AppError::StoreUnavailable(format!(
                    "スペース（{space_id}）の空き状況をどの設定レイヤからも取得できませんでした"
                )))
            }
            None => {
                return Ok(Availability {
                    date: date.clone(),
                    is_specific_date: false,
                    degraded,
                    slots: Vec::new(),
                })
            }
        };

        // ブロック一覧が取れない場合はそのままエラーにする。
        // 除外を適用しない候補を返すと、埋まっている枠を予約可能として
        // 提示してしまう
        let blocked = self
            .with_timeout(self.availability_repository.get_blocked_slots(space_id))
            .await?;

        let mut hours: Vec<Hour> = hours
            .into_iter()
            .filter(|hour| {
                !blocked
                    .iter()
                    .any(|blocked_slot| blocked_slot.excludes(*hour, day_of_week, date))
            })
            .collect();
        hours.sort_unstable();
        hours.dedup();

        Ok(Availability {
            date: date.clone(),
            is_specific_date,
            degraded,
            slots: hours.into_iter().map(ResolvedSlot::from_hour).collect(),
        })
    }

    // ストア問い合わせに上限時間を適用する。超過はその層の失敗として扱い、
    // 無期限には待たない
    async fn with_timeout<T>(
        &self,
        query: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match timeout(self.store_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(AppError::StoreUnavailable(
                "ストアへの問い合わせがタイムアウトしました".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::model::availability::{BlockedSlot, DayOfWeek};
    use crate::service::test_support::InMemoryAvailabilityRepository;

    fn hour(value: i32) -> Hour {
        Hour::new(value).unwrap()
    }

    fn hours(values: &[i32]) -> Vec<Hour> {
        values.iter().map(|v| hour(*v)).collect()
    }

    fn date(value: &str) -> SlotDate {
        SlotDate::new(value).unwrap()
    }

    fn dow(value: i32) -> DayOfWeek {
        DayOfWeek::new(value).unwrap()
    }

    fn resolver(repository: &Arc<InMemoryAvailabilityRepository>) -> AvailabilityResolver {
        AvailabilityResolver::new(repository.clone(), Duration::from_millis(100))
    }

    fn resolved_hours(availability: &Availability) -> Vec<u8> {
        availability
            .slots
            .iter()
            .map(|slot| slot.hour.value())
            .collect()
    }

    #[tokio::test]
    async fn test_resolve_without_configuration_returns_empty() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();

        let availability = resolver(&repository)
            .resolve(space_id, &date("2024-06-10"))
            .await
            .unwrap();

        assert!(availability.slots.is_empty());
        assert!(!availability.is_specific_date);
        assert!(!availability.degraded);
    }

    // 月曜テンプレート {10, 11, 14}・毎週月曜 11 時をブロック
    // → 10:00–11:00 と 14:00–15:00 の 2 枠がこの順で返る
    #[tokio::test]
    async fn test_template_with_recurring_block() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        let monday = date("2024-06-10");
        repository.set_template(space_id, dow(1), hours(&[10, 11, 14]));
        repository.block(space_id, BlockedSlot::recurring(hour(11), dow(1)));

        let availability = resolver(&repository)
            .resolve(space_id, &monday)
            .await
            .unwrap();

        assert_eq!(resolved_hours(&availability), vec![10, 14]);
        assert_eq!(availability.slots[0].start, "10:00:00");
        assert_eq!(availability.slots[0].end, "11:00:00");
        assert_eq!(availability.slots[1].start, "14:00:00");
        assert_eq!(availability.slots[1].end, "15:00:00");
        assert!(!availability.is_specific_date);
    }

    // 上書き {9} はテンプレート {10, 11} とマージされず、完全に置き換える
    #[tokio::test]
    async fn test_override_replaces_template_entirely() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        let monday = date("2024-06-10");
        repository.set_template(space_id, dow(1), hours(&[10, 11]));
        repository.set_override(space_id, monday.clone(), hours(&[9]));

        let availability = resolver(&repository)
            .resolve(space_id, &monday)
            .await
            .unwrap();

        assert_eq!(resolved_hours(&availability), vec![9]);
        assert_eq!(availability.slots[0].start, "09:00:00");
        assert_eq!(availability.slots[0].end, "10:00:00");
        assert!(availability.is_specific_date);
    }

    // 空の上書きは「枠なし」ではなく「上書きなし」としてテンプレートへ
    // フォールバックする
    #[tokio::test]
    async fn test_empty_override_falls_back_to_template() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        let monday = date("2024-06-10");
        repository.set_template(space_id, dow(1), hours(&[10]));
        repository.set_override(space_id, monday.clone(), Vec::new());

        let availability = resolver(&repository)
            .resolve(space_id, &monday)
            .await
            .unwrap();

        assert_eq!(resolved_hours(&availability), vec![10]);
        assert!(!availability.is_specific_date);
    }

    #[tokio::test]
    async fn test_recurring_block_applies_only_to_matching_weekday() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        repository.set_template(space_id, dow(1), hours(&[10]));
        repository.set_template(space_id, dow(2), hours(&[10]));
        repository.block(space_id, BlockedSlot::recurring(hour(10), dow(1)));

        let resolver = resolver(&repository);
        let monday = resolver
            .resolve(space_id, &date("2024-06-10"))
            .await
            .unwrap();
        let tuesday = resolver
            .resolve(space_id, &date("2024-06-11"))
            .await
            .unwrap();

        assert!(monday.slots.is_empty());
        assert_eq!(resolved_hours(&tuesday), vec![10]);
    }

    #[tokio::test]
    async fn test_one_off_block_applies_only_to_exact_date() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        let monday = date("2024-06-10");
        repository.set_template(space_id, dow(1), hours(&[10]));
        repository.block(space_id, BlockedSlot::one_off(hour(10), monday.clone()));

        let resolver = resolver(&repository);
        let blocked_day = resolver.resolve(space_id, &monday).await.unwrap();
        let next_monday = resolver
            .resolve(space_id, &date("2024-06-17"))
            .await
            .unwrap();

        assert!(blocked_day.slots.is_empty());
        assert_eq!(resolved_hours(&next_monday), vec![10]);
    }

    #[tokio::test]
    async fn test_hours_are_sorted_ascending() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        repository.set_template(space_id, dow(1), hours(&[14, 10, 11, 10]));

        let availability = resolver(&repository)
            .resolve(space_id, &date("2024-06-10"))
            .await
            .unwrap();

        assert_eq!(resolved_hours(&availability), vec![10, 11, 14]);
    }

    // 導出値のみで隠れた状態を持たないため、ストアに変更がなければ
    // 同じ結果が返る
    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        let monday = date("2024-06-10");
        repository.set_template(space_id, dow(1), hours(&[10, 14]));
        repository.block(space_id, BlockedSlot::recurring(hour(14), dow(1)));

        let resolver = resolver(&repository);
        let first = resolver.resolve(space_id, &monday).await.unwrap();
        let second = resolver.resolve(space_id, &monday).await.unwrap();

        assert_eq!(first.slots, second.slots);
        assert_eq!(first.is_specific_date, second.is_specific_date);
    }

    #[tokio::test]
    async fn test_override_failure_falls_back_to_template() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        repository.set_template(space_id, dow(1), hours(&[10]));
        repository.fail_override_query.store(true, Ordering::SeqCst);

        let availability = resolver(&repository)
            .resolve(space_id, &date("2024-06-10"))
            .await
            .unwrap();

        assert_eq!(resolved_hours(&availability), vec![10]);
        assert!(availability.degraded);
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_an_error() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        repository.fail_override_query.store(true, Ordering::SeqCst);
        repository.fail_template_query.store(true, Ordering::SeqCst);

        let result = resolver(&repository)
            .resolve(space_id, &date("2024-06-10"))
            .await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    // ブロック一覧が取れない場合、除外を適用しない候補は返さない
    #[tokio::test]
    async fn test_blocked_slot_query_failure_is_an_error() {
        let repository = Arc::new(InMemoryAvailabilityRepository::default());
        let space_id = SpaceId::new();
        repository.set_template(space_id, dow(1), hours(&[10]));
        repository.fail_blocked_query.store(true, Ordering::SeqCst);

        let result = resolver(&repository)
            .resolve(space_id, &date("2024-06-10"))
            .await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }
}
