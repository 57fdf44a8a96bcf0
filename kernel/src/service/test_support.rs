use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use shared::error::{AppError, AppResult};

use crate::model::availability::{
    BlockedSlot, DateOverride, DayOfWeek, Hour, SlotDate, WeekdayTemplate,
};
use crate::model::id::SpaceId;
use crate::repository::availability::AvailabilityRepository;

// サービス層テスト用のインメモリ設定ストア。
// fail_* フラグでレイヤ単位の問い合わせ失敗を再現できる
#[derive(Default)]
pub(crate) struct InMemoryAvailabilityRepository {
    overrides: Mutex<HashMap<(SpaceId, SlotDate), Vec<Hour>>>,
    templates: Mutex<HashMap<(SpaceId, DayOfWeek), Vec<Hour>>>,
    blocked: Mutex<Vec<(SpaceId, BlockedSlot)>>,
    pub fail_override_query: AtomicBool,
    pub fail_template_query: AtomicBool,
    pub fail_blocked_query: AtomicBool,
    pub fail_block_insert: AtomicBool,
    pub fail_block_removal: AtomicBool,
    pub mutation_count: AtomicUsize,
}

impl InMemoryAvailabilityRepository {
    pub fn set_template(&self, space_id: SpaceId, day_of_week: DayOfWeek, hours: Vec<Hour>) {
        self.templates
            .lock()
            .unwrap()
            .insert((space_id, day_of_week), hours);
    }

    pub fn set_override(&self, space_id: SpaceId, date: SlotDate, hours: Vec<Hour>) {
        self.overrides
            .lock()
            .unwrap()
            .insert((space_id, date), hours);
    }

    pub fn block(&self, space_id: SpaceId, blocked_slot: BlockedSlot) {
        self.blocked.lock().unwrap().push((space_id, blocked_slot));
    }

    pub fn blocked_slots(&self, space_id: SpaceId) -> Vec<BlockedSlot> {
        self.blocked
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| *owner == space_id)
            .map(|(_, blocked_slot)| blocked_slot.clone())
            .collect()
    }

    fn unavailable(message: &str) -> AppError {
        AppError::StoreUnavailable(message.into())
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryAvailabilityRepository {
    async fn get_date_override(
        &self,
        space_id: SpaceId,
        date: &SlotDate,
    ) -> AppResult<Option<DateOverride>> {
        if self.fail_override_query.load(Ordering::SeqCst) {
            return Err(Self::unavailable("override query failed"));
        }
        Ok(self
            .overrides
            .lock()
            .unwrap()
            .get(&(space_id, date.clone()))
            .map(|hours| DateOverride {
                date: date.clone(),
                hours: hours.clone(),
            }))
    }

    async fn get_weekly_template(
        &self,
        space_id: SpaceId,
        day_of_week: DayOfWeek,
    ) -> AppResult<Option<WeekdayTemplate>> {
        if self.fail_template_query.load(Ordering::SeqCst) {
            return Err(Self::unavailable("template query failed"));
        }
        Ok(self
            .templates
            .lock()
            .unwrap()
            .get(&(space_id, day_of_week))
            .map(|hours| WeekdayTemplate {
                day_of_week,
                hours: hours.clone(),
            }))
    }

    async fn get_blocked_slots(&self, space_id: SpaceId) -> AppResult<Vec<BlockedSlot>> {
        if self.fail_blocked_query.load(Ordering::SeqCst) {
            return Err(Self::unavailable("blocked slot query failed"));
        }
        Ok(self.blocked_slots(space_id))
    }

    async fn add_blocked_slot(
        &self,
        space_id: SpaceId,
        blocked_slot: BlockedSlot,
    ) -> AppResult<bool> {
        if self.fail_block_insert.load(Ordering::SeqCst) {
            return Err(Self::unavailable("blocked slot insert failed"));
        }
        let mut blocked = self.blocked.lock().unwrap();
        if blocked
            .iter()
            .any(|(owner, existing)| *owner == space_id && *existing == blocked_slot)
        {
            return Ok(false);
        }
        self.mutation_count.fetch_add(1, Ordering::SeqCst);
        blocked.push((space_id, blocked_slot));
        Ok(true)
    }

    async fn remove_blocked_slot(
        &self,
        space_id: SpaceId,
        blocked_slot: &BlockedSlot,
    ) -> AppResult<bool> {
        if self.fail_block_removal.load(Ordering::SeqCst) {
            return Err(Self::unavailable("blocked slot removal failed"));
        }
        let mut blocked = self.blocked.lock().unwrap();
        let before = blocked.len();
        blocked.retain(|(owner, existing)| !(*owner == space_id && existing == blocked_slot));
        let removed = blocked.len() < before;
        if removed {
            self.mutation_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }

    async fn upsert_weekly_template(
        &self,
        space_id: SpaceId,
        template: WeekdayTemplate,
    ) -> AppResult<()> {
        self.mutation_count.fetch_add(1, Ordering::SeqCst);
        self.set_template(space_id, template.day_of_week, template.hours);
        Ok(())
    }

    async fn upsert_date_override(
        &self,
        space_id: SpaceId,
        date_override: DateOverride,
    ) -> AppResult<()> {
        self.mutation_count.fetch_add(1, Ordering::SeqCst);
        self.set_override(space_id, date_override.date, date_override.hours);
        Ok(())
    }
}
