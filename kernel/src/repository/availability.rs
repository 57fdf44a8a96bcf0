use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::availability::{BlockedSlot, DateOverride, DayOfWeek, SlotDate, WeekdayTemplate};
use crate::model::id::SpaceId;

// 空き状況設定ストアへの読み書きインターフェース。
// ストレージ技術はアダプタ側に隠蔽する
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    // 指定日付に完全一致する上書き設定を取得する
    async fn get_date_override(
        &self,
        space_id: SpaceId,
        date: &SlotDate,
    ) -> AppResult<Option<DateOverride>>;

    // 指定曜日の週次テンプレートを取得する
    async fn get_weekly_template(
        &self,
        space_id: SpaceId,
        day_of_week: DayOfWeek,
    ) -> AppResult<Option<WeekdayTemplate>>;

    // スペースのブロック済みスロットをすべて取得する
    async fn get_blocked_slots(&self, space_id: SpaceId) -> AppResult<Vec<BlockedSlot>>;

    // スロットをブロックする。同じスロットがすでにブロック済みの場合は
    // false を返す（挿入は行われない）
    async fn add_blocked_slot(&self, space_id: SpaceId, blocked_slot: BlockedSlot)
        -> AppResult<bool>;

    // 一致するブロックを削除する。削除対象が存在した場合は true を返す
    async fn remove_blocked_slot(
        &self,
        space_id: SpaceId,
        blocked_slot: &BlockedSlot,
    ) -> AppResult<bool>;

    // 曜日テンプレートを作成または置き換える
    async fn upsert_weekly_template(
        &self,
        space_id: SpaceId,
        template: WeekdayTemplate,
    ) -> AppResult<()>;

    // 日付上書きを作成または置き換える
    async fn upsert_date_override(
        &self,
        space_id: SpaceId,
        date_override: DateOverride,
    ) -> AppResult<()>;
}
