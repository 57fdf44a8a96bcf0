use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared::error::{AppError, AppResult};
use tokio::sync::Mutex as AsyncMutex;

use crate::model::availability::event::RescheduleSlot;
use crate::model::availability::BlockedSlot;
use crate::model::id::SpaceId;
use crate::repository::availability::AvailabilityRepository;

// 付け替え処理の結果。部分的に失敗した場合もフラグとして呼び出し元へ返し、
// 黙って握りつぶさない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassignmentResult {
    pub changed: bool,
    pub new_slot_blocked: bool,
    pub old_slot_released: bool,
}

impl ReassignmentResult {
    fn unchanged() -> Self {
        Self {
            changed: false,
            new_slot_blocked: false,
            old_slot_released: false,
        }
    }

    // オペレーターへの警告や再試行が必要かどうか
    pub fn requires_follow_up(&self) -> bool {
        self.changed && !(self.new_slot_blocked && self.old_slot_released)
    }
}

pub struct SlotReassignmentCoordinator {
    availability_repository: Arc<dyn AvailabilityRepository>,
    // スペースごとの書き込み直列化ロック。同じスペースへの 2 つの付け替えが
    // 両方とも「空いている」を観測して同じスロットを確保するのを防ぐ
    space_locks: Mutex<HashMap<SpaceId, Arc<AsyncMutex<()>>>>,
}

impl SlotReassignmentCoordinator {
    pub fn new(availability_repository: Arc<dyn AvailabilityRepository>) -> Self {
        Self {
            availability_repository,
            space_locks: Mutex::new(HashMap::new()),
        }
    }

    // イベントの開催時間変更に追従して、ブロック済みスロットを付け替える。
    // 新スロットの確保と旧スロットの解放は 1 つの処理として扱い、
    // どちらかが失敗した場合は結果のフラグで呼び出し元へ伝える
    pub async fn on_event_rescheduled(
        &self,
        space_id: SpaceId,
        event: RescheduleSlot,
    ) -> AppResult<ReassignmentResult> {
        // 時間が変わらない場合はストアを一切変更しない
        if event.old_hour == event.new_hour {
            return Ok(ReassignmentResult::unchanged());
        }

        let lock = self.space_lock(space_id);
        let repository = self.availability_repository.clone();

        // 呼び出し元がリクエストを途中で破棄しても確保と解放が対のまま
        // 完了するように、変更ステップは切り離したタスクで実行する。
        // 途中まで適用された状態が観測されてはならない
        let mutation = tokio::spawn(async move {
            let _guard = lock.lock().await;
            Self::mutate(repository, space_id, event).await
        });

        mutation.await.map_err(|e| {
            AppError::StoreUnavailable(format!("スロット付け替えの処理が中断されました: {e}"))
        })?
    }

    async fn mutate(
        repository: Arc<dyn AvailabilityRepository>,
        space_id: SpaceId,
        event: RescheduleSlot,
    ) -> AppResult<ReassignmentResult> {
        let new_block = BlockedSlot::recurring(event.new_hour, event.new_day_of_week);
        match repository.add_blocked_slot(space_id, new_block).await {
            Ok(true) => {}
            Ok(false) => {
                // 検出から変更までの間に別の付け替えが同じスロットを確保済み。
                // 旧スロットには触れず、不整合をそのまま報告する
                tracing::warn!(
                    %space_id,
                    new_hour = event.new_hour.value(),
                    "新しいスロットはすでにブロック済みです。ブロック済みスロットを手動で確認してください"
                );
                return Ok(ReassignmentResult {
                    changed: true,
                    new_slot_blocked: false,
                    old_slot_released: false,
                });
            }
            Err(e) => {
                tracing::warn!(
                    %space_id,
                    new_hour = event.new_hour.value(),
                    error = %e,
                    "新しいスロットをブロックできませんでした。ブロック済みスロットを手動で確認してください"
                );
                return Ok(ReassignmentResult {
                    changed: true,
                    new_slot_blocked: false,
                    old_slot_released: false,
                });
            }
        }

        let old_block = BlockedSlot::recurring(event.old_hour, event.old_day_of_week);
        let old_slot_released = match repository.remove_blocked_slot(space_id, &old_block).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(
                    %space_id,
                    old_hour = event.old_hour.value(),
                    error = %e,
                    "旧スロットのブロックを解放できませんでした。ブロック済みスロットを手動で確認してください"
                );
                false
            }
        };

        Ok(ReassignmentResult {
            changed: true,
            new_slot_blocked: true,
            old_slot_released,
        })
    }

    fn space_lock(&self, space_id: SpaceId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.space_locks.lock().unwrap();
        locks.entry(space_id).or_default().clone()
    }
}
