use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::availability::{DateOverride, DayOfWeek, SlotDate, WeekdayTemplate};
use kernel::model::id::SpaceId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::availability::{
    AvailabilityQuery, AvailabilityResponse, BlockedSlotRequest, ReassignSlotRequest,
    ReassignmentResponse, UpsertHoursRequest,
};

// 指定スペース・指定日付の予約可能スロットを解決して返す
pub async fn resolve_availability(
    Path(space_id): Path<SpaceId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    let date = SlotDate::new(&query.date)?;

    ensure_space_exists(&registry, space_id).await?;

    registry
        .availability_resolver()
        .resolve(space_id, &date)
        .await
        .map(AvailabilityResponse::from)
        .map(Json)
}

pub async fn upsert_weekly_template(
    Path((space_id, day_of_week)): Path<(SpaceId, i32)>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertHoursRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    ensure_space_exists(&registry, space_id).await?;

    let template = WeekdayTemplate {
        day_of_week: DayOfWeek::new(day_of_week)?,
        hours: req.into_hours()?,
    };
    registry
        .availability_repository()
        .upsert_weekly_template(space_id, template)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn upsert_date_override(
    Path((space_id, date)): Path<(SpaceId, String)>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertHoursRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    ensure_space_exists(&registry, space_id).await?;

    let date_override = DateOverride {
        date: SlotDate::new(&date)?,
        hours: req.into_hours()?,
    };
    registry
        .availability_repository()
        .upsert_date_override(space_id, date_override)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn add_blocked_slot(
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<BlockedSlotRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    ensure_space_exists(&registry, space_id).await?;

    let added = registry
        .availability_repository()
        .add_blocked_slot(space_id, req.try_into()?)
        .await?;

    if !added {
        return Err(AppError::ReassignmentConflict(
            "指定のスロットはすでにブロックされています".into(),
        ));
    }

    Ok(StatusCode::CREATED)
}

pub async fn remove_blocked_slot(
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<BlockedSlotRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let removed = registry
        .availability_repository()
        .remove_blocked_slot(space_id, &req.try_into()?)
        .await?;

    if !removed {
        return Err(AppError::EntityNotFound(
            "指定のブロック済みスロットが見つかりませんでした。".into(),
        ));
    }

    Ok(StatusCode::OK)
}

// イベントの開催時間変更に伴うブロック済みスロットの付け替え。
// 部分的に失敗した場合もレスポンスのフラグで呼び出し元へ伝える
pub async fn reassign_slot(
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ReassignSlotRequest>,
) -> AppResult<Json<ReassignmentResponse>> {
    req.validate(&())?;

    ensure_space_exists(&registry, space_id).await?;

    registry
        .slot_reassignment_coordinator()
        .on_event_rescheduled(space_id, req.try_into()?)
        .await
        .map(ReassignmentResponse::from)
        .map(Json)
}

async fn ensure_space_exists(registry: &AppRegistry, space_id: SpaceId) -> AppResult<()> {
    registry
        .space_repository()
        .find_by_id(space_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("スペース（{space_id}）が見つかりませんでした。"))
        })?;
    Ok(())
}
