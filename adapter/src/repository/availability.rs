use async_trait::async_trait;
use derive_new::new;
use kernel::model::availability::{
    BlockedSlot, DateOverride, DayOfWeek, SlotDate, WeekdayTemplate,
};
use kernel::model::id::SpaceId;
use kernel::repository::availability::AvailabilityRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::availability::{
    hours_to_json, scope_columns, BlockedSlotRow, DateOverrideRow, WeeklyTemplateRow,
};
use crate::database::ConnectionPool;

#[derive(new)]
pub struct AvailabilityRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AvailabilityRepository for AvailabilityRepositoryImpl {
    async fn get_date_override(
        &self,
        space_id: SpaceId,
        date: &SlotDate,
    ) -> AppResult<Option<DateOverride>> {
        let row: Option<DateOverrideRow> = sqlx::query_as(
            r#"
                SELECT slot_date, hours
                FROM date_overrides
                WHERE space_id = $1 AND slot_date = $2
            "#,
        )
        .bind(space_id)
        .bind(date.to_string())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(DateOverride::try_from).transpose()
    }

    async fn get_weekly_template(
        &self,
        space_id: SpaceId,
        day_of_week: DayOfWeek,
    ) -> AppResult<Option<WeekdayTemplate>> {
        let row: Option<WeeklyTemplateRow> = sqlx::query_as(
            r#"
                SELECT day_of_week, hours
                FROM weekly_templates
                WHERE space_id = $1 AND day_of_week = $2
            "#,
        )
        .bind(space_id)
        .bind(i32::from(day_of_week.value()))
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(WeekdayTemplate::try_from).transpose()
    }

    async fn get_blocked_slots(&self, space_id: SpaceId) -> AppResult<Vec<BlockedSlot>> {
        let rows: Vec<BlockedSlotRow> = sqlx::query_as(
            r#"
                SELECT hour, is_recurring, day_of_week, slot_date
                FROM blocked_slots
                WHERE space_id = $1
                ORDER BY hour ASC
            "#,
        )
        .bind(space_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(BlockedSlot::try_from).collect()
    }

    async fn add_blocked_slot(
        &self,
        space_id: SpaceId,
        blocked_slot: BlockedSlot,
    ) -> AppResult<bool> {
        let (is_recurring, day_of_week, slot_date) = scope_columns(&blocked_slot.scope);
        let res = sqlx::query(
            r#"
                INSERT INTO blocked_slots (space_id, hour, is_recurring, day_of_week, slot_date)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT DO NOTHING
            "#,
        )
        .bind(space_id)
        .bind(i32::from(blocked_slot.hour.value()))
        .bind(is_recurring)
        .bind(day_of_week)
        .bind(slot_date)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 一意インデックスに当たって何も挿入されなかった場合は
        // すでにブロック済み
        Ok(res.rows_affected() > 0)
    }

    async fn remove_blocked_slot(
        &self,
        space_id: SpaceId,
        blocked_slot: &BlockedSlot,
    ) -> AppResult<bool> {
        let (is_recurring, day_of_week, slot_date) = scope_columns(&blocked_slot.scope);
        let res = sqlx::query(
            r#"
                DELETE FROM blocked_slots
                WHERE space_id = $1
                  AND hour = $2
                  AND is_recurring = $3
                  AND day_of_week IS NOT DISTINCT FROM $4
                  AND slot_date IS NOT DISTINCT FROM $5
            "#,
        )
        .bind(space_id)
        .bind(i32::from(blocked_slot.hour.value()))
        .bind(is_recurring)
        .bind(day_of_week)
        .bind(slot_date)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected() > 0)
    }

    async fn upsert_weekly_template(
        &self,
        space_id: SpaceId,
        template: WeekdayTemplate,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO weekly_templates (space_id, day_of_week, hours)
                VALUES ($1, $2, $3)
                ON CONFLICT (space_id, day_of_week)
                DO UPDATE SET hours = EXCLUDED.hours, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(space_id)
        .bind(i32::from(template.day_of_week.value()))
        .bind(hours_to_json(&template.hours))
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn upsert_date_override(
        &self,
        space_id: SpaceId,
        date_override: DateOverride,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO date_overrides (space_id, slot_date, hours)
                VALUES ($1, $2, $3)
                ON CONFLICT (space_id, slot_date)
                DO UPDATE SET hours = EXCLUDED.hours, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(space_id)
        .bind(date_override.date.to_string())
        .bind(hours_to_json(&date_override.hours))
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::space::SpaceRepositoryImpl;
    use kernel::model::availability::Hour;
    use kernel::model::space::event::CreateSpace;
    use kernel::repository::space::SpaceRepository;

    fn hour(value: i32) -> Hour {
        Hour::new(value).unwrap()
    }

    async fn register_test_space(pool: &sqlx::PgPool) -> anyhow::Result<SpaceId> {
        let repo = SpaceRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let space_id = repo
            .create(CreateSpace {
                space_name: "Test SpaceName".into(),
                owner: "Test Owner".into(),
                is_active: true,
                description: "Test Description".into(),
                capacity: 5,
                equipment: "Test Equipment".into(),
                address: "Test Address".into(),
            })
            .await?;
        Ok(space_id)
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_upsert_and_get_weekly_template(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let space_id = register_test_space(&pool).await?;
        let repo = AvailabilityRepositoryImpl::new(ConnectionPool::new(pool));
        let monday = DayOfWeek::new(1)?;

        repo.upsert_weekly_template(
            space_id,
            WeekdayTemplate {
                day_of_week: monday,
                hours: vec![hour(10), hour(11), hour(14)],
            },
        )
        .await?;

        let template = repo.get_weekly_template(space_id, monday).await?.unwrap();
        assert_eq!(template.hours, vec![hour(10), hour(11), hour(14)]);

        // 上書き保存で置き換えられる
        repo.upsert_weekly_template(
            space_id,
            WeekdayTemplate {
                day_of_week: monday,
                hours: vec![hour(9)],
            },
        )
        .await?;
        let template = repo.get_weekly_template(space_id, monday).await?.unwrap();
        assert_eq!(template.hours, vec![hour(9)]);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_get_date_override_matches_exact_date(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let space_id = register_test_space(&pool).await?;
        let repo = AvailabilityRepositoryImpl::new(ConnectionPool::new(pool));
        let date = SlotDate::new("2024-06-10")?;

        repo.upsert_date_override(
            space_id,
            DateOverride {
                date: date.clone(),
                hours: vec![hour(9)],
            },
        )
        .await?;

        let found = repo.get_date_override(space_id, &date).await?;
        assert_eq!(found.unwrap().hours, vec![hour(9)]);

        let other = SlotDate::new("2024-06-11")?;
        assert!(repo.get_date_override(space_id, &other).await?.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_blocked_slot_add_is_rejected_when_already_present(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let space_id = register_test_space(&pool).await?;
        let repo = AvailabilityRepositoryImpl::new(ConnectionPool::new(pool));
        let blocked = BlockedSlot::recurring(hour(15), DayOfWeek::new(2)?);

        assert!(repo.add_blocked_slot(space_id, blocked.clone()).await?);
        // 同一スロットの二重ブロックは挿入されない
        assert!(!repo.add_blocked_slot(space_id, blocked.clone()).await?);

        assert!(repo.remove_blocked_slot(space_id, &blocked).await?);
        assert!(!repo.remove_blocked_slot(space_id, &blocked).await?);
        assert!(repo.get_blocked_slots(space_id).await?.is_empty());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_one_off_and_recurring_blocks_coexist(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let space_id = register_test_space(&pool).await?;
        let repo = AvailabilityRepositoryImpl::new(ConnectionPool::new(pool));
        let date = SlotDate::new("2024-06-10")?;

        assert!(
            repo.add_blocked_slot(space_id, BlockedSlot::recurring(hour(10), DayOfWeek::new(1)?))
                .await?
        );
        assert!(
            repo.add_blocked_slot(space_id, BlockedSlot::one_off(hour(10), date.clone()))
                .await?
        );

        let blocked = repo.get_blocked_slots(space_id).await?;
        assert_eq!(blocked.len(), 2);

        Ok(())
    }
}
