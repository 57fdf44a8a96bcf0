use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::SpaceId;
use kernel::model::space::{event::CreateSpace, Space};
use kernel::repository::space::SpaceRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::space::SpaceRow;
use crate::database::ConnectionPool;

#[derive(new)]
pub struct SpaceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SpaceRepository for SpaceRepositoryImpl {
    async fn create(&self, event: CreateSpace) -> AppResult<SpaceId> {
        let space_id = SpaceId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO spaces
                (space_id, space_name, owner, is_active, description, capacity, equipment, address)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(space_id)
        .bind(event.space_name)
        .bind(event.owner)
        .bind(event.is_active)
        .bind(event.description)
        .bind(event.capacity)
        .bind(event.equipment)
        .bind(event.address)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No space record has been created".into(),
            ));
        }

        Ok(space_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Space>> {
        let rows: Vec<SpaceRow> = sqlx::query_as(
            r#"
                SELECT
                    space_id,
                    space_name,
                    owner,
                    is_active,
                    description,
                    capacity,
                    equipment,
                    address
                FROM spaces
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Space::from).collect())
    }

    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>> {
        let row: Option<SpaceRow> = sqlx::query_as(
            r#"
                SELECT
                    space_id,
                    space_name,
                    owner,
                    is_active,
                    description,
                    capacity,
                    equipment,
                    address
                FROM spaces
                WHERE space_id = $1
            "#,
        )
        .bind(space_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Space::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../migrations")]
    async fn test_register_space(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = SpaceRepositoryImpl::new(ConnectionPool::new(pool));

        let space = CreateSpace {
            space_name: "Test SpaceName".into(),
            owner: "Test Owner".into(),
            is_active: true,
            description: "Test Description".into(),
            capacity: 5,
            equipment: "Test Equipment".into(),
            address: "Test Address".into(),
        };

        let space_id = repo.create(space).await?;

        let res = repo.find_all().await?;
        assert_eq!(res.len(), 1);

        let res = repo.find_by_id(space_id).await?;
        assert!(res.is_some());

        let Space {
            space_id: found_id,
            space_name,
            owner,
            is_active,
            description,
            capacity,
            equipment,
            address,
        } = res.unwrap();
        assert_eq!(found_id, space_id);
        assert_eq!(space_name, "Test SpaceName");
        assert_eq!(owner, "Test Owner");
        assert!(is_active);
        assert_eq!(description, "Test Description");
        assert_eq!(capacity, 5);
        assert_eq!(equipment, "Test Equipment");
        assert_eq!(address, "Test Address");
        Ok(())
    }
}
