use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::SpaceId;
use crate::model::space::{event::CreateSpace, Space};

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    // スペースを登録する
    async fn create(&self, event: CreateSpace) -> AppResult<SpaceId>;
    // すべてのスペースを取得する
    async fn find_all(&self) -> AppResult<Vec<Space>>;
    // スペース ID からスペースを取得する
    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>>;
}
