use crate::model::id::SpaceId;

pub mod event;

#[derive(Debug)]
pub struct Space {
    pub space_id: SpaceId,
    pub space_name: String,
    pub owner: String,
    pub is_active: bool,
    pub description: String,
    pub capacity: i32,
    pub equipment: String,
    pub address: String,
}
