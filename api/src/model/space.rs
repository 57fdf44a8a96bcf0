use garde::Validate;
use kernel::model::{
    id::SpaceId,
    space::{event::CreateSpace, Space},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[garde(length(min = 1))]
    pub space_name: String,
    #[garde(length(min = 1))]
    pub owner: String,
    #[garde(skip)]
    pub is_active: bool,
    #[garde(skip)]
    pub description: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    pub equipment: String,
    #[garde(length(min = 1))]
    pub address: String,
}

impl From<CreateSpaceRequest> for CreateSpace {
    fn from(value: CreateSpaceRequest) -> Self {
        let CreateSpaceRequest {
            space_name,
            owner,
            is_active,
            description,
            capacity,
            equipment,
            address,
        } = value;
        CreateSpace {
            space_name,
            owner,
            is_active,
            description,
            capacity,
            equipment,
            address,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceResponse {
    pub space_id: SpaceId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacesResponse {
    pub items: Vec<SpaceResponse>,
}

impl From<Vec<Space>> for SpacesResponse {
    fn from(value: Vec<Space>) -> Self {
        Self {
            items: value.into_iter().map(SpaceResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    pub space_id: SpaceId,
    pub space_name: String,
    pub owner: String,
    pub is_active: bool,
    pub description: String,
    pub capacity: i32,
    pub equipment: String,
    pub address: String,
}

impl From<Space> for SpaceResponse {
    fn from(value: Space) -> Self {
        let Space {
            space_id,
            space_name,
            owner,
            is_active,
            description,
            capacity,
            equipment,
            address,
        } = value;
        Self {
            space_id,
            space_name,
            owner,
            is_active,
            description,
            capacity,
            equipment,
            address,
        }
    }
}
