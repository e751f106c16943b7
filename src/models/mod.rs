use crate::entities::uploaded_images;
use sea_orm::{ActiveValue::NotSet, FromQueryResult, Set};

/// Content type stored when the client does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Input for creating an uploaded image record.
///
/// Every field is optional; `into_active_model` fills in the column defaults
/// (empty name, empty payload, `image/jpeg`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewImage {
    pub name: Option<String>,
    pub data: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

impl NewImage {
    pub fn into_active_model(self) -> uploaded_images::ActiveModel {
        uploaded_images::ActiveModel {
            id: NotSet,
            name: Set(self.name.unwrap_or_default()),
            data: Set(self.data.unwrap_or_default()),
            content_type: Set(self
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())),
        }
    }
}

/// Admin listing row: everything except the payload itself.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ImageSummary {
    pub id: i32,
    pub name: String,
    pub content_type: String,
    pub size: i64,
}
