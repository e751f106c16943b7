use crate::entities::{prelude::*, uploaded_images};
use crate::models::{ImageSummary, NewImage};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect,
};

/// Persistence for uploaded image records.
///
/// Records are append-only. There is no update or delete.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert one record and return it with its assigned id.
    async fn create(&self, image: NewImage) -> Result<uploaded_images::Model, DbErr>;

    async fn find(&self, id: i32) -> Result<Option<uploaded_images::Model>, DbErr>;

    /// Newest-first page of summaries. Payloads are not loaded.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<ImageSummary>, DbErr>;

    async fn count(&self) -> Result<u64, DbErr>;

    /// Check if the backing database is reachable
    async fn ping(&self) -> Result<(), DbErr>;
}

pub struct DbImageStore {
    db: DatabaseConnection,
}

impl DbImageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImageStore for DbImageStore {
    async fn create(&self, image: NewImage) -> Result<uploaded_images::Model, DbErr> {
        image.into_active_model().insert(&self.db).await
    }

    async fn find(&self, id: i32) -> Result<Option<uploaded_images::Model>, DbErr> {
        UploadedImages::find_by_id(id).one(&self.db).await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<ImageSummary>, DbErr> {
        UploadedImages::find()
            .select_only()
            .column(uploaded_images::Column::Id)
            .column(uploaded_images::Column::Name)
            .column(uploaded_images::Column::ContentType)
            .column_as(Expr::cust("CAST(LENGTH(data) AS BIGINT)"), "size")
            .order_by_desc(uploaded_images::Column::Id)
            .offset(offset)
            .limit(limit)
            .into_model::<ImageSummary>()
            .all(&self.db)
            .await
    }

    async fn count(&self) -> Result<u64, DbErr> {
        UploadedImages::find().count(&self.db).await
    }

    async fn ping(&self) -> Result<(), DbErr> {
        self.db.ping().await
    }
}
