pub mod custom_order;
pub mod customer;
pub mod dress_order;
pub mod embroidery;
pub mod fabric;
pub mod favorite_dress;
pub mod favorite_tailor;
pub mod image;
pub mod order_status;
pub mod pre_designed;
pub mod review;
pub mod tailor;
pub mod user;

use sea_orm::{
    sea_query::Index, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::debug;

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    debug!(table = entity.table_name(), "table ready");
    Ok(())
}

/// Creates every table the service needs. Safe to run on every start.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, user::Entity).await?;
    create_table(db, &schema, customer::Entity).await?;
    create_table(db, &schema, tailor::Entity).await?;
    create_table(db, &schema, embroidery::Entity).await?;
    create_table(db, &schema, fabric::Entity).await?;
    create_table(db, &schema, pre_designed::Entity).await?;
    create_table(db, &schema, image::Entity).await?;
    create_table(db, &schema, review::Entity).await?;
    create_table(db, &schema, favorite_tailor::Entity).await?;
    create_table(db, &schema, favorite_dress::Entity).await?;
    create_table(db, &schema, custom_order::Entity).await?;
    create_table(db, &schema, dress_order::Entity).await?;

    // A customer reviews a given dress at most once. Rows without a product
    // (tailor reviews) hold NULL and never collide.
    let review_once = Index::create()
        .if_not_exists()
        .name("idx_review_customer_product")
        .table(review::Entity)
        .col(review::Column::CustomerId)
        .col(review::Column::ProductId)
        .unique()
        .to_owned();
    db.execute(db.get_database_backend().build(&review_once))
        .await?;

    Ok(())
}
