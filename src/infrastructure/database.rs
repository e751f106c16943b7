use crate::entities::uploaded_images;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", db_url);

    let db = connect(db_url).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(db_url);

    // Every connection to an in-memory SQLite database opens its own empty database
    if db_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(100).min_connections(5);
    }

    opt.connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    if !db_url.contains(":memory:") {
        opt.idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800));
    }

    Ok(Database::connect(opt).await?)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    let stmt = schema
        .create_table_from_entity(uploaded_images::Entity)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&stmt)).await?;
    info!("   - Table 'uploaded_images' checked/created");

    Ok(())
}
