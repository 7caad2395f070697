use std::sync::Arc;

use formdesk::config::AppConfig;
use formdesk::store::sqlite::SqliteStore;
use formdesk::store::Store;
use formdesk::{boot, build};

#[rocket::launch]
fn rocket() -> _ {
    env_logger::init();

    let figment = AppConfig::figment();
    let config = AppConfig::from_figment(&figment);

    // Verify/create directories before touching the database
    boot::run(&config);

    let store = SqliteStore::new_at(&config.db_path, config.pool_size)
        .expect("Failed to initialize database pool");
    store
        .run_migrations()
        .expect("Failed to run database migrations");

    log::info!(
        "Serving uploads from {} at {}",
        config.upload_dir,
        config.public_upload_base
    );

    let store: Arc<dyn Store> = Arc::new(store);
    build(figment, &config, store)
}
