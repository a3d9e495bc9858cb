use infinityx::config::SecurityConfig;
use infinityx::db::{CourseInput, ProgramInput, Store, bootstrap};

/// Low-cost Argon2 parameters so the seed hash does not dominate test time.
fn test_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
        ..SecurityConfig::default()
    }
}

async fn memory_store() -> Store {
    // A single connection keeps the in-memory database alive for the
    // duration of the test.
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store")
}

#[tokio::test]
async fn test_bootstrap_seeds_exactly_one_admin() {
    let store = memory_store().await;
    bootstrap::auto_initialize(&store, &test_security()).await;

    assert_eq!(store.count_accounts().await.unwrap(), 1);

    let admin = store
        .get_account_by_username(bootstrap::DEFAULT_ADMIN_USERNAME)
        .await
        .unwrap()
        .expect("seed admin should exist");
    assert_eq!(admin.username, "admin");
    assert!(admin.last_login_at.is_none());
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let store = memory_store().await;

    bootstrap::auto_initialize(&store, &test_security()).await;
    bootstrap::auto_initialize(&store, &test_security()).await;

    // No second admin row, no error on the repeated schema/migration pass.
    assert_eq!(store.count_accounts().await.unwrap(), 1);
}

#[tokio::test]
async fn test_seed_admin_authenticates_with_default_credentials() {
    let store = memory_store().await;
    bootstrap::auto_initialize(&store, &test_security()).await;

    let account = store
        .authenticate_account(
            bootstrap::DEFAULT_ADMIN_USERNAME,
            bootstrap::DEFAULT_ADMIN_PASSWORD,
        )
        .await
        .unwrap()
        .expect("default credentials should authenticate");

    assert_eq!(account.username, "admin");
    assert!(account.last_login_at.is_some(), "login time should be recorded");
}

#[tokio::test]
async fn test_authenticate_is_uniform_for_unknown_and_wrong() {
    let store = memory_store().await;
    bootstrap::auto_initialize(&store, &test_security()).await;

    let unknown = store
        .authenticate_account("nobody", "admin123")
        .await
        .unwrap();
    assert!(unknown.is_none());

    let wrong = store
        .authenticate_account("admin", "not-the-password")
        .await
        .unwrap();
    assert!(wrong.is_none());
}

#[tokio::test]
async fn test_migrated_columns_are_usable() {
    let store = memory_store().await;
    bootstrap::auto_initialize(&store, &test_security()).await;

    // These columns are not in the schema script; the additive migrations
    // must have put them in place.
    let course = store
        .create_course(CourseInput {
            title: "Data Engineering".to_string(),
            slug: "data-engineering".to_string(),
            summary: None,
            body: None,
            image_url: None,
            published: true,
            course_link: Some("https://example.com/enroll".to_string()),
            category: Some("Engineering".to_string()),
            course_type: Some("bootcamp".to_string()),
        })
        .await
        .unwrap();

    let fetched = store.get_course(course.id).await.unwrap().unwrap();
    assert_eq!(fetched.category.as_deref(), Some("Engineering"));
    assert_eq!(fetched.course_type.as_deref(), Some("bootcamp"));
}

#[tokio::test]
async fn test_bootstrap_creates_program_and_job_tables() {
    let store = memory_store().await;
    bootstrap::auto_initialize(&store, &test_security()).await;

    let program = store
        .create_program(ProgramInput {
            title: "Astronomy Club".to_string(),
            title_ar: Some("نادي الفلك".to_string()),
            description: None,
            description_ar: None,
            image_url: None,
            duration: Some("12 weeks".to_string()),
            skills: Some("telescopes, star charts".to_string()),
            category: "space".to_string(),
        })
        .await
        .unwrap();

    let fetched = store.get_program(program.id).await.unwrap().unwrap();
    assert_eq!(fetched.category, "space");
    assert_eq!(fetched.title_ar.as_deref(), Some("نادي الفلك"));

    assert!(store.list_job_listings(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_account_creation_is_recoverable() {
    let store = memory_store().await;
    let security = test_security();
    bootstrap::auto_initialize(&store, &security).await;

    let duplicate = store
        .create_account("admin", "another-password", None, None, &security)
        .await
        .unwrap();
    assert!(duplicate.is_none(), "duplicate username should be a no-op");
    assert_eq!(store.count_accounts().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_password_replaces_credential() {
    let store = memory_store().await;
    let security = test_security();
    bootstrap::auto_initialize(&store, &security).await;

    let admin = store
        .get_account_by_username("admin")
        .await
        .unwrap()
        .unwrap();

    store
        .update_account_password(admin.id, "a-new-password", &security)
        .await
        .unwrap();

    let old = store
        .authenticate_account("admin", bootstrap::DEFAULT_ADMIN_PASSWORD)
        .await
        .unwrap();
    assert!(old.is_none(), "old password should no longer work");

    let new = store
        .authenticate_account("admin", "a-new-password")
        .await
        .unwrap();
    assert!(new.is_some());
}
