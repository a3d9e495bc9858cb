use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{applications, courses, job_listings, messages, posts, programs};

pub mod bootstrap;
pub mod repositories;

pub use repositories::account::Account;
pub use repositories::course::CourseInput;
pub use repositories::inbox::{ApplicationInput, MessageInput};
pub use repositories::job::JobListingInput;
pub use repositories::post::PostInput;
pub use repositories::program::ProgramInput;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        if db_url.starts_with("sqlite:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        info!(
            "Database connected (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn course_repo(&self) -> repositories::course::CourseRepository {
        repositories::course::CourseRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn inbox_repo(&self) -> repositories::inbox::InboxRepository {
        repositories::inbox::InboxRepository::new(self.conn.clone())
    }

    fn settings_repo(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    fn program_repo(&self) -> repositories::program::ProgramRepository {
        repositories::program::ProgramRepository::new(self.conn.clone())
    }

    fn job_repo(&self) -> repositories::job::JobRepository {
        repositories::job::JobRepository::new(self.conn.clone())
    }

    // ========== Accounts ==========

    pub async fn get_account_by_id(&self, id: i32) -> Result<Option<Account>> {
        self.account_repo().get_by_id(id).await
    }

    pub async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_username(username).await
    }

    pub async fn authenticate_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        self.account_repo().authenticate(username, password).await
    }

    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
        name: Option<&str>,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        self.account_repo()
            .create(username, password, email, name, config)
            .await
    }

    pub async fn update_account_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.account_repo()
            .update_password(id, new_password, config)
            .await
    }

    pub(crate) async fn account_password_hash(&self, id: i32) -> Result<Option<String>> {
        self.account_repo().password_hash_by_id(id).await
    }

    pub async fn count_accounts(&self) -> Result<u64> {
        self.account_repo().count().await
    }

    // ========== Courses ==========

    pub async fn list_courses(&self, published_only: bool) -> Result<Vec<courses::Model>> {
        self.course_repo().list(published_only).await
    }

    pub async fn get_course(&self, id: i32) -> Result<Option<courses::Model>> {
        self.course_repo().get(id).await
    }

    pub async fn get_course_by_slug(&self, slug: &str) -> Result<Option<courses::Model>> {
        self.course_repo().get_by_slug(slug).await
    }

    pub async fn create_course(&self, input: CourseInput) -> Result<courses::Model> {
        self.course_repo().create(input).await
    }

    pub async fn update_course(
        &self,
        id: i32,
        input: CourseInput,
    ) -> Result<Option<courses::Model>> {
        self.course_repo().update(id, input).await
    }

    pub async fn delete_course(&self, id: i32) -> Result<bool> {
        self.course_repo().delete(id).await
    }

    // ========== Posts ==========

    pub async fn list_posts(&self, published_only: bool) -> Result<Vec<posts::Model>> {
        self.post_repo().list(published_only).await
    }

    pub async fn get_post(&self, id: i32) -> Result<Option<posts::Model>> {
        self.post_repo().get(id).await
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<posts::Model>> {
        self.post_repo().get_by_slug(slug).await
    }

    pub async fn create_post(&self, input: PostInput) -> Result<posts::Model> {
        self.post_repo().create(input).await
    }

    pub async fn update_post(&self, id: i32, input: PostInput) -> Result<Option<posts::Model>> {
        self.post_repo().update(id, input).await
    }

    pub async fn delete_post(&self, id: i32) -> Result<bool> {
        self.post_repo().delete(id).await
    }

    // ========== Programs ==========

    pub async fn list_programs(&self, category: Option<&str>) -> Result<Vec<programs::Model>> {
        self.program_repo().list(category).await
    }

    pub async fn get_program(&self, id: i32) -> Result<Option<programs::Model>> {
        self.program_repo().get(id).await
    }

    pub async fn create_program(&self, input: ProgramInput) -> Result<programs::Model> {
        self.program_repo().create(input).await
    }

    pub async fn update_program(
        &self,
        id: i32,
        input: ProgramInput,
    ) -> Result<Option<programs::Model>> {
        self.program_repo().update(id, input).await
    }

    pub async fn delete_program(&self, id: i32) -> Result<bool> {
        self.program_repo().delete(id).await
    }

    // ========== Job listings ==========

    pub async fn list_job_listings(&self, open_only: bool) -> Result<Vec<job_listings::Model>> {
        self.job_repo().list(open_only).await
    }

    pub async fn create_job_listing(&self, input: JobListingInput) -> Result<job_listings::Model> {
        self.job_repo().create(input).await
    }

    pub async fn update_job_listing(
        &self,
        id: i32,
        input: JobListingInput,
    ) -> Result<Option<job_listings::Model>> {
        self.job_repo().update(id, input).await
    }

    pub async fn delete_job_listing(&self, id: i32) -> Result<bool> {
        self.job_repo().delete(id).await
    }

    // ========== Inbox ==========

    pub async fn add_message(&self, input: MessageInput) -> Result<messages::Model> {
        self.inbox_repo().add_message(input).await
    }

    pub async fn list_messages(&self, unread_only: bool) -> Result<Vec<messages::Model>> {
        self.inbox_repo().list_messages(unread_only).await
    }

    pub async fn mark_message_read(&self, id: i32) -> Result<bool> {
        self.inbox_repo().mark_message_read(id).await
    }

    pub async fn delete_message(&self, id: i32) -> Result<bool> {
        self.inbox_repo().delete_message(id).await
    }

    pub async fn add_application(&self, input: ApplicationInput) -> Result<applications::Model> {
        self.inbox_repo().add_application(input).await
    }

    pub async fn list_applications(&self) -> Result<Vec<applications::Model>> {
        self.inbox_repo().list_applications().await
    }

    pub async fn update_application_status(&self, id: i32, status: &str) -> Result<bool> {
        self.inbox_repo().update_application_status(id, status).await
    }

    // ========== Settings ==========

    pub async fn all_settings(&self) -> Result<HashMap<String, String>> {
        self.settings_repo().all().await
    }

    pub async fn get_setting(&self, name: &str) -> Result<Option<String>> {
        self.settings_repo().get(name).await
    }

    pub async fn set_setting(&self, name: &str, value: &str) -> Result<()> {
        self.settings_repo().set(name, value).await
    }
}
