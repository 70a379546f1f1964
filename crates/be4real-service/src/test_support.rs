//! Shared fixtures for service tests

use std::sync::Arc;

use be4real_common::{hash_password, JwtService};
use be4real_core::{Post, PostRepository, Snowflake, User, UserRepository};
use be4real_db::MemoryStore;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::services::ServiceContext;

pub const TEST_SECRET: &str = "test-secret-key-that-is-long-enough";
pub const TEST_PASSWORD: &str = "correct horse battery";

pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub ctx: ServiceContext,
    epoch: DateTime<Utc>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let ctx = ServiceContext::builder()
            .memory_store(store.clone())
            .jwt_service(Arc::new(JwtService::new(TEST_SECRET, 3600)))
            .max_image_bytes(1024)
            .build()
            .expect("context builds");
        Self {
            store,
            ctx,
            epoch: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    /// Store a verified password user
    pub async fn seed_user(&self, username: &str) -> User {
        let mut user = User::new(
            self.ctx.generate_id(),
            username.to_string(),
            format!("{username}@example.com"),
            hash_password(TEST_PASSWORD).unwrap(),
        );
        user.verified = true;
        UserRepository::create(self.store.as_ref(), &user).await.unwrap();
        user
    }

    pub async fn seed_post(&self, author: &User) -> Post {
        let post = Post::new(self.ctx.generate_id(), author.id, "aGVsbG8=".to_string());
        PostRepository::create(self.store.as_ref(), &post).await.unwrap();
        post
    }

    /// Store one post per entry, created `stamp` seconds after a fixed epoch
    pub async fn seed_feed(&self, stamps: &[i64]) -> Vec<Post> {
        let author = self.seed_user(&format!("author{}", self.ctx.generate_id())).await;
        let mut posts = Vec::with_capacity(stamps.len());
        for stamp in stamps {
            let mut post = Post::new(self.ctx.generate_id(), author.id, "aGVsbG8=".to_string());
            post.created_at = self.epoch + Duration::seconds(*stamp);
            PostRepository::create(self.store.as_ref(), &post).await.unwrap();
            posts.push(post);
        }
        posts
    }

    pub fn id_at(&self, posts: &[Post], stamp: i64) -> String {
        let at = self.epoch + Duration::seconds(stamp);
        posts
            .iter()
            .find(|p| p.created_at == at)
            .map(|p| p.id.to_string())
            .expect("seeded stamp")
    }

    pub fn ids_of(&self, posts: &[Post], stamps: &[i64]) -> Vec<String> {
        stamps.iter().map(|s| self.id_at(posts, *s)).collect()
    }

    pub async fn post(&self, id: Snowflake) -> Post {
        PostRepository::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .expect("post exists")
    }

    pub async fn user(&self, id: Snowflake) -> User {
        UserRepository::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .expect("user exists")
    }
}

/// Log sink for asserting on formatted output
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
