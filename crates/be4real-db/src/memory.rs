//! In-memory implementation of every repository trait
//!
//! Used by service and API tests. A single mutex guards all tables, so each
//! ledger transition is atomic in the same way a database transaction is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use be4real_core::{
    DomainError, FeedQuery, Post, PostRepository, Reaction, ReactionCounts,
    ReactionLabel, ReactionRepository, RepoResult, Snowflake, User, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<Snowflake, User>,
    posts: BTreeMap<Snowflake, Post>,
    reactions: HashMap<(Snowflake, Snowflake), Reaction>,
}

/// Repository fake backed by plain collections
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a database error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of repository calls served so far
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Overwrite a post's aggregate without touching reaction rows
    pub fn corrupt_post_counts(&self, post_id: Snowflake, counts: ReactionCounts) {
        if let Some(post) = self.tables.lock().posts.get_mut(&post_id) {
            post.reactions = counts;
        }
    }

    /// Overwrite a user's received counter without touching reaction rows
    pub fn corrupt_reactions_received(&self, user_id: Snowflake, count: i64) {
        if let Some(user) = self.tables.lock().users.get_mut(&user_id) {
            user.reactions_received = count;
        }
    }

    fn enter(&self) -> RepoResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("injected failure".to_string()));
        }
        Ok(())
    }
}

fn ids_after<V>(map: &BTreeMap<Snowflake, V>, after: Option<Snowflake>, limit: i64) -> Vec<Snowflake> {
    let limit = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
    map.keys()
        .filter(|id| after.map_or(true, |a| **id > a))
        .take(limit)
        .copied()
        .collect()
}

impl Tables {
    fn bump_received(&mut self, owner_id: Snowflake, delta: i64) {
        if let Some(owner) = self.users.get_mut(&owner_id) {
            owner.reactions_received = (owner.reactions_received + delta).max(0);
        }
    }

    fn tally_post(&self, post_id: Snowflake) -> ReactionCounts {
        let mut counts = ReactionCounts::new();
        for reaction in self.reactions.values().filter(|r| r.post_id == post_id) {
            counts.increment(&reaction.label);
        }
        counts
    }

    fn tally_received(&self, owner_id: Snowflake) -> i64 {
        let count = self
            .reactions
            .values()
            .filter(|r| {
                self.posts
                    .get(&r.post_id)
                    .is_some_and(|p| p.is_authored_by(owner_id))
            })
            .count();
        i64::try_from(count).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        self.enter()?;
        Ok(self.tables.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.enter()?;
        let tables = self.tables.lock();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.enter()?;
        let tables = self.tables.lock();
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        self.enter()?;
        let mut tables = self.tables.lock();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameTaken);
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_verification_code(&self, id: Snowflake, code: &str) -> RepoResult<()> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let user = tables.users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        user.verification_code = Some(code.to_string());
        Ok(())
    }

    async fn mark_verified(&self, id: Snowflake) -> RepoResult<()> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let user = tables.users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        user.verified = true;
        user.verification_code = None;
        Ok(())
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password_hash: &str,
    ) -> RepoResult<bool> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let user = tables
            .users
            .values_mut()
            .find(|u| u.email == email && u.verification_code.as_deref() == Some(code));
        Ok(match user {
            Some(user) => {
                user.password_hash = Some(password_hash.to_string());
                user.verification_code = None;
                true
            }
            None => false,
        })
    }

    async fn find_ids_after(
        &self,
        after: Option<Snowflake>,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        self.enter()?;
        Ok(ids_after(&self.tables.lock().users, after, limit))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        self.enter()?;
        Ok(self.tables.lock().posts.get(&id).cloned())
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.enter()?;
        self.tables.lock().posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_page(&self, query: FeedQuery) -> RepoResult<Vec<Post>> {
        self.enter()?;
        let limit = usize::try_from(query.limit.max(1)).unwrap_or(usize::MAX);
        let tables = self.tables.lock();

        let mut window: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| query.cursor.map_or(true, |c| c.admits(p.created_at, p.id)))
            .collect();
        window.sort_by_key(|p| std::cmp::Reverse(p.sort_key()));

        let page: Vec<Post> = window.into_iter().take(limit).cloned().collect();
        Ok(page)
    }

    async fn find_ids_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        self.enter()?;
        let tables = self.tables.lock();
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| p.is_authored_by(author_id))
            .collect();
        posts.sort_by_key(|p| p.sort_key());
        Ok(posts.into_iter().map(|p| p.id).collect())
    }

    async fn find_ids_after(
        &self,
        after: Option<Snowflake>,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        self.enter()?;
        Ok(ids_after(&self.tables.lock().posts, after, limit))
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn find(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Reaction>> {
        self.enter()?;
        Ok(self.tables.lock().reactions.get(&(post_id, user_id)).cloned())
    }

    async fn insert(&self, reaction: &Reaction, owner_id: Snowflake) -> RepoResult<bool> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let key = (reaction.post_id, reaction.user_id);
        if tables.reactions.contains_key(&key) {
            return Ok(false);
        }
        let post = tables
            .posts
            .get_mut(&reaction.post_id)
            .ok_or(DomainError::PostNotFound(reaction.post_id))?;
        post.reactions.increment(&reaction.label);
        tables.reactions.insert(key, reaction.clone());
        tables.bump_received(owner_id, 1);
        Ok(true)
    }

    async fn delete_if_label(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        label: &ReactionLabel,
        owner_id: Snowflake,
    ) -> RepoResult<bool> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let key = (post_id, user_id);
        if !tables.reactions.get(&key).is_some_and(|r| r.has_label(label)) {
            return Ok(false);
        }
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;
        post.reactions.decrement(label);
        tables.reactions.remove(&key);
        tables.bump_received(owner_id, -1);
        Ok(true)
    }

    async fn switch_label(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        from: &ReactionLabel,
        to: &ReactionLabel,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let key = (post_id, user_id);
        if !tables.reactions.get(&key).is_some_and(|r| r.has_label(from)) {
            return Ok(false);
        }
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;
        post.reactions.switch(from, to);
        if let Some(reaction) = tables.reactions.get_mut(&key) {
            reaction.label = to.clone();
            reaction.created_at = at;
        }
        Ok(true)
    }

    async fn count_by_label(&self, post_id: Snowflake) -> RepoResult<ReactionCounts> {
        self.enter()?;
        Ok(self.tables.lock().tally_post(post_id))
    }

    async fn count_received(&self, owner_id: Snowflake) -> RepoResult<i64> {
        self.enter()?;
        Ok(self.tables.lock().tally_received(owner_id))
    }

    async fn repair_post_counts(&self, post_id: Snowflake) -> RepoResult<bool> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let counts = tables.tally_post(post_id);
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;
        if post.reactions == counts {
            return Ok(false);
        }
        post.reactions = counts;
        Ok(true)
    }

    async fn repair_received(&self, owner_id: Snowflake) -> RepoResult<bool> {
        self.enter()?;
        let mut tables = self.tables.lock();
        let received = tables.tally_received(owner_id);
        let owner = tables
            .users
            .get_mut(&owner_id)
            .ok_or(DomainError::UserNotFound(owner_id))?;
        if owner.reactions_received == received {
            return Ok(false);
        }
        owner.reactions_received = received;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use be4real_core::{FeedCursor, FeedDirection};
    use chrono::Duration;

    fn user(id: i64) -> User {
        User::new(
            Snowflake::new(id),
            format!("user{id}"),
            format!("user{id}@example.com"),
            "hash".to_string(),
        )
    }

    fn post_at(store: &MemoryStore, id: i64, author: i64, minutes_ago: i64) -> Post {
        let mut post = Post::new(Snowflake::new(id), Snowflake::new(author), "aGk=".to_string());
        post.created_at = Utc::now() - Duration::minutes(minutes_ago);
        store.tables.lock().posts.insert(post.id, post.clone());
        post
    }

    fn label(s: &str) -> ReactionLabel {
        ReactionLabel::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let store = MemoryStore::new();
        UserRepository::create(&store, &user(1)).await.unwrap();

        let mut dup_email = user(2);
        dup_email.email = "user1@example.com".to_string();
        assert!(matches!(
            UserRepository::create(&store, &dup_email).await,
            Err(DomainError::EmailAlreadyExists)
        ));

        let mut dup_name = user(3);
        dup_name.username = "user1".to_string();
        assert!(matches!(
            UserRepository::create(&store, &dup_name).await,
            Err(DomainError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn test_reset_password_requires_matching_code() {
        let store = MemoryStore::new();
        UserRepository::create(&store, &user(1)).await.unwrap();
        store.set_verification_code(Snowflake::new(1), "123456").await.unwrap();

        assert!(!store.reset_password("user1@example.com", "000000", "new").await.unwrap());
        assert!(store.reset_password("user1@example.com", "123456", "new").await.unwrap());

        let user = UserRepository::find_by_id(&store, Snowflake::new(1)).await.unwrap().unwrap();
        assert_eq!(user.password_hash.as_deref(), Some("new"));
        assert!(user.verification_code.is_none());
    }

    #[tokio::test]
    async fn test_find_page_windows() {
        let store = MemoryStore::new();
        for (id, minutes_ago) in [(1, 50), (2, 40), (3, 30), (4, 20), (5, 10)] {
            post_at(&store, id, 1, minutes_ago);
        }
        let pivot = PostRepository::find_by_id(&store, Snowflake::new(3)).await.unwrap().unwrap();

        let ids = |posts: Vec<Post>| posts.iter().map(|p| p.id.into_inner()).collect::<Vec<_>>();

        let page = store.find_page(FeedQuery { cursor: None, limit: 2 }).await.unwrap();
        assert_eq!(ids(page), vec![5, 4]);

        let before = FeedCursor::from_post(FeedDirection::Before, &pivot);
        let page = store.find_page(FeedQuery { cursor: Some(before), limit: 10 }).await.unwrap();
        assert_eq!(ids(page), vec![2, 1]);

        // newest first, so a short window keeps the newest of the newer posts
        let after = FeedCursor::from_post(FeedDirection::After, &pivot);
        let page = store.find_page(FeedQuery { cursor: Some(after), limit: 10 }).await.unwrap();
        assert_eq!(ids(page), vec![5, 4]);
        let page = store.find_page(FeedQuery { cursor: Some(after), limit: 1 }).await.unwrap();
        assert_eq!(ids(page), vec![5]);
    }

    #[tokio::test]
    async fn test_ledger_primitives_are_conditional() {
        let store = MemoryStore::new();
        UserRepository::create(&store, &user(1)).await.unwrap();
        post_at(&store, 10, 1, 0);
        let (post_id, user_id, owner) = (Snowflake::new(10), Snowflake::new(2), Snowflake::new(1));

        let reaction = Reaction::new(Snowflake::new(100), post_id, user_id, label("fire"));
        assert!(store.insert(&reaction, owner).await.unwrap());
        assert!(!store.insert(&reaction, owner).await.unwrap());

        assert!(!store.delete_if_label(post_id, user_id, &label("meh"), owner).await.unwrap());
        assert!(store
            .switch_label(post_id, user_id, &label("fire"), &label("meh"), Utc::now())
            .await
            .unwrap());
        assert!(!store
            .switch_label(post_id, user_id, &label("fire"), &label("wow"), Utc::now())
            .await
            .unwrap());

        let post = PostRepository::find_by_id(&store, post_id).await.unwrap().unwrap();
        assert_eq!(post.reactions.get("meh"), 1);
        assert_eq!(post.reactions.get("fire"), 0);
        assert_eq!(store.count_received(owner).await.unwrap(), 1);

        assert!(store.delete_if_label(post_id, user_id, &label("meh"), owner).await.unwrap());
        let owner = UserRepository::find_by_id(&store, owner).await.unwrap().unwrap();
        assert_eq!(owner.reactions_received, 0);
    }

    #[tokio::test]
    async fn test_repair_rebuilds_from_rows() {
        let store = MemoryStore::new();
        UserRepository::create(&store, &user(1)).await.unwrap();
        post_at(&store, 10, 1, 0);
        let (post_id, owner) = (Snowflake::new(10), Snowflake::new(1));

        let reaction = Reaction::new(Snowflake::new(100), post_id, Snowflake::new(2), label("fire"));
        assert!(store.insert(&reaction, owner).await.unwrap());
        assert!(!store.repair_post_counts(post_id).await.unwrap());
        assert!(!store.repair_received(owner).await.unwrap());

        store.corrupt_post_counts(post_id, ReactionCounts::new());
        store.corrupt_reactions_received(owner, 9);
        assert!(store.repair_post_counts(post_id).await.unwrap());
        assert!(store.repair_received(owner).await.unwrap());

        let post = PostRepository::find_by_id(&store, post_id).await.unwrap().unwrap();
        assert_eq!(post.reactions.get("fire"), 1);
        let owner = UserRepository::find_by_id(&store, owner).await.unwrap().unwrap();
        assert_eq!(owner.reactions_received, 1);

        assert!(matches!(
            store.repair_post_counts(Snowflake::new(99)).await,
            Err(DomainError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.set_failing(true);
        let result = PostRepository::find_by_id(&store, Snowflake::new(1)).await;
        assert!(matches!(result, Err(DomainError::DatabaseError(_))));
        assert_eq!(store.calls(), 1);

        store.set_failing(false);
        assert!(PostRepository::find_by_id(&store, Snowflake::new(1)).await.unwrap().is_none());
    }
}
