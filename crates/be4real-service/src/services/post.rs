//! Post service
//!
//! Creates posts from base64 image payloads and looks single posts up.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use be4real_core::{DomainError, Post, Snowflake};
use tracing::{info, instrument};

use crate::dto::{prepare, CreatePostRequest, PostResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Parse a post id taken from a route
pub fn parse_post_id(raw: &str) -> ServiceResult<Snowflake> {
    Snowflake::parse(raw.trim()).map_err(|_| ServiceError::validation("Invalid post ID"))
}

/// Strip an optional `data:<mime>;base64,` prefix
fn base64_payload(image: &str) -> Result<&str, DomainError> {
    match image.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| DomainError::InvalidImage("Data URL must be base64 encoded".to_string())),
        None => Ok(image),
    }
}

/// Check that the payload decodes and fits under `max_bytes`
fn check_image(image: &str, max_bytes: usize) -> Result<(), DomainError> {
    let payload = base64_payload(image)?;

    // reject before decoding anything far too large
    if payload.len() / 4 * 3 > max_bytes.saturating_add(3) {
        return Err(DomainError::InvalidImage(format!(
            "Image exceeds {max_bytes} bytes"
        )));
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| DomainError::InvalidImage("Image is not valid base64".to_string()))?;

    if decoded.is_empty() {
        return Err(DomainError::InvalidImage("Image is empty".to_string()));
    }
    if decoded.len() > max_bytes {
        return Err(DomainError::InvalidImage(format!(
            "Image exceeds {max_bytes} bytes"
        )));
    }
    Ok(())
}

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a post authored by `author_id`
    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        author_id: Snowflake,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let request = prepare(request)?;
        check_image(&request.img_data, self.ctx.max_image_bytes())?;

        self.ctx
            .user_repo()
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", author_id.to_string()))?;

        let post = Post::new(self.ctx.generate_id(), author_id, request.img_data);
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");

        Ok(PostResponse::from(post))
    }

    /// Look a post up, with the viewer's own reaction when known
    #[instrument(skip(self))]
    pub async fn get_post(
        &self,
        post_id: &str,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PostResponse> {
        let post_id = parse_post_id(post_id)?;

        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;

        let my_reaction = match viewer {
            Some(viewer) => self
                .ctx
                .reaction_repo()
                .find(post_id, viewer)
                .await?
                .map(|r| r.label.into_inner()),
            None => None,
        };

        Ok(PostResponse::from(post).with_my_reaction(my_reaction))
    }
}
