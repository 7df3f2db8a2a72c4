//! Post schema and resolvers

use async_graphql::{Context, Object, Result as GraphQLResult, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::binding::{DataBinding, PostRecord};
use crate::middleware::auth::current_user_id;
use crate::schema::user::User;

#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub text: String,
    pub is_published: bool,
    pub author: Option<User>,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Post {
            id: record.id,
            title: record.title,
            text: record.text,
            is_published: record.is_published,
            author: record.author.map(Into::into),
        }
    }
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Published posts.
    async fn feed(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let posts = binding
            .posts(true)
            .await
            .map_err(|e| format!("Failed to list feed: {}", e))?;

        Ok(posts.into_iter().map(Into::into).collect())
    }

    /// Unpublished posts.
    async fn drafts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let posts = binding
            .posts(false)
            .await
            .map_err(|e| format!("Failed to list drafts: {}", e))?;

        Ok(posts.into_iter().map(Into::into).collect())
    }

    /// A single post by id.
    async fn post(&self, ctx: &Context<'_>, id: String) -> GraphQLResult<Option<Post>> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let post = binding
            .post(&id)
            .await
            .map_err(|e| format!("Failed to get post: {}", e))?;

        Ok(post.map(Into::into))
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create an unpublished draft. An authenticated caller becomes the
    /// author; an anonymous caller creates an authorless post.
    async fn create_draft(
        &self,
        ctx: &Context<'_>,
        title: String,
        text: String,
    ) -> GraphQLResult<Post> {
        let author_id = current_user_id(ctx)?;

        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let post = binding
            .create_post(&title, &text, author_id.as_deref())
            .await
            .map_err(|e| format!("Failed to create draft: {}", e))?;

        Ok(post.into())
    }

    /// Delete a post by id, returning the deleted post.
    async fn delete_post(&self, ctx: &Context<'_>, id: String) -> GraphQLResult<Option<Post>> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let post = binding
            .delete_post(&id)
            .await
            .map_err(|e| format!("Failed to delete post: {}", e))?;

        Ok(post.map(Into::into))
    }

    /// Mark a post as published.
    async fn publish(&self, ctx: &Context<'_>, id: String) -> GraphQLResult<Option<Post>> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let post = binding
            .publish_post(&id)
            .await
            .map_err(|e| format!("Failed to publish post: {}", e))?;

        Ok(post.map(Into::into))
    }
}
