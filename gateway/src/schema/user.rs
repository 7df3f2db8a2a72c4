//! User schema and resolvers

use async_graphql::{Context, Object, Result as GraphQLResult, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::binding::{DataBinding, UserRecord};
use crate::middleware::auth::current_user_id;

/// Public user type. The stored password hash never appears here.
#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// All registered users.
    async fn users(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<User>> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let users = binding
            .users()
            .await
            .map_err(|e| format!("Failed to list users: {}", e))?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    /// The caller's own user record, or null for anonymous requests.
    async fn me(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let Some(id) = current_user_id(ctx)? else {
            return Ok(None);
        };

        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let user = binding
            .user_by_id(&id)
            .await
            .map_err(|e| format!("Failed to load current user: {}", e))?;

        Ok(user.map(Into::into))
    }
}
