//! Signup and login resolvers

use async_graphql::{Context, Object, Result as GraphQLResult, SimpleObject};
use chrono::Duration;

use crate::binding::DataBinding;
use crate::config::Config;
use crate::schema::user::User;

/// Token plus the user it identifies, returned by `login`.
#[derive(SimpleObject, Clone, Debug)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Sign up a user. The password is hashed before it leaves the
    /// gateway; the data service only ever sees the Argon2 hash.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
    ) -> GraphQLResult<User> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;

        let password_hash = auth_core::password::hash_password(&password)
            .map_err(|e| format!("Failed to hash password: {}", e))?;

        let user = binding
            .create_user(&name, &email, &password_hash)
            .await
            .map_err(|e| format!("Failed to create user: {}", e))?;

        Ok(user.into())
    }

    /// Verify credentials and issue a bearer token embedding the user id.
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> GraphQLResult<AuthPayload> {
        let binding = ctx
            .data::<DataBinding>()
            .map_err(|_| "Data binding not available")?;
        let config = ctx
            .data::<Config>()
            .map_err(|_| "Configuration not available")?;

        let user = binding
            .user_by_email(&email)
            .await
            .map_err(|e| format!("Login failed: {}", e))?
            .ok_or_else(|| format!("No such user found for email: {}", email))?;

        let stored_hash = user
            .password
            .as_deref()
            .ok_or("Stored user record carries no password hash")?;

        let valid = auth_core::password::verify_password(&password, stored_hash)
            .map_err(|e| format!("Login failed: {}", e))?;

        if !valid {
            return Err("Invalid password".into());
        }

        let token = auth_core::token::issue_token(
            &user.id,
            &config.auth.secret,
            Duration::days(config.auth.token_expiry_days),
        )
        .map_err(|e| format!("Failed to issue token: {}", e))?;

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }
}
