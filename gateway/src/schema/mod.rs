//! Public GraphQL schema
//!
//! Queries and mutations are thin resolvers: each shapes a payload,
//! forwards it through the data binding, and returns the result unchanged.

pub mod auth;
pub mod post;
pub mod user;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::binding::DataBinding;
use crate::config::Config;

/// Root query object
#[derive(MergedObject, Default)]
pub struct QueryRoot(post::PostQuery, user::UserQuery);

/// Root mutation object
#[derive(MergedObject, Default)]
pub struct MutationRoot(post::PostMutation, auth::AuthMutation);

/// GraphQL schema type for the gateway
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the gateway schema with the data binding and configuration
/// attached as context data.
pub fn build_schema(binding: DataBinding, config: Config) -> AppSchema {
    let introspection = config.graphql.introspection;

    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(binding)
    .data(config);

    if !introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
