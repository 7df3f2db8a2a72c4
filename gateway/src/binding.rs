//! Client binding for the upstream data service
//!
//! Every gateway operation maps 1:1 onto a query or mutation against a
//! remote GraphQL-over-HTTP data service. This module shapes the wire
//! payloads, sends them with a signed service token, and decodes the
//! response envelope into typed records. It adds no retry, batching, or
//! caching on top of the upstream call.

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Lifetime of the service token presented to the data service. The token
/// is re-signed on every process start, so a long horizon is safe.
const SERVICE_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Subject claim identifying this gateway to the data service.
const SERVICE_TOKEN_SUBJECT: &str = "scribe-gateway";

const POSTS_QUERY: &str = r#"
query Posts($published: Boolean!) {
  posts(where: { isPublished: $published }) {
    id title text isPublished author { id name email }
  }
}"#;

const POST_QUERY: &str = r#"
query Post($id: ID!) {
  post(where: { id: $id }) {
    id title text isPublished author { id name email }
  }
}"#;

const USERS_QUERY: &str = r#"
query Users {
  users { id name email }
}"#;

const USER_BY_ID_QUERY: &str = r#"
query User($id: ID!) {
  user(where: { id: $id }) { id name email }
}"#;

// The stored password hash is selected here and nowhere else; it is needed
// for local verification at login and never crosses into the public schema.
const USER_BY_EMAIL_QUERY: &str = r#"
query UserByEmail($email: String!) {
  user(where: { email: $email }) { id name email password }
}"#;

const CREATE_POST_MUTATION: &str = r#"
mutation CreatePost($data: PostCreateInput!) {
  createPost(data: $data) {
    id title text isPublished author { id name email }
  }
}"#;

const PUBLISH_POST_MUTATION: &str = r#"
mutation Publish($id: ID!) {
  updatePost(where: { id: $id }, data: { isPublished: true }) {
    id title text isPublished author { id name email }
  }
}"#;

const DELETE_POST_MUTATION: &str = r#"
mutation DeletePost($id: ID!) {
  deletePost(where: { id: $id }) {
    id title text isPublished author { id name email }
  }
}"#;

const CREATE_USER_MUTATION: &str = r#"
mutation CreateUser($data: UserCreateInput!) {
  createUser(data: $data) { id name email }
}"#;

/// User record as the data service returns it. `password` carries the
/// stored hash and is only populated by the login lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Post record as the data service returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(default)]
    pub author: Option<UserRecord>,
}

/// GraphQL-over-HTTP response envelope.
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<RemoteError>>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    message: String,
}

/// Errors from the data service binding
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("Data service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Data service error: {0}")]
    Remote(String),

    #[error("Malformed data service response: {0}")]
    Decode(String),

    #[error("Service token signing failed: {0}")]
    ServiceToken(String),
}

/// Binding to the remote data service
///
/// Holds one pooled `reqwest::Client`; connections are reused across all
/// requests, so cloning the binding is cheap and constructing it once at
/// startup is enough.
///
/// # Configuration:
/// - **Connect timeout**: 5 seconds
/// - **Request timeout**: 10 seconds
///
/// Each incoming request performs at most one upstream call chain, so a
/// short request timeout is enough to keep the gateway from hanging on an
/// unreachable data service.
#[derive(Clone)]
pub struct DataBinding {
    http: reqwest::Client,
    endpoint: String,
    service_token: String,
}

impl DataBinding {
    /// Create a binding against `endpoint`, authenticating with a bearer
    /// token signed from `secret`.
    pub fn new(endpoint: &str, secret: &str) -> Result<Self, BindingError> {
        let service_token = auth_core::token::issue_token(
            SERVICE_TOKEN_SUBJECT,
            secret,
            ChronoDuration::days(SERVICE_TOKEN_EXPIRY_DAYS),
        )
        .map_err(|e| BindingError::ServiceToken(e.to_string()))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            service_token,
        })
    }

    /// Published (`true`) or draft (`false`) posts.
    pub async fn posts(&self, published: bool) -> Result<Vec<PostRecord>, BindingError> {
        self.request(POSTS_QUERY, json!({ "published": published }), "posts")
            .await
    }

    /// A single post by id, `None` when the data service has no such post.
    pub async fn post(&self, id: &str) -> Result<Option<PostRecord>, BindingError> {
        self.request(POST_QUERY, json!({ "id": id }), "post").await
    }

    /// All users.
    pub async fn users(&self) -> Result<Vec<UserRecord>, BindingError> {
        self.request(USERS_QUERY, Value::Null, "users").await
    }

    /// A single user by id.
    pub async fn user_by_id(&self, id: &str) -> Result<Option<UserRecord>, BindingError> {
        self.request(USER_BY_ID_QUERY, json!({ "id": id }), "user")
            .await
    }

    /// A single user by email, with the stored password hash populated.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, BindingError> {
        self.request(USER_BY_EMAIL_QUERY, json!({ "email": email }), "user")
            .await
    }

    /// Create an unpublished post, connected to `author_id` when present.
    pub async fn create_post(
        &self,
        title: &str,
        text: &str,
        author_id: Option<&str>,
    ) -> Result<PostRecord, BindingError> {
        self.request(
            CREATE_POST_MUTATION,
            create_post_variables(title, text, author_id),
            "createPost",
        )
        .await
    }

    /// Flip a post to published. `None` when the post does not exist.
    pub async fn publish_post(&self, id: &str) -> Result<Option<PostRecord>, BindingError> {
        self.request(PUBLISH_POST_MUTATION, json!({ "id": id }), "updatePost")
            .await
    }

    /// Delete a post, returning the deleted record as the data service
    /// reports it. `None` when the post does not exist.
    pub async fn delete_post(&self, id: &str) -> Result<Option<PostRecord>, BindingError> {
        self.request(DELETE_POST_MUTATION, json!({ "id": id }), "deletePost")
            .await
    }

    /// Create a user. `password_hash` must already be hashed; the binding
    /// never sees a plaintext password.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, BindingError> {
        self.request(
            CREATE_USER_MUTATION,
            json!({ "data": { "name": name, "email": email, "password": password_hash } }),
            "createUser",
        )
        .await
    }

    /// POST a GraphQL document and decode the named field of the response.
    async fn request<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: Value,
        field_name: &str,
    ) -> Result<T, BindingError> {
        debug!(field = field_name, "Forwarding operation to data service");

        let envelope: ResponseEnvelope = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.service_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        field(envelope_data(envelope)?, field_name)
    }
}

/// Shape the `createPost` payload. The author is connected only when the
/// caller carried a verified identity; anonymous drafts stay authorless.
pub fn create_post_variables(title: &str, text: &str, author_id: Option<&str>) -> Value {
    let mut data = json!({
        "title": title,
        "text": text,
        "isPublished": false,
    });

    if let Some(id) = author_id {
        data["author"] = json!({ "connect": { "id": id } });
    }

    json!({ "data": data })
}

/// Unwrap the response envelope, surfacing upstream errors.
fn envelope_data(envelope: ResponseEnvelope) -> Result<Value, BindingError> {
    if let Some(errors) = envelope.errors {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(BindingError::Remote(message));
    }

    envelope
        .data
        .ok_or_else(|| BindingError::Decode("response carried neither data nor errors".to_string()))
}

/// Pull a named field out of the `data` object and deserialize it.
fn field<T: DeserializeOwned>(mut data: Value, name: &str) -> Result<T, BindingError> {
    let value = data
        .get_mut(name)
        .map(Value::take)
        .ok_or_else(|| BindingError::Decode(format!("missing field `{}` in response", name)))?;

    serde_json::from_value(value).map_err(|e| BindingError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_creation() {
        let binding = DataBinding::new("http://localhost:4466/scribe/test", "service-secret")
            .expect("binding should construct");

        // The service token must verify against the binding secret and
        // identify this gateway
        let claims = auth_core::token::verify_token(&binding.service_token, "service-secret")
            .expect("service token should verify");
        assert_eq!(claims.sub, SERVICE_TOKEN_SUBJECT);
    }

    #[test]
    fn test_create_post_variables_with_author() {
        let variables = create_post_variables("Title", "Text", Some("user-1"));

        assert_eq!(variables["data"]["title"], "Title");
        assert_eq!(variables["data"]["isPublished"], false);
        assert_eq!(variables["data"]["author"]["connect"]["id"], "user-1");
    }

    #[test]
    fn test_create_post_variables_without_author() {
        let variables = create_post_variables("Title", "Text", None);

        assert_eq!(variables["data"]["isPublished"], false);
        assert!(variables["data"].get("author").is_none());
    }

    #[test]
    fn test_envelope_with_errors_surfaces_remote_error() {
        let envelope: ResponseEnvelope = serde_json::from_str(
            r#"{ "data": null, "errors": [{ "message": "No such post" }] }"#,
        )
        .unwrap();

        let result = envelope_data(envelope);
        assert!(matches!(result, Err(BindingError::Remote(ref m)) if m == "No such post"));
    }

    #[test]
    fn test_envelope_without_data_is_decode_error() {
        let envelope: ResponseEnvelope = serde_json::from_str("{}").unwrap();
        assert!(matches!(envelope_data(envelope), Err(BindingError::Decode(_))));
    }

    #[test]
    fn test_field_extracts_typed_records() {
        let data: Value = serde_json::from_str(
            r#"{ "posts": [
                { "id": "p1", "title": "t", "text": "x", "isPublished": true,
                  "author": { "id": "u1", "name": "n", "email": "e@example.com" } },
                { "id": "p2", "title": "t2", "text": "x2", "isPublished": false, "author": null }
            ] }"#,
        )
        .unwrap();

        let posts: Vec<PostRecord> = field(data, "posts").unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts[0].is_published);
        assert_eq!(posts[0].author.as_ref().unwrap().id, "u1");
        assert!(posts[1].author.is_none());
    }

    #[test]
    fn test_field_null_maps_to_none() {
        let data: Value = serde_json::from_str(r#"{ "post": null }"#).unwrap();
        let post: Option<PostRecord> = field(data, "post").unwrap();
        assert!(post.is_none());
    }

    #[test]
    fn test_field_missing_is_decode_error() {
        let data: Value = serde_json::from_str("{}").unwrap();
        let result: Result<Option<PostRecord>, _> = field(data, "post");
        assert!(matches!(result, Err(BindingError::Decode(_))));
    }
}
