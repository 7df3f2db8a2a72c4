use actix_web::{middleware::Logger, web, App, HttpServer};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use tracing::info;
use tracing_subscriber::prelude::*;

use scribe_gateway::binding::DataBinding;
use scribe_gateway::config::Config;
use scribe_gateway::middleware::auth::bearer_token;
use scribe_gateway::schema::{build_schema, AppSchema};

async fn graphql_handler(
    schema: web::Data<AppSchema>,
    http_req: actix_web::HttpRequest,
    req: GraphQLRequest,
) -> GraphQLResponse {
    // Identity is carried as the raw bearer token; resolvers verify it
    // lazily so anonymous requests still reach public fields.
    let token = bearer_token(&http_req);
    schema.execute(req.into_inner().data(token)).await.into()
}

async fn health_handler() -> &'static str {
    "ok"
}

/// SDL (Schema Definition Language) endpoint for schema introspection
/// Enables automatic client code generation and documentation
async fn schema_handler(schema: web::Data<AppSchema>) -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(schema.sdl())
}

async fn playground_handler() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().content_type("text/html").body(
        r#"
<!DOCTYPE html>
<html>
<head>
    <title>Scribe Sandbox</title>
    <style>
        body {
            margin: 0;
            overflow: hidden;
            font-family: ui-monospace, Menlo, Consolas, "Roboto Mono", "Ubuntu Monospace", monospace;
        }
        sandbox-ui {
            height: 100vh;
            width: 100vw;
            display: block;
        }
    </style>
</head>
<body>
    <script src="https://embeddable-sandbox.cdn.apollographql.com/_latest/embeddable-sandbox.umd.production.min.js"></script>
    <sandbox-ui initial-state='{"document":"{ feed { id title } }","variables":{},"headers":{},"url":"http://localhost:4000/graphql"}'></sandbox-ui>
</body>
</html>
        "#,
    )
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Structured JSON logging for log aggregation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scribe_gateway=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    info!("Starting Scribe gateway...");

    let config = Config::from_env()?;

    let binding = DataBinding::new(&config.binding.endpoint, &config.binding.secret)?;
    info!(endpoint = %config.binding.endpoint, "Data service binding initialized");

    let playground = config.graphql.playground;
    let workers = config.server.workers;
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let schema = build_schema(binding, config);

    info!("Gateway listening on http://{}", bind_addr);

    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(schema.clone()))
            .route("/graphql", web::post().to(graphql_handler))
            // Schema SDL endpoint for autodoc and code generation
            .route("/graphql/schema", web::get().to(schema_handler))
            .route("/schema", web::get().to(schema_handler))
            .route("/health", web::get().to(health_handler));

        if playground {
            app = app.route("/playground", web::get().to(playground_handler));
        }

        app
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
