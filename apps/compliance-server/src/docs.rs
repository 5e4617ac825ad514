//! Interactive API documentation
//!
//! Serves a Swagger UI page and the OpenAPI document it renders. The document
//! is built into the binary unless a file is given, which is read once at
//! startup.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use axum::{response::Html, routing::get, Json, Router};
use serde_json::Value;

const BUNDLED_OPENAPI: &str = include_str!("../docs/openapi.json");

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Compliance Checker API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

#[derive(Debug, Clone)]
pub struct ApiDocs {
    pub(crate) document: Arc<Value>,
}

impl ApiDocs {
    /// The OpenAPI document shipped with the server.
    pub fn bundled() -> anyhow::Result<Self> {
        let document: Value = serde_json::from_str(BUNDLED_OPENAPI)
            .context("Bundled OpenAPI document is not valid JSON")?;
        Self::from_document(document).context("Invalid bundled OpenAPI document")
    }

    /// Read and check the OpenAPI document at `path`.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read OpenAPI document {}", path.display()))?;
        let document: Value = serde_json::from_str(&raw)
            .with_context(|| format!("OpenAPI document {} is not valid JSON", path.display()))?;
        Self::from_document(document)
            .with_context(|| format!("Invalid OpenAPI document {}", path.display()))
    }

    pub fn from_document(document: Value) -> anyhow::Result<Self> {
        if document.get("openapi").and_then(Value::as_str).is_none() {
            bail!("missing `openapi` version field");
        }
        if !document.get("paths").is_some_and(Value::is_object) {
            bail!("missing `paths` object");
        }
        Ok(Self {
            document: Arc::new(document),
        })
    }

    /// `/`, `/docs` and `/openapi.json`.
    pub fn router<S>(self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let document = self.document;
        Router::new()
            .route("/", get(swagger_ui))
            .route("/docs", get(swagger_ui))
            .route(
                "/openapi.json",
                get(move || {
                    let body = Json(document.as_ref().clone());
                    async move { body }
                }),
            )
    }
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}
