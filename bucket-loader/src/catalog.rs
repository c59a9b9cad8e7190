#![doc = "Catalog integration for the CLI: implements the core `CatalogClient` trait against the catalog's REST API."]
//
//! # Catalog client (CLI <-> Core)
//!
//! This module wires the [`CatalogClient`] trait from `bucket-loader-core` to a real
//! catalog over HTTP, using `reqwest`.
//!
//! ## Client Usage
//!
//! - Construct [`RestCatalogClient`] with [`RestCatalogClient::from_config`] or
//!   [`RestCatalogClient::new_from_env`] (`CATALOG_BASE_URL`, `CATALOG_API_TOKEN`).
//! - All transport, serialization, and error handling are encapsulated in the client.
//!
//! ## Endpoints
//!
//! | operation | request |
//! |---|---|
//! | save assets | `POST /api/meta/entity/bulk` |
//! | read classifications | `GET /api/meta/entity/uniqueAttribute/type/{type}` |
//! | append classifications | `POST /api/meta/entity/uniqueAttribute/type/{type}/classifications` |

use async_trait::async_trait;
use bucket_loader_core::asset::AssetPayload;
use bucket_loader_core::contract::{CatalogClient, SaveResponse};
use bucket_loader_core::error::CatalogError;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::load_config::CatalogSection;

const QUALIFIED_NAME_PARAM: &str = "attr:qualifiedName";

pub struct RestCatalogClient {
    http: Client,
    base_url: String,
    api_token: String,
}

impl RestCatalogClient {
    pub fn new(
        base_url: &str,
        api_token: &str,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        tracing::info!(
            base_url,
            api_token_set = !api_token.is_empty(),
            "Initialized RestCatalogClient"
        );
        Ok(RestCatalogClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// Base URL from config (or `CATALOG_BASE_URL`), token from `CATALOG_API_TOKEN`.
    pub fn from_config(section: &CatalogSection) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let base_url = match &section.base_url {
            Some(url) => url.clone(),
            None => env::var("CATALOG_BASE_URL").map_err(|e| {
                tracing::error!(error = ?e, "No catalog.base_url in config and CATALOG_BASE_URL missing in environment");
                e
            })?,
        };
        let api_token = env::var("CATALOG_API_TOKEN").map_err(|e| {
            tracing::error!(error = ?e, "CATALOG_API_TOKEN missing in environment");
            e
        })?;
        Ok(Self::new(
            &base_url,
            &api_token,
            Duration::from_secs(section.timeout_secs),
        )?)
    }

    pub fn new_from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present
        Self::from_config(&CatalogSection::default())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classifications_path(type_name: &str) -> String {
        format!("/api/meta/entity/uniqueAttribute/type/{type_name}/classifications")
    }
}

#[derive(Serialize)]
struct BulkRequest<'a> {
    entities: &'a [AssetPayload],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkResponse {
    #[serde(default)]
    mutated_entities: MutatedEntities,
}

#[derive(Debug, Default, Deserialize)]
struct MutatedEntities {
    #[serde(default, rename = "CREATE")]
    create: Vec<EntityHeader>,
    #[serde(default, rename = "UPDATE")]
    update: Vec<EntityHeader>,
}

#[derive(Debug, Deserialize)]
struct EntityHeader {
    #[serde(default)]
    attributes: HeaderAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderAttributes {
    #[serde(default)]
    qualified_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EntityResponse {
    entity: EntityClassifications,
}

#[derive(Debug, Deserialize)]
struct EntityClassifications {
    #[serde(default)]
    classifications: Vec<ClassificationRef>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassificationRef {
    type_name: String,
    #[serde(default)]
    propagate: bool,
}

fn parse_save_response(body: &str) -> Result<SaveResponse, CatalogError> {
    let parsed: BulkResponse = serde_json::from_str(body)?;
    let names = |headers: Vec<EntityHeader>| -> Vec<String> {
        headers
            .into_iter()
            .filter_map(|h| h.attributes.qualified_name)
            .collect()
    };
    Ok(SaveResponse {
        created: names(parsed.mutated_entities.create),
        updated: names(parsed.mutated_entities.update),
    })
}

fn parse_classifications(body: &str) -> Result<Vec<String>, CatalogError> {
    let parsed: EntityResponse = serde_json::from_str(body)?;
    Ok(parsed
        .entity
        .classifications
        .into_iter()
        .map(|c| c.type_name)
        .collect())
}

/// Body of a successful response, or `Rejected` carrying the catalog's message.
async fn success_body(response: Response) -> Result<String, CatalogError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CatalogError::Transport(e.to_string()))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(CatalogError::Rejected {
            status: status.as_u16(),
            message: body,
        })
    }
}

#[async_trait]
impl CatalogClient for RestCatalogClient {
    async fn save_assets(&self, assets: Vec<AssetPayload>) -> Result<SaveResponse, CatalogError> {
        tracing::info!(count = assets.len(), "Saving assets to catalog");
        let response = self
            .http
            .post(self.url("/api/meta/entity/bulk"))
            .bearer_auth(&self.api_token)
            .json(&BulkRequest { entities: &assets })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Transport error saving assets");
                CatalogError::Transport(e.to_string())
            })?;

        match success_body(response).await {
            Ok(body) => {
                let saved = parse_save_response(&body)?;
                tracing::info!(
                    created = saved.created.len(),
                    updated = saved.updated.len(),
                    "Successfully saved assets"
                );
                Ok(saved)
            }
            Err(e) => {
                tracing::error!(error = %e, "API error saving assets");
                Err(e)
            }
        }
    }

    async fn get_classifications(
        &self,
        type_name: &str,
        qualified_name: &str,
    ) -> Result<Vec<String>, CatalogError> {
        tracing::debug!(type_name, qualified_name, "Fetching classifications");
        let response = self
            .http
            .get(self.url(&format!("/api/meta/entity/uniqueAttribute/type/{type_name}")))
            .bearer_auth(&self.api_token)
            .query(&[
                (QUALIFIED_NAME_PARAM, qualified_name),
                ("minExtInfo", "true"),
                ("ignoreRelationships", "true"),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(type_name, qualified_name, "Asset not found; no classifications");
            return Ok(Vec::new());
        }
        let body = success_body(response).await.map_err(|e| {
            tracing::error!(error = %e, type_name, qualified_name, "Failed to fetch classifications");
            e
        })?;
        parse_classifications(&body)
    }

    async fn append_classifications(
        &self,
        type_name: &str,
        qualified_name: &str,
        classifications: Vec<String>,
    ) -> Result<(), CatalogError> {
        tracing::info!(
            type_name,
            qualified_name,
            count = classifications.len(),
            "Appending classifications"
        );
        let body: Vec<ClassificationRef> = classifications
            .into_iter()
            .map(|name| ClassificationRef {
                type_name: name,
                propagate: false,
            })
            .collect();
        let response = self
            .http
            .post(self.url(&Self::classifications_path(type_name)))
            .bearer_auth(&self.api_token)
            .query(&[(QUALIFIED_NAME_PARAM, qualified_name)])
            .json(&body)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        match success_body(response).await {
            Ok(_) => {
                tracing::info!(type_name, qualified_name, "Successfully appended classifications");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, type_name, qualified_name, "Failed to append classifications");
                Err(e)
            }
        }
    }
}
