//! Buckets: from spreadsheet rows to catalog assets.
//!
//! This module holds the three steps that turn rows describing object-store
//! containers into catalog entities:
//!   - [`BucketDetails::qualified_name`] computes the provider-specific qualified
//!     name a row's bucket will have in the catalog
//!   - [`BucketDetails::from_row`] validates a row and captures it as a [`BucketDetails`]
//!   - [`upsert`] creates or updates all captured buckets, then classifies them
//!
//! # Providers
//! The provider is read from the connection qualified name (see [`ConnectorType`]):
//! - S3 buckets need an ARN, which is also what identifies them
//! - GCS buckets are identified by connection and bucket name
//! - ADLS containers need a storage account, which anchors them
//!
//! # Error Handling
//! Rows or buckets lacking what their provider needs are skipped with an `error!`
//! event; they never fail a load. Failures from the catalog are returned as-is.
//!
//! # Ordering
//! Classifications can only be attached to assets the catalog already knows about,
//! so [`upsert`] flushes every asset before issuing any classification call.

use indexmap::IndexMap;
use tracing::{error, info, warn};

use crate::asset::{AdlsContainer, AssetAttributes, AssetPayload, GcsBucket, S3Bucket};
use crate::batch::AssetBatch;
use crate::classify::{append_classifications, PendingClassifications};
use crate::connection::{
    account_qualified_name, connection_qualified_name, ConnectionCache, COL_ACCOUNT,
    COL_CONNECTION, COL_CONNECTOR,
};
use crate::connector::ConnectorType;
use crate::contract::CatalogClient;
use crate::error::CatalogError;
use crate::row::{cell, missing_fields, required_empty_fields, AssetDetails, Row};

pub const COL_BUCKET_NAME: &str = "BUCKET NAME";
pub const COL_BUCKET_ARN: &str = "BUCKET ARN";
/// Filled only on rows describing an object inside a bucket.
pub const COL_OBJECT_NAME: &str = "OBJECT NAME";

pub const REQUIRED: &[&str] = &[COL_CONNECTOR, COL_CONNECTION, COL_BUCKET_NAME];
pub const REQUIRED_EMPTY: &[&str] = &[COL_OBJECT_NAME];

/// Everything the sheet says about one bucket or container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDetails {
    pub connection_qualified_name: String,
    /// Storage account; only meaningful for ADLS.
    pub account_name: Option<String>,
    pub name: String,
    /// Only meaningful for S3.
    pub arn: Option<String>,
    pub asset: AssetDetails,
}

impl BucketDetails {
    /// Key used to deduplicate buckets across rows.
    pub fn identity(&self) -> String {
        format!(
            "{}/{}/{}",
            self.connection_qualified_name,
            self.account_name.as_deref().unwrap_or(""),
            self.name
        )
    }

    /// Qualified name the bucket on this row has in the catalog.
    ///
    /// `None` when the connection cannot be resolved or the row lacks what its
    /// provider needs to identify a bucket.
    pub fn qualified_name(cache: &ConnectionCache, row: &Row) -> Option<String> {
        let connection_qualified_name = connection_qualified_name(cache, row)?;
        let bucket_name = cell(row, COL_BUCKET_NAME);
        match ConnectorType::from_qualified_name(&connection_qualified_name) {
            ConnectorType::S3 => match (cell(row, COL_BUCKET_ARN), bucket_name) {
                (Some(arn), Some(_)) => Some(S3Bucket::generate_qualified_name(
                    &connection_qualified_name,
                    arn,
                )),
                _ => None,
            },
            ConnectorType::Gcs => {
                let bucket_name = bucket_name?;
                Some(format!("{connection_qualified_name}/{bucket_name}"))
            }
            ConnectorType::Adls => {
                let account_qualified_name = account_qualified_name(cache, row)?;
                let bucket_name = bucket_name?;
                Some(format!("{account_qualified_name}/{bucket_name}"))
            }
            ConnectorType::Other(connector) => {
                error!(connector = %connector, "Unknown connector type for object stores");
                None
            }
        }
    }

    /// Capture the bucket described on a row.
    ///
    /// Rows that also name an object only reference their bucket: for those the
    /// result carries the identifying fields alone, without description, owners,
    /// certificate, announcement or classifications.
    pub fn from_row(cache: &ConnectionCache, row: &Row, delimiter: &str) -> Option<Self> {
        if !missing_fields(row, REQUIRED).is_empty() {
            return None;
        }
        let Some(connection_qualified_name) = connection_qualified_name(cache, row) else {
            warn!(
                connector = cell(row, COL_CONNECTOR),
                connection = cell(row, COL_CONNECTION),
                "Skipping bucket row: connection could not be resolved"
            );
            return None;
        };
        let asset = if required_empty_fields(row, REQUIRED_EMPTY).is_empty() {
            AssetDetails::from_row(row, delimiter)
        } else {
            AssetDetails::default()
        };
        Some(BucketDetails {
            connection_qualified_name,
            account_name: cell(row, COL_ACCOUNT).map(str::to_string),
            name: cell(row, COL_BUCKET_NAME)?.to_string(),
            arn: cell(row, COL_BUCKET_ARN).map(str::to_string),
            asset,
        })
    }

    fn attributes(&self) -> AssetAttributes {
        AssetAttributes::from(&self.asset)
    }
}

/// Outcome of an [`upsert`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// Assets handed to the catalog.
    pub submitted: usize,
    /// Buckets skipped for missing provider-specific fields or an unknown provider.
    pub skipped: usize,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    /// Assets that received new classifications in the second pass.
    pub classified: usize,
}

/// Create buckets in bulk if they do not exist, or update them if they do.
///
/// `buckets` is keyed by [`BucketDetails::identity`]. At most `batch_size` assets
/// are sent per request. Classifications are attached only after every asset has
/// been flushed to the catalog.
pub async fn upsert<C>(
    client: &C,
    buckets: &IndexMap<String, BucketDetails>,
    batch_size: usize,
) -> Result<UpsertReport, CatalogError>
where
    C: CatalogClient + ?Sized,
{
    info!(count = buckets.len(), batch_size, "Upserting buckets");

    let mut batch = AssetBatch::new(client, "bucket", batch_size);
    let mut to_classify_s3 = PendingClassifications::new();
    let mut to_classify_gcs = PendingClassifications::new();
    let mut to_classify_adls = PendingClassifications::new();
    let mut skipped = 0;

    for details in buckets.values() {
        let connection_qualified_name = &details.connection_qualified_name;
        let (payload, to_classify): (AssetPayload, &mut PendingClassifications) =
            match ConnectorType::from_qualified_name(connection_qualified_name) {
                ConnectorType::S3 => match non_empty(&details.arn) {
                    Some(arn) => {
                        let bucket = S3Bucket {
                            attributes: details.attributes(),
                            ..S3Bucket::creator(&details.name, connection_qualified_name, arn)
                        };
                        (bucket.into(), &mut to_classify_s3)
                    }
                    None => {
                        error!(
                            connector = %ConnectorType::S3,
                            identity = %details.identity(),
                            "Unable to create an S3 bucket without an ARN"
                        );
                        skipped += 1;
                        continue;
                    }
                },
                ConnectorType::Gcs => {
                    let bucket = GcsBucket {
                        attributes: details.attributes(),
                        ..GcsBucket::creator(&details.name, connection_qualified_name)
                    };
                    (bucket.into(), &mut to_classify_gcs)
                }
                ConnectorType::Adls => match non_empty(&details.account_name) {
                    Some(account_name) => {
                        let account_qualified_name =
                            format!("{connection_qualified_name}/{account_name}");
                        let container = AdlsContainer {
                            attributes: details.attributes(),
                            ..AdlsContainer::creator(&details.name, &account_qualified_name)
                        };
                        (container.into(), &mut to_classify_adls)
                    }
                    None => {
                        error!(
                            connector = %ConnectorType::Adls,
                            identity = %details.identity(),
                            "Unable to create an ADLS container without an account"
                        );
                        skipped += 1;
                        continue;
                    }
                },
                ConnectorType::Other(connector) => {
                    error!(
                        connector = %connector,
                        identity = %details.identity(),
                        "Invalid bucket type, skipping"
                    );
                    skipped += 1;
                    continue;
                }
            };

        if !details.asset.classifications.is_empty() {
            to_classify.insert(
                payload.qualified_name().to_string(),
                details.asset.classifications.clone(),
            );
        }
        batch.add(payload).await?;
    }

    // Every asset must exist before it can be classified.
    batch.flush().await?;

    let mut classified = 0;
    classified += append_classifications(client, &to_classify_s3, S3Bucket::TYPE_NAME).await?;
    classified += append_classifications(client, &to_classify_gcs, GcsBucket::TYPE_NAME).await?;
    classified +=
        append_classifications(client, &to_classify_adls, AdlsContainer::TYPE_NAME).await?;

    let report = UpsertReport {
        submitted: batch.submitted(),
        skipped,
        created: batch.created().to_vec(),
        updated: batch.updated().to_vec(),
        classified,
    };
    info!(
        submitted = report.submitted,
        skipped = report.skipped,
        created = report.created.len(),
        updated = report.updated.len(),
        classified = report.classified,
        "Bucket upsert complete"
    );
    Ok(report)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
