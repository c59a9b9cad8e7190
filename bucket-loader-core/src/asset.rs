//! Catalog entity payloads for object-store containers.
//!
//! Each provider has its own entity type with its own qualified-name scheme:
//!
//! | type | qualified name |
//! |---|---|
//! | `S3Bucket` | `<connection>/<bucket ARN>` |
//! | `GCSBucket` | `<connection>/<bucket name>` |
//! | `ADLSContainer` | `<connection>/<account>/<container name>` |
//!
//! Payloads serialize to the catalog's entity shape:
//! `{"typeName": "S3Bucket", "attributes": {"qualifiedName": ..., ...}}`.

use serde::Serialize;

use crate::row::{AnnouncementType, AssetDetails, CertificateStatus};

/// Attributes shared by every container payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_status: Option<CertificateStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement_type: Option<AnnouncementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement_message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_groups: Vec<String>,
}

impl From<&AssetDetails> for AssetAttributes {
    fn from(details: &AssetDetails) -> Self {
        AssetAttributes {
            description: details.description.clone(),
            certificate_status: details.certificate,
            certificate_status_message: details.certificate_status_message.clone(),
            announcement_type: details.announcement_type,
            announcement_title: details.announcement_title.clone(),
            announcement_message: details.announcement_message.clone(),
            owner_users: details.owner_users.clone(),
            owner_groups: details.owner_groups.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Bucket {
    pub name: String,
    pub qualified_name: String,
    pub connection_qualified_name: String,
    pub connector_name: String,
    pub aws_arn: String,
    #[serde(flatten)]
    pub attributes: AssetAttributes,
}

impl S3Bucket {
    pub const TYPE_NAME: &'static str = "S3Bucket";

    /// S3 buckets are identified by ARN, not by name.
    pub fn generate_qualified_name(connection_qualified_name: &str, aws_arn: &str) -> String {
        format!("{connection_qualified_name}/{aws_arn}")
    }

    /// Minimal payload needed to create or update an S3 bucket.
    pub fn creator(name: &str, connection_qualified_name: &str, aws_arn: &str) -> Self {
        S3Bucket {
            name: name.to_string(),
            qualified_name: Self::generate_qualified_name(connection_qualified_name, aws_arn),
            connection_qualified_name: connection_qualified_name.to_string(),
            connector_name: "s3".to_string(),
            aws_arn: aws_arn.to_string(),
            attributes: AssetAttributes::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsBucket {
    pub name: String,
    pub qualified_name: String,
    pub connection_qualified_name: String,
    pub connector_name: String,
    #[serde(flatten)]
    pub attributes: AssetAttributes,
}

impl GcsBucket {
    pub const TYPE_NAME: &'static str = "GCSBucket";

    pub fn creator(name: &str, connection_qualified_name: &str) -> Self {
        GcsBucket {
            name: name.to_string(),
            qualified_name: format!("{connection_qualified_name}/{name}"),
            connection_qualified_name: connection_qualified_name.to_string(),
            connector_name: "gcs".to_string(),
            attributes: AssetAttributes::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdlsContainer {
    pub name: String,
    pub qualified_name: String,
    pub connection_qualified_name: String,
    pub connector_name: String,
    pub adls_account_qualified_name: String,
    #[serde(flatten)]
    pub attributes: AssetAttributes,
}

impl AdlsContainer {
    pub const TYPE_NAME: &'static str = "ADLSContainer";

    /// Containers hang off a storage account, whose qualified name extends the connection's.
    pub fn creator(name: &str, account_qualified_name: &str) -> Self {
        let connection_qualified_name = account_qualified_name
            .rsplit_once('/')
            .map(|(connection, _)| connection)
            .unwrap_or(account_qualified_name);
        AdlsContainer {
            name: name.to_string(),
            qualified_name: format!("{account_qualified_name}/{name}"),
            connection_qualified_name: connection_qualified_name.to_string(),
            connector_name: "adls".to_string(),
            adls_account_qualified_name: account_qualified_name.to_string(),
            attributes: AssetAttributes::default(),
        }
    }
}

/// An entity to create or update in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "typeName", content = "attributes")]
pub enum AssetPayload {
    #[serde(rename = "S3Bucket")]
    S3Bucket(S3Bucket),
    #[serde(rename = "GCSBucket")]
    GcsBucket(GcsBucket),
    #[serde(rename = "ADLSContainer")]
    AdlsContainer(AdlsContainer),
}

impl AssetPayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            AssetPayload::S3Bucket(_) => S3Bucket::TYPE_NAME,
            AssetPayload::GcsBucket(_) => GcsBucket::TYPE_NAME,
            AssetPayload::AdlsContainer(_) => AdlsContainer::TYPE_NAME,
        }
    }

    pub fn qualified_name(&self) -> &str {
        match self {
            AssetPayload::S3Bucket(b) => &b.qualified_name,
            AssetPayload::GcsBucket(b) => &b.qualified_name,
            AssetPayload::AdlsContainer(c) => &c.qualified_name,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AssetPayload::S3Bucket(b) => &b.name,
            AssetPayload::GcsBucket(b) => &b.name,
            AssetPayload::AdlsContainer(c) => &c.name,
        }
    }
}

impl From<S3Bucket> for AssetPayload {
    fn from(bucket: S3Bucket) -> Self {
        AssetPayload::S3Bucket(bucket)
    }
}

impl From<GcsBucket> for AssetPayload {
    fn from(bucket: GcsBucket) -> Self {
        AssetPayload::GcsBucket(bucket)
    }
}

impl From<AdlsContainer> for AssetPayload {
    fn from(container: AdlsContainer) -> Self {
        AssetPayload::AdlsContainer(container)
    }
}
