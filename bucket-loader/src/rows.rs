//! Reading spreadsheet rows (CSV export) and collecting the buckets they describe.

use anyhow::{Context, Result};
use bucket_loader_core::bucket::BucketDetails;
use bucket_loader_core::connection::ConnectionCache;
use bucket_loader_core::row::{AssetDetails, Row};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};

/// Read every record of a CSV file into a [`Row`], keyed by the header row.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open rows file {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Failed to read record {} of {}", index + 1, path.display()))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    info!(rows = rows.len(), path = %path.display(), "Loaded rows");
    Ok(rows)
}

/// Buckets described by `rows`, keyed by identity, in first-seen order.
///
/// Several rows may describe the same bucket (the bucket row itself plus rows for
/// objects inside it). The first occurrence is kept, except that a descriptor
/// carrying asset details replaces one that carries none.
///
/// A bucket row whose asset cells are all empty cannot be told apart from an
/// object row's reference to the bucket; either may end up being kept.
pub fn collect_buckets(
    cache: &ConnectionCache,
    rows: &[Row],
    delimiter: &str,
) -> IndexMap<String, BucketDetails> {
    let mut buckets: IndexMap<String, BucketDetails> = IndexMap::new();
    for row in rows {
        let Some(details) = BucketDetails::from_row(cache, row, delimiter) else {
            continue;
        };
        let identity = details.identity();
        match buckets.get_mut(&identity) {
            Some(existing) => {
                if existing.asset == AssetDetails::default() && details.asset != AssetDetails::default() {
                    debug!(identity = %identity, "Replacing bucket reference with full bucket details");
                    *existing = details;
                }
            }
            None => {
                buckets.insert(identity, details);
            }
        }
    }
    info!(buckets = buckets.len(), rows = rows.len(), "Collected buckets from rows");
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucket_loader_core::bucket::{COL_BUCKET_NAME, COL_OBJECT_NAME};
    use bucket_loader_core::connection::{ConnectionKey, COL_CONNECTION, COL_CONNECTOR};
    use bucket_loader_core::row::COL_DESCRIPTION;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn full_details_win_over_object_row_reference() {
        let mut cache = ConnectionCache::new();
        cache.insert(ConnectionKey::new("gcs", "gcp"), "default/gcs/123".into());
        let object_row = row(&[
            (COL_CONNECTOR, "gcs"),
            (COL_CONNECTION, "gcp"),
            (COL_BUCKET_NAME, "b"),
            (COL_OBJECT_NAME, "file.csv"),
        ]);
        let bucket_row = row(&[
            (COL_CONNECTOR, "gcs"),
            (COL_CONNECTION, "gcp"),
            (COL_BUCKET_NAME, "b"),
            (COL_DESCRIPTION, "the bucket"),
        ]);

        let buckets = collect_buckets(&cache, &[object_row.clone(), bucket_row, object_row], "\n");
        assert_eq!(buckets.len(), 1);
        let details = &buckets["default/gcs/123//b"];
        assert_eq!(details.asset.description.as_deref(), Some("the bucket"));
    }

    #[test]
    fn bare_bucket_row_is_indistinguishable_from_a_reference() {
        let mut cache = ConnectionCache::new();
        cache.insert(ConnectionKey::new("gcs", "gcp"), "default/gcs/123".into());
        let bare_bucket_row = row(&[
            (COL_CONNECTOR, "gcs"),
            (COL_CONNECTION, "gcp"),
            (COL_BUCKET_NAME, "b"),
        ]);
        let object_row = row(&[
            (COL_CONNECTOR, "gcs"),
            (COL_CONNECTION, "gcp"),
            (COL_BUCKET_NAME, "b"),
            (COL_OBJECT_NAME, "file.csv"),
        ]);

        let bare_first = collect_buckets(&cache, &[bare_bucket_row.clone(), object_row.clone()], "\n");
        let object_first = collect_buckets(&cache, &[object_row, bare_bucket_row], "\n");
        assert_eq!(bare_first, object_first);
        assert_eq!(bare_first["default/gcs/123//b"].asset, AssetDetails::default());
    }
}
