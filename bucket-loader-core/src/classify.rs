//! Second-pass classification of assets that already exist in the catalog.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::contract::CatalogClient;
use crate::error::CatalogError;

/// Qualified name to the classifications it should carry, in sheet order.
pub type PendingClassifications = IndexMap<String, Vec<String>>;

/// Attach classifications to already-existing assets of one type.
///
/// Only classifications the asset does not carry yet are appended, so running
/// this repeatedly with the same input leaves the catalog unchanged after the
/// first run. Returns the number of assets that received new classifications.
pub async fn append_classifications<C>(
    client: &C,
    to_classify: &PendingClassifications,
    type_name: &str,
) -> Result<usize, CatalogError>
where
    C: CatalogClient + ?Sized,
{
    if to_classify.is_empty() {
        return Ok(0);
    }
    info!(type_name, count = to_classify.len(), "Appending classifications");

    let mut classified = 0;
    for (qualified_name, wanted) in to_classify {
        let existing = client.get_classifications(type_name, qualified_name).await?;
        let missing: Vec<String> = wanted
            .iter()
            .filter(|name| !existing.contains(*name))
            .cloned()
            .collect();
        if missing.is_empty() {
            debug!(type_name, qualified_name = %qualified_name, "Classifications already present");
            continue;
        }
        debug!(type_name, qualified_name = %qualified_name, ?missing, "Appending missing classifications");
        client
            .append_classifications(type_name, qualified_name, missing)
            .await?;
        classified += 1;
    }
    info!(type_name, classified, "Classifications appended");
    Ok(classified)
}
