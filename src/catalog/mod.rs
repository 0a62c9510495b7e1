//! Category-tree product aggregation.
//!
//! Walks a category subtree depth-first, collecting every product under the
//! root: one products-fetch and one subcategories-fetch per node. A failed
//! fetch empties that part of the branch but never aborts the walk; the
//! per-node outcome is reported beside the flattened list so callers can tell
//! an empty category from a failed one.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::types::{Category, Product};

/// Catalog fetch operations the aggregator needs.
///
/// `ApiClient` implements this against the backend. Tests substitute mock
/// sources that script per-node successes and failures.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    /// Products directly assigned to a category, in server order.
    async fn products_in(&self, category_id: i64) -> Result<Vec<Product>, ApiError>;

    /// Direct subcategories of a category, in server order.
    async fn subcategories_of(&self, category_id: i64) -> Result<Vec<Category>, ApiError>;
}

impl CatalogSource for ApiClient {
    async fn products_in(&self, category_id: i64) -> Result<Vec<Product>, ApiError> {
        self.get(&format!("/products/by-category/{}", category_id))
            .await
    }

    async fn subcategories_of(&self, category_id: i64) -> Result<Vec<Category>, ApiError> {
        self.get(&format!("/categories/{}/subcategories", category_id))
            .await
    }
}

/// Outcome of the two fetches for one visited category.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeStatus {
    /// Both fetches succeeded.
    Complete,
    /// One fetch failed; the other still contributed.
    Partial { error: String },
    /// Both fetches failed; the node contributed nothing.
    Failed { error: String },
}

/// Per-category record of how the walk went.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeReport {
    pub category_id: i64,
    pub status: NodeStatus,
}

/// Result of one aggregation call: the flattened product list plus the
/// per-node outcomes, both in visit order. Transient -- built per call,
/// never persisted.
#[derive(Debug, Default)]
pub struct ProductAggregate {
    pub products: Vec<Product>,
    pub nodes: Vec<NodeReport>,
}

impl ProductAggregate {
    /// Whether every visited category completed both fetches.
    pub fn is_complete(&self) -> bool {
        self.nodes.iter().all(|n| n.status == NodeStatus::Complete)
    }
}

/// Collect every product under `root` and its descendants.
///
/// Depth-first, pre-order: a category's own products come before its
/// subcategories' products, and subcategories are visited in server order.
/// Products are appended exactly as returned -- a product the backend lists
/// under two categories of the subtree appears twice.
///
/// Never fails as a whole: per-node fetch failures are logged, recorded in
/// the report, and the walk continues with the remaining categories. The
/// visited-set guards against a cyclic parent/child relationship in the data;
/// a revisited category is skipped with a warning instead of looping forever.
pub async fn collect_products<S: CatalogSource>(source: &S, root: i64) -> ProductAggregate {
    let mut aggregate = ProductAggregate::default();
    let mut visited: HashSet<i64> = HashSet::new();
    // LIFO worklist; children are pushed reversed so server order pops first.
    let mut worklist: Vec<i64> = vec![root];

    while let Some(category_id) = worklist.pop() {
        if !visited.insert(category_id) {
            log::warn!(
                "Category {} already visited, skipping (cycle in category tree?)",
                category_id
            );
            continue;
        }

        let mut errors: Vec<String> = Vec::new();

        match source.products_in(category_id).await {
            Ok(products) => aggregate.products.extend(products),
            Err(e) => {
                log::warn!("Products fetch failed for category {}: {}", category_id, e);
                errors.push(format!("products: {}", e));
            }
        }

        match source.subcategories_of(category_id).await {
            Ok(subcategories) => {
                for subcategory in subcategories.iter().rev() {
                    worklist.push(subcategory.id);
                }
            }
            Err(e) => {
                log::warn!(
                    "Subcategories fetch failed for category {}: {}",
                    category_id,
                    e
                );
                errors.push(format!("subcategories: {}", e));
            }
        }

        let status = match errors.len() {
            0 => NodeStatus::Complete,
            1 => NodeStatus::Partial {
                error: errors.remove(0),
            },
            _ => NodeStatus::Failed {
                error: errors.join("; "),
            },
        };
        aggregate.nodes.push(NodeReport {
            category_id,
            status,
        });
    }

    aggregate
}
