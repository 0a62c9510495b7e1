//! Unit tests for the category-tree product aggregator.
//!
//! Uses a mock CatalogSource scripting per-node products, children, and
//! failures.

#[cfg(test)]
mod collect_products_tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use crate::api::error::ApiError;
    use crate::api::types::{Category, Product};
    use crate::catalog::{collect_products, CatalogSource, NodeStatus};

    // ── Mock catalog source ──────────────────────────────────────────────

    /// Scripted category tree: per-node product lists, child lists, and
    /// fetches forced to fail. Records every fetch for call-count assertions.
    struct TreeSource {
        products: HashMap<i64, Vec<Product>>,
        children: HashMap<i64, Vec<Category>>,
        fail_products: HashSet<i64>,
        fail_subcategories: HashSet<i64>,
        fetches: Mutex<Vec<String>>,
    }

    impl TreeSource {
        fn new() -> Self {
            Self {
                products: HashMap::new(),
                children: HashMap::new(),
                fail_products: HashSet::new(),
                fail_subcategories: HashSet::new(),
                fetches: Mutex::new(Vec::new()),
            }
        }

        fn with_products(mut self, category_id: i64, ids: &[i64]) -> Self {
            let products = ids.iter().map(|&id| make_product(id, category_id)).collect();
            self.products.insert(category_id, products);
            self
        }

        fn with_children(mut self, category_id: i64, child_ids: &[i64]) -> Self {
            let children = child_ids
                .iter()
                .map(|&id| make_category(id, Some(category_id)))
                .collect();
            self.children.insert(category_id, children);
            self
        }

        fn failing_products(mut self, category_id: i64) -> Self {
            self.fail_products.insert(category_id);
            self
        }

        fn failing_subcategories(mut self, category_id: i64) -> Self {
            self.fail_subcategories.insert(category_id);
            self
        }

        fn fetch_log(&self) -> Vec<String> {
            self.fetches.lock().unwrap().clone()
        }
    }

    impl CatalogSource for TreeSource {
        async fn products_in(&self, category_id: i64) -> Result<Vec<Product>, ApiError> {
            self.fetches
                .lock()
                .unwrap()
                .push(format!("products:{}", category_id));
            if self.fail_products.contains(&category_id) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "HTTP 500".to_string(),
                });
            }
            Ok(self.products.get(&category_id).cloned().unwrap_or_default())
        }

        async fn subcategories_of(&self, category_id: i64) -> Result<Vec<Category>, ApiError> {
            self.fetches
                .lock()
                .unwrap()
                .push(format!("subcategories:{}", category_id));
            if self.fail_subcategories.contains(&category_id) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "HTTP 500".to_string(),
                });
            }
            Ok(self.children.get(&category_id).cloned().unwrap_or_default())
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn make_product(id: i64, category_id: i64) -> Product {
        Product {
            id,
            name: format!("product-{}", id),
            description: None,
            price: 100.0,
            image_url: None,
            category_id,
        }
    }

    fn make_category(id: i64, parent: Option<i64>) -> Category {
        Category {
            id,
            name: format!("category-{}", id),
            description: None,
            image_url: None,
            parent_category_id: parent,
            parent_category_name: None,
        }
    }

    fn product_ids(aggregate: &crate::catalog::ProductAggregate) -> Vec<i64> {
        aggregate.products.iter().map(|p| p.id).collect()
    }

    // ── Tests ────────────────────────────────────────────────────────────

    /// Tree A(1) -> [B(2), C(3)], B -> [D(4)]; products A:[p1] B:[p2] C:[]
    /// D:[p3]. Depth-first pre-order yields p1, p2, p3.
    #[tokio::test]
    async fn test_collects_subtree_depth_first() {
        let source = TreeSource::new()
            .with_products(1, &[10])
            .with_products(2, &[20])
            .with_products(4, &[40])
            .with_children(1, &[2, 3])
            .with_children(2, &[4]);

        let aggregate = collect_products(&source, 1).await;

        assert_eq!(product_ids(&aggregate), vec![10, 20, 40]);
        assert!(aggregate.is_complete());
        // Visit order: A, then B's branch to the bottom, then C.
        let visited: Vec<i64> = aggregate.nodes.iter().map(|n| n.category_id).collect();
        assert_eq!(visited, vec![1, 2, 4, 3]);
    }

    #[tokio::test]
    async fn test_single_node_tree() {
        let source = TreeSource::new().with_products(7, &[70, 71]);

        let aggregate = collect_products(&source, 7).await;

        assert_eq!(product_ids(&aggregate), vec![70, 71]);
        assert_eq!(aggregate.nodes.len(), 1);
        assert_eq!(aggregate.nodes[0].status, NodeStatus::Complete);
    }

    #[tokio::test]
    async fn test_empty_category_is_complete_not_failed() {
        let source = TreeSource::new();

        let aggregate = collect_products(&source, 1).await;

        assert!(aggregate.products.is_empty());
        assert_eq!(aggregate.nodes[0].status, NodeStatus::Complete);
    }

    /// A product the backend lists under two categories appears twice.
    #[tokio::test]
    async fn test_duplicates_are_not_deduplicated() {
        let source = TreeSource::new()
            .with_products(1, &[10])
            .with_products(2, &[10])
            .with_children(1, &[2]);

        let aggregate = collect_products(&source, 1).await;

        assert_eq!(product_ids(&aggregate), vec![10, 10]);
    }

    /// Subcategories fetch for one sibling fails: the sibling contributes
    /// nothing below itself, the rest of the walk is unaffected.
    #[tokio::test]
    async fn test_subcategories_failure_keeps_siblings() {
        let source = TreeSource::new()
            .with_products(1, &[10])
            .with_products(2, &[20])
            .with_products(4, &[40])
            .with_children(1, &[2, 3])
            .with_children(2, &[4])
            .failing_subcategories(3);

        let aggregate = collect_products(&source, 1).await;

        assert_eq!(product_ids(&aggregate), vec![10, 20, 40]);
        assert!(!aggregate.is_complete());
        let node_c = aggregate.nodes.iter().find(|n| n.category_id == 3).unwrap();
        assert!(matches!(node_c.status, NodeStatus::Partial { .. }));
    }

    /// Products fetch for one node fails: its own products are missing but
    /// its subtree is still walked.
    #[tokio::test]
    async fn test_products_failure_still_walks_children() {
        let source = TreeSource::new()
            .with_products(2, &[20])
            .with_children(1, &[2])
            .failing_products(1);

        let aggregate = collect_products(&source, 1).await;

        assert_eq!(product_ids(&aggregate), vec![20]);
        let node_a = aggregate.nodes.iter().find(|n| n.category_id == 1).unwrap();
        assert!(matches!(node_a.status, NodeStatus::Partial { .. }));
    }

    #[tokio::test]
    async fn test_both_fetches_failing_reports_failed_node() {
        let source = TreeSource::new()
            .failing_products(1)
            .failing_subcategories(1);

        let aggregate = collect_products(&source, 1).await;

        assert!(aggregate.products.is_empty());
        assert_eq!(aggregate.nodes.len(), 1);
        assert!(matches!(
            aggregate.nodes[0].status,
            NodeStatus::Failed { .. }
        ));
    }

    /// A cyclic parent/child relationship terminates: each category is
    /// fetched once and the revisit is skipped.
    #[tokio::test]
    async fn test_cycle_terminates_with_single_visit() {
        let source = TreeSource::new()
            .with_products(1, &[10])
            .with_products(2, &[20])
            .with_children(1, &[2])
            .with_children(2, &[1]);

        let aggregate = collect_products(&source, 1).await;

        assert_eq!(product_ids(&aggregate), vec![10, 20]);
        assert_eq!(aggregate.nodes.len(), 2);
        let fetches = source.fetch_log();
        assert_eq!(
            fetches.iter().filter(|f| *f == "products:1").count(),
            1,
            "category 1 must be fetched exactly once"
        );
    }

    /// Two runs over an unchanged tree yield identical contents.
    #[tokio::test]
    async fn test_repeat_runs_are_identical() {
        let source = TreeSource::new()
            .with_products(1, &[10, 11])
            .with_products(2, &[20])
            .with_children(1, &[2]);

        let first = collect_products(&source, 1).await;
        let second = collect_products(&source, 1).await;

        assert_eq!(product_ids(&first), product_ids(&second));
        assert_eq!(first.nodes, second.nodes);
    }
}
