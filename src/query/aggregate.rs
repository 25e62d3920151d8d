//! Aggregations over the catalog

use crate::schema::{Category, Product};
use serde::Serialize;
use std::collections::BTreeMap;

/// Stock summed over every variant of every product sharing a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTotal {
    pub product_name: String,
    pub total_stock: u64,
    pub variant_count: usize,
}

/// Number of products in a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// Group variants by product name, one row per distinct name
///
/// Products without variants produce no row. Rows are ordered by name.
pub fn stock_by_product<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<StockTotal> {
    let mut groups: BTreeMap<&str, (u64, usize)> = BTreeMap::new();

    for product in products.into_iter().filter(|p| !p.variants.is_empty()) {
        let group = groups.entry(product.name.as_str()).or_insert((0, 0));
        group.0 += product.total_stock();
        group.1 += product.variants.len();
    }

    groups
        .into_iter()
        .map(|(name, (total_stock, variant_count))| StockTotal {
            product_name: name.to_string(),
            total_stock,
            variant_count,
        })
        .collect()
}

/// Count products per category, in category declaration order
///
/// Categories without products are omitted.
pub fn count_by_category<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for product in products {
        *counts.entry(product.category).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ProductSpec, VariantSpec};

    fn product(name: &str, category: &str, stocks: &[i64]) -> Product {
        let mut spec = ProductSpec::new(name, 1.0, category);
        for stock in stocks {
            spec = spec.with_variant(VariantSpec::new("Black", "M", *stock));
        }
        Product::from_spec(spec, chrono::Utc::now()).unwrap()
    }

    #[test]
    fn test_stock_by_product() {
        let products = vec![
            product("Winter Jacket", "Apparel", &[8, 12]),
            product("Smartphone", "Electronics", &[]),
            product("Running Shoes", "Footwear", &[10, 5]),
        ];

        assert_eq!(
            stock_by_product(&products),
            vec![
                StockTotal {
                    product_name: "Running Shoes".into(),
                    total_stock: 15,
                    variant_count: 2,
                },
                StockTotal {
                    product_name: "Winter Jacket".into(),
                    total_stock: 20,
                    variant_count: 2,
                },
            ]
        );
    }

    #[test]
    fn test_stock_by_product_merges_duplicate_names() {
        let products = vec![
            product("Tee", "Apparel", &[1, 2]),
            product("Tee", "Apparel", &[3]),
        ];
        let rows = stock_by_product(&products);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_stock, 6);
        assert_eq!(rows[0].variant_count, 3);
    }

    #[test]
    fn test_count_by_category() {
        let products = vec![
            product("Lamp", "Home", &[]),
            product("Winter Jacket", "Apparel", &[]),
            product("Tee", "Apparel", &[]),
        ];
        assert_eq!(
            count_by_category(&products),
            vec![
                CategoryCount {
                    category: Category::Apparel,
                    count: 2,
                },
                CategoryCount {
                    category: Category::Home,
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_stock_total_field_names() {
        let row = StockTotal {
            product_name: "Tee".into(),
            total_stock: 3,
            variant_count: 1,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["productName"], "Tee");
        assert_eq!(json["totalStock"], 3);
        assert_eq!(json["variantCount"], 1);
    }
}
