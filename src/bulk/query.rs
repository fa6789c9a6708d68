//! Export query construction.
//!
//! Translates a preset export type plus a handful of options into the
//! GraphQL document submitted to `bulkOperationRunQuery`. Bulk queries
//! use the connection form without pagination arguments; the platform
//! walks every page server-side and streams nodes into the result file.

use crate::bulk::error::BulkError;

/// The resource a preset export covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportType {
    /// Products with their variants.
    Products,
    /// Orders with line items.
    Orders,
    /// Customers with addresses.
    Customers,
    /// Inventory items with levels.
    Inventory,
    /// A caller-supplied bulk query document.
    Custom,
}

impl ExportType {
    /// Lowercase name used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Customers => "customers",
            Self::Inventory => "inventory",
            Self::Custom => "custom",
        }
    }
}

/// Options shaping the generated export query.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Search syntax filter applied to the root connection.
    pub query_filter: Option<String>,
    /// Lower bound on `created_at`, orders only.
    pub created_at_min: Option<String>,
    /// Upper bound on `created_at`, orders only.
    pub created_at_max: Option<String>,
    /// Include a metafields connection under each node.
    pub include_metafields: bool,
    /// Full query document, required for [`ExportType::Custom`].
    pub custom_query: Option<String>,
}

/// Builds the bulk query document for an export.
///
/// # Errors
///
/// Returns [`BulkError::Validation`] when [`ExportType::Custom`] is
/// requested without a `custom_query`.
pub fn build_export_query(
    export_type: ExportType,
    options: &ExportOptions,
) -> Result<String, BulkError> {
    if export_type == ExportType::Custom {
        return options
            .custom_query
            .clone()
            .ok_or_else(|| BulkError::Validation {
                reason: "custom export requires a query document".to_string(),
            });
    }

    let filter = connection_filter(export_type, options);
    let metafields = if options.include_metafields {
        METAFIELDS_CONNECTION
    } else {
        ""
    };

    let document = match export_type {
        ExportType::Products => format!(
            "{{\n  products{filter} {{\n    edges {{\n      node {{\n        id\n        title\n        handle\n        status\n        vendor\n        productType\n        createdAt\n        variants {{\n          edges {{\n            node {{\n              id\n              title\n              sku\n              price\n              inventoryQuantity\n            }}\n          }}\n        }}{metafields}\n      }}\n    }}\n  }}\n}}"
        ),
        ExportType::Orders => format!(
            "{{\n  orders{filter} {{\n    edges {{\n      node {{\n        id\n        name\n        createdAt\n        displayFinancialStatus\n        displayFulfillmentStatus\n        totalPriceSet {{\n          shopMoney {{\n            amount\n            currencyCode\n          }}\n        }}\n        lineItems {{\n          edges {{\n            node {{\n              id\n              title\n              quantity\n              sku\n            }}\n          }}\n        }}{metafields}\n      }}\n    }}\n  }}\n}}"
        ),
        ExportType::Customers => format!(
            "{{\n  customers{filter} {{\n    edges {{\n      node {{\n        id\n        displayName\n        email\n        phone\n        numberOfOrders\n        createdAt\n        addresses {{\n          city\n          province\n          country\n          zip\n        }}{metafields}\n      }}\n    }}\n  }}\n}}"
        ),
        ExportType::Inventory => format!(
            "{{\n  inventoryItems{filter} {{\n    edges {{\n      node {{\n        id\n        sku\n        tracked\n        unitCost {{\n          amount\n        }}\n        inventoryLevels {{\n          edges {{\n            node {{\n              id\n              location {{\n                name\n              }}\n            }}\n          }}\n        }}{metafields}\n      }}\n    }}\n  }}\n}}"
        ),
        ExportType::Custom => unreachable!(),
    };

    Ok(document)
}

const METAFIELDS_CONNECTION: &str = "\n        metafields {\n          edges {\n            node {\n              namespace\n              key\n              value\n            }\n          }\n        }";

/// Composes the `(query: "...")` argument for the root connection.
///
/// Order date bounds are folded into the same search string as
/// `created_at:>=` / `created_at:<=` clauses.
fn connection_filter(export_type: ExportType, options: &ExportOptions) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(filter) = &options.query_filter {
        if !filter.trim().is_empty() {
            clauses.push(filter.trim().to_string());
        }
    }
    if export_type == ExportType::Orders {
        if let Some(min) = &options.created_at_min {
            clauses.push(format!("created_at:>={min}"));
        }
        if let Some(max) = &options.created_at_max {
            clauses.push(format!("created_at:<={max}"));
        }
    }

    if clauses.is_empty() {
        String::new()
    } else {
        let joined = clauses.join(" AND ").replace('"', "\\\"");
        format!("(query: \"{joined}\")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_query_walks_variants() {
        let document = build_export_query(ExportType::Products, &ExportOptions::default()).unwrap();
        assert!(document.contains("products {"));
        assert!(document.contains("variants {"));
        assert!(document.contains("inventoryQuantity"));
        assert!(!document.contains("metafields"));
    }

    #[test]
    fn test_filter_is_embedded_and_escaped() {
        let options = ExportOptions {
            query_filter: Some("status:active AND vendor:\"Acme\"".to_string()),
            ..ExportOptions::default()
        };
        let document = build_export_query(ExportType::Products, &options).unwrap();
        assert!(document.contains("products(query: \"status:active AND vendor:\\\"Acme\\\"\")"));
    }

    #[test]
    fn test_order_date_bounds_fold_into_filter() {
        let options = ExportOptions {
            query_filter: Some("financial_status:paid".to_string()),
            created_at_min: Some("2024-01-01".to_string()),
            created_at_max: Some("2024-06-30".to_string()),
            ..ExportOptions::default()
        };
        let document = build_export_query(ExportType::Orders, &options).unwrap();
        assert!(document.contains(
            "orders(query: \"financial_status:paid AND created_at:>=2024-01-01 AND created_at:<=2024-06-30\")"
        ));
    }

    #[test]
    fn test_date_bounds_ignored_outside_orders() {
        let options = ExportOptions {
            created_at_min: Some("2024-01-01".to_string()),
            ..ExportOptions::default()
        };
        let document = build_export_query(ExportType::Customers, &options).unwrap();
        assert!(!document.contains("created_at"));
        assert!(document.contains("customers {"));
    }

    #[test]
    fn test_metafields_connection_is_optional() {
        let options = ExportOptions {
            include_metafields: true,
            ..ExportOptions::default()
        };
        let document = build_export_query(ExportType::Inventory, &options).unwrap();
        assert!(document.contains("metafields {"));
        assert!(document.contains("inventoryItems {"));
    }

    #[test]
    fn test_custom_passes_document_through() {
        let options = ExportOptions {
            custom_query: Some("{ shop { name } }".to_string()),
            ..ExportOptions::default()
        };
        let document = build_export_query(ExportType::Custom, &options).unwrap();
        assert_eq!(document, "{ shop { name } }");
    }

    #[test]
    fn test_custom_without_document_is_rejected() {
        let result = build_export_query(ExportType::Custom, &ExportOptions::default());
        assert!(matches!(result, Err(BulkError::Validation { .. })));
    }

    #[test]
    fn test_empty_filter_produces_no_argument() {
        let options = ExportOptions {
            query_filter: Some("   ".to_string()),
            ..ExportOptions::default()
        };
        let document = build_export_query(ExportType::Products, &options).unwrap();
        assert!(document.contains("products {"));
        assert!(!document.contains("(query:"));
    }
}
