//! Product documents on disk
//!
//! A product is a single markdown file named after its id. The frontmatter
//! holds every Product field; the body is a readable rendering of the
//! product that is regenerated on each write and ignored when reading.
//!
//! ```markdown
//! ---
//! _id: 5d0c1f9e-...
//! name: Running Shoes
//! price: 89.99
//! category: Footwear
//! variants:
//! - _id: 9b2e...
//!   color: Red
//!   size: M
//!   stock: 10
//! createdAt: 2024-01-15T10:00:00Z
//! updatedAt: 2024-01-15T10:00:00Z
//! ---
//!
//! # Running Shoes
//!
//! | Color | Size | Stock |
//! |-------|------|-------|
//! | Red | M | 10 |
//! ```

use super::frontmatter;
use crate::error::{Error, Result};
use crate::schema::Product;

/// File extension of product documents
pub const EXTENSION: &str = "md";

/// File name for a product id
pub fn file_name(id: &str) -> String {
    format!("{}.{}", id, EXTENSION)
}

/// Render a product to markdown
pub fn render(product: &Product) -> Result<String> {
    frontmatter::render(product, &render_body(product))
}

/// Parse a product document whose file stem is `id`
pub fn parse(id: &str, content: &str) -> Result<Product> {
    let (product, _body): (Product, String) = frontmatter::parse(content)?;

    if product.id.to_string() != id {
        return Err(Error::DocumentIdMismatch {
            file: id.to_string(),
            id: product.id.to_string(),
        });
    }
    product.check()?;

    Ok(product)
}

fn render_body(product: &Product) -> String {
    let mut body = format!(
        "# {}\n\n{} - ${:.2}\n",
        product.name, product.category, product.price
    );

    if !product.variants.is_empty() {
        body.push_str("\n| Color | Size | Stock |\n|-------|------|-------|\n");
        for variant in &product.variants {
            body.push_str(&format!(
                "| {} | {} | {} |\n",
                variant.color, variant.size, variant.stock
            ));
        }
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ProductSpec, VariantSpec};

    fn shoes() -> Product {
        let spec = ProductSpec::new("Running Shoes", 89.99, "Footwear")
            .with_variant(VariantSpec::new("Red", "M", 10))
            .with_variant(VariantSpec::new("Blue", "L", 5));
        Product::from_spec(spec, chrono::Utc::now()).unwrap()
    }

    #[test]
    fn test_render_then_parse() {
        let product = shoes();
        let rendered = render(&product).unwrap();

        assert!(rendered.contains("# Running Shoes"));
        assert!(rendered.contains("| Blue | L | 5 |"));

        let parsed = parse(&product.id.to_string(), &rendered).unwrap();
        assert_eq!(parsed, product);
    }

    #[test]
    fn test_body_is_ignored() {
        let product = shoes();
        let rendered = render(&product).unwrap().replace("| Red | M | 10 |", "| Red | M | 999 |");
        let parsed = parse(&product.id.to_string(), &rendered).unwrap();
        assert_eq!(parsed.variants[0].stock, 10);
    }

    #[test]
    fn test_id_must_match_file_name() {
        let product = shoes();
        let rendered = render(&product).unwrap();
        let result = parse("some-other-id", &rendered);
        assert!(matches!(result, Err(Error::DocumentIdMismatch { .. })));
    }

    #[test]
    fn test_invalid_stored_product_is_rejected() {
        let mut product = shoes();
        product.price = -5.0;
        let rendered = render(&product).unwrap();
        assert!(matches!(
            parse(&product.id.to_string(), &rendered),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_negative_stock_on_disk_fails_to_parse() {
        let product = shoes();
        let rendered = render(&product).unwrap().replace("stock: 5", "stock: -5");
        assert!(parse(&product.id.to_string(), &rendered).is_err());
    }
}
