//! Fixture catalog used to reset a database to a known state.

use tracing::{info, instrument};

use crate::error::ProductResult;
use crate::models::NewProduct;
use crate::repository::ProductRepository;

/// Counts reported by [`reseed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub deleted: u64,
    pub inserted: u64,
}

fn fixture(
    name: &str,
    price: f64,
    category: &str,
    image: &str,
    description: &str,
    sizes: &[&str],
) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price,
        category: category.to_string(),
        description: description.to_string(),
        images: vec![image.to_string()],
        sizes: sizes.iter().map(|s| s.to_string()).collect(),
    }
}

/// The four starter products
pub fn fixtures() -> Vec<NewProduct> {
    vec![
        fixture(
            "SABC4 Heritage Tee",
            450.0,
            "T-Shirts",
            "https://images.unsplash.com/photo-1583743814966-8936f5b7be1a?q=80&w=1000&auto=format&fit=crop",
            "Premium cotton tee paying homage to Mzansi.",
            &["S", "M", "L", "XL"],
        ),
        fixture(
            "Jozi Streets Hoodie",
            850.0,
            "Hoodies",
            "https://images.unsplash.com/photo-1556821840-3a63f95609a7?q=80&w=1000&auto=format&fit=crop",
            "Heavyweight fleece for the winter.",
            &["M", "L", "XL"],
        ),
        fixture(
            "Kasi Cargo Pants",
            950.0,
            "Pants",
            "https://images.unsplash.com/photo-1624378439575-d8705ad7ae80?q=80&w=1000&auto=format&fit=crop",
            "Utility meets style.",
            &["30", "32", "34"],
        ),
        fixture(
            "Soweto Bucket Hat",
            300.0,
            "Accessories",
            "https://images.unsplash.com/photo-1575428652377-a2697242636b?q=80&w=1000&auto=format&fit=crop",
            "Essential summer accessory.",
            &["One Size"],
        ),
    ]
}

/// Delete every product, then insert [`fixtures`].
///
/// Not atomic: a failed insert leaves the collection empty.
#[instrument(skip(repository))]
pub async fn reseed<R>(repository: &R) -> ProductResult<SeedReport>
where
    R: ProductRepository + ?Sized,
{
    info!("Deleting old data...");
    let deleted = repository.delete_all().await?;

    info!("Seeding products...");
    let inserted = repository.insert_many(fixtures()).await?;

    info!(deleted, inserted, "Done");
    Ok(SeedReport { deleted, inserted })
}
