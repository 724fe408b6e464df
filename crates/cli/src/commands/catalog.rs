//! Product commands: browse and sell.

use std::path::Path;

use nebula_core::Price;
use nebula_storefront::models::ProductDraft;
use nebula_storefront::services::catalog::ImageUpload;
use nebula_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub async fn products(state: &AppState) -> Result<(), AppError> {
    let products = state.catalog().list_products().await?;
    if products.is_empty() {
        println!("No products listed yet");
        return Ok(());
    }

    for product in products {
        println!(
            "{}  {:<30} {:>10}  sold by {} ({})",
            product.id, product.name, product.price, product.seller_name, product.seller_phone
        );
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn sell(
    state: &AppState,
    name: String,
    price: &str,
    description: String,
    image: Option<&Path>,
) -> Result<(), AppError> {
    let price: Price = price
        .parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid price: {e}")))?;

    let image = image.map(read_image).transpose()?;

    let mut draft = ProductDraft::new(name, price);
    draft.description = description;

    let session = state.session();
    let product = state
        .catalog()
        .list_product(session.as_ref(), draft, image)
        .await?;

    println!("Listed {} as {} for {}", product.name, product.id, product.price);
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::BadRequest(format!("Cannot read {}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    Ok(ImageUpload { file_name, bytes })
}
