//! Cart and order commands.

use nebula_core::{OrderId, ProductId};
use nebula_storefront::models::{CartLine, Order};
use nebula_storefront::services::database::DocumentPath;
use nebula_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    print_lines(&state.cart().get_cart());
    println!(
        "{} item(s), total {}",
        state.cart().get_item_count(),
        state.cart().get_total()
    );
}

#[allow(clippy::print_stdout)]
pub async fn add(state: &AppState, product_id: &str) -> Result<(), AppError> {
    let id = ProductId::new(product_id);
    let product = state
        .catalog()
        .find_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    state.cart().add_to_cart(&product);
    println!("Added {} to cart", product.name);
    Ok(())
}

pub fn remove(state: &AppState, product_id: &str) {
    let lines = state.cart().remove_from_cart(&ProductId::new(product_id));
    print_lines(&lines);
}

pub fn set(state: &AppState, product_id: &str, quantity: i64) {
    let lines = state
        .cart()
        .update_quantity(&ProductId::new(product_id), quantity);
    print_lines(&lines);
}

#[allow(clippy::print_stdout)]
pub fn clear(state: &AppState) {
    state.cart().clear_cart();
    println!("Cart cleared");
}

#[allow(clippy::print_stdout)]
pub async fn checkout(state: &AppState) -> Result<(), AppError> {
    let session = state.session();
    let order = state.checkout().checkout(session.as_ref()).await?;
    println!("Order placed successfully! 🎉");
    print_order(&order);
    Ok(())
}

pub async fn order(state: &AppState, id: &str) -> Result<(), AppError> {
    let id = OrderId::new(id);
    let order: Order = state
        .backend()
        .database
        .read(&DocumentPath::order(&id))
        .await?
        .deserialize()?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    print_order(&order);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: &[CartLine]) {
    if lines.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for line in lines {
        println!(
            "{}  {:<30} {:>3} x {:>10} = {:>10}",
            line.id,
            line.name,
            line.quantity,
            line.price,
            line.line_total()
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_order(order: &Order) {
    println!("Order {} ({}) placed {}", order.id, order.status, order.created_at);
    print_lines(&order.items);
    println!("Total {}", order.total);
}
