//! Purchase API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{InvoiceView, Order, OrderWithItem, PurchaseCreate};
use crate::db::repository::{CatalogItemRepository, OrderRepository};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, validate_positive_quantity, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

/// POST /api/purchase - buyer purchases from the catalog
///
/// The invoice snapshot is captured here, at purchase time; the stock
/// decrement and order insert commit together.
pub async fn purchase(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PurchaseCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    validate_required_text(&payload.item_id, "item_id", 128)?;
    validate_positive_quantity(payload.quantity, "quantity")?;
    validate_required_text(&payload.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;

    let catalog = CatalogItemRepository::new(state.get_db());
    let item = catalog
        .find_by_id(&payload.item_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    if item.quantity < payload.quantity {
        return Err(AppError::insufficient_stock("Not enough stock available"));
    }

    let orders = OrderRepository::new(state.get_db());
    let order = orders
        .purchase_atomic(
            &item,
            &user.username,
            payload.quantity,
            payload.delivery_address,
        )
        .await?;

    tracing::info!(
        buyer = %user.username,
        item = %order.item,
        quantity = order.quantity_purchased,
        total = %order.total_price,
        "Purchase completed"
    );

    Ok(ok_with_message(order, "Purchase successful!"))
}

/// GET /api/purchase/invoice/{id} - flat invoice for one order
pub async fn invoice(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<InvoiceView>> {
    let orders = OrderRepository::new(state.get_db());
    let order = orders
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    // The snapshot line, captured when the purchase happened
    let line = order
        .invoice
        .items
        .first()
        .ok_or_else(|| AppError::internal("Order has an empty invoice snapshot"))?;

    Ok(Json(InvoiceView {
        invoice_id: order.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        product_name: line.product_name.clone(),
        unit_price: line.unit_price,
        quantity: order.quantity_purchased,
        total_price: order.total_price,
        delivery_address: order.delivery_address.clone(),
        purchased_at: order.purchased_at,
        buyer: order.buyer.clone(),
    }))
}

/// GET /api/purchase/my-orders - buyer's order history
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderWithItem>>> {
    let orders = OrderRepository::new(state.get_db());
    Ok(Json(orders.find_mine(&user.username).await?))
}
