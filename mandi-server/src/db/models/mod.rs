//! Database models
//!
//! Typed rows for the SurrealDB tables plus the create/update payloads the
//! API accepts. Record links between tables are `RecordId`s serialized as
//! `"table:key"` strings.

pub mod offer;
pub mod order;
pub mod product;
pub mod request;
pub mod serde_helpers;
pub mod user;

pub use offer::{
    OfferStatus, OfferWithRequest, OfferWithSeller, SellerOffer, SellerOfferCreate, SellerOfferId,
};
pub use order::{
    Invoice, InvoiceLine, InvoiceView, Order, OrderId, OrderWithItem, PurchaseCreate,
};
pub use product::{CatalogItem, CatalogItemCreate, CatalogItemId, CatalogItemUpdate};
pub use request::{
    ProductRequest, ProductRequestCreate, ProductRequestId, RequestStatus, RequestWithAcceptedOffer,
    RequestWithBuyer, Urgency,
};
pub use user::{Role, User, UserCreate, UserId};
