//! Fixtures shared by unit tests.

use rust_decimal::Decimal;

use crate::actor_framework::{Entity, ResourceActor};
use crate::clients::ProductClient;
use crate::domain::{AccountId, Order, OrderCreate, OrderId, OrderLine, Product, ProductCreate, ProductId};

/// A catalog actor on its own, for tests that never need mixes or orders.
pub fn spawn_catalog() -> ProductClient {
    let (actor, inner) = ResourceActor::<Product>::new(16, ProductId::new);
    tokio::spawn(actor.run());
    ProductClient::new(inner)
}

pub fn product(name: &str, retail_price: Decimal, stock: Decimal) -> Product {
    let mut params = ProductCreate::new(name, retail_price, retail_price, stock);
    params.code = Some(name.chars().take(3).collect::<String>().to_uppercase());
    Product::from_create(ProductId::new(), params).expect("valid product fixture")
}

pub fn order(owner: AccountId, lines: Vec<OrderLine>) -> Order {
    let total = lines.iter().map(OrderLine::subtotal).sum();
    Order::from_create(OrderId::new(), OrderCreate { owner, lines, total }).expect("valid order fixture")
}
