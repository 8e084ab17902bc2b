use std::error::Error;

use rust_decimal_macros::dec;
use tracing::{error, info, Instrument};

use mix_orders::app_system::{default_catalog, load_catalog, setup_tracing, OrderSystem, SystemConfig};
use mix_orders::domain::{AccountId, Caller, IngredientRequest, LineRequest, MixRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = SystemConfig::load();
    setup_tracing(&config.logging());

    info!("Starting mix order system");
    let system = OrderSystem::with_capacity(config.channel_capacity);

    let catalog = match &config.catalog {
        Some(path) => load_catalog(path)?,
        None => default_catalog()?,
    };
    let products = system
        .seed_catalog(catalog)
        .instrument(tracing::info_span!("catalog_seeding"))
        .await?;
    let (Some(base), Some(nuts)) = (products.first(), products.get(2)) else {
        return Err("seed catalog needs at least three products".into());
    };

    let client = Caller::client(AccountId::new());
    let admin = Caller::admin(AccountId::new());

    let request = MixRequest {
        name: "Morning Trail".to_string(),
        ingredients: vec![
            IngredientRequest::new(base.id, dec!(1)),
            IngredientRequest::new(nuts.id, dec!(0.5)),
        ],
    };
    let mix = system
        .mix_client
        .create_mix(&client, request)
        .instrument(tracing::info_span!("mix_composition"))
        .await?;
    info!(mix_id = %mix.id, price = %mix.total_price, calories = mix.total_calories, "Mix composed");

    let lines = vec![LineRequest::product(base.id, dec!(3)), LineRequest::mix(mix.id, dec!(2))];
    let span = tracing::info_span!("order_processing");
    let order_result = async {
        info!("Processing order through order system");
        system.order_client.create_order(&client, lines).await
    }
    .instrument(span)
    .await;

    match order_result {
        Ok(order) => {
            info!(order_id = %order.id, total = %order.total, "Order processed successfully");
            let stock = system.product_client.check_stock(base.id).await?;
            info!(product = %base.name, stock = %stock, "Stock after order");

            let visible = system.order_client.list_orders(&admin).await?;
            info!(orders = visible.len(), "Orders visible to admin");

            let cancelled = system
                .order_client
                .cancel_order(&client, &order.id.to_string())
                .instrument(tracing::info_span!("order_cancellation"))
                .await?;
            let stock = system.product_client.check_stock(base.id).await?;
            info!(order_id = %cancelled.id, status = %cancelled.status, stock = %stock, "Order cancelled");
        }
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
