use cart_store::app::open_local_store;
use cart_store::utils::{logger, validation::Validate};
use cart_store::{
    CartCommand, CartError, CartOutcome, CartStore, CliConfig, LocalStorage, TracingNotifier,
    UpdateProductAmount,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let config = cli.resolve()?;

    logger::init_logger(
        cli.verbose,
        cli.json_logs || config.json_logs(),
        config.log_level(),
    );

    tracing::info!("Starting cart-store CLI");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = open_local_store(&config, Arc::new(TracingNotifier)).await?;

    let result = match cli.command {
        CartCommand::Add { product_id } => store.add_product(product_id).await,
        CartCommand::Remove { product_id } => store.remove_product(product_id).await,
        CartCommand::Update { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await
        }
        CartCommand::Increment { product_id } => store.increment_product(product_id).await,
        CartCommand::Decrement { product_id } => store.decrement_product(product_id).await,
        CartCommand::List => Ok(CartOutcome::Unchanged),
    };

    print_cart(&store).await;

    match result {
        Ok(CartOutcome::Updated) => println!("✅ Cart updated"),
        Ok(CartOutcome::Unchanged) => {}
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            std::process::exit(exit_code(&e));
        }
    }

    Ok(())
}

async fn print_cart(store: &CartStore<LocalStorage>) {
    let items = store.cart().await;
    if items.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    println!("🛒 {} product(s) in cart", items.len());
    for item in &items {
        println!(
            "  #{:<6} {:<40} {:>4} x {:>10.2} = {:>10.2}",
            item.product_id,
            item.title,
            item.quantity,
            item.price,
            item.subtotal()
        );
    }
    println!("  Total: {:.2}", store.total().await);
}

fn exit_code(error: &CartError) -> i32 {
    if error.is_user_recoverable() {
        2
    } else {
        1
    }
}
