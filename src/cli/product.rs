use aisleron::Config;
use aisleron::usecase::{AddProduct, UpdateProductStatus};
use aisleron_shared::{Product, Repository, Store};

pub async fn add_product(config: Config, name: String, in_stock: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(&config).await?;
    let usecase = AddProduct::new(
        store.products().clone(),
        store.aisles().clone(),
        store.aisle_products().clone(),
    );

    let id = usecase.call(&Product::new(name, in_stock), None).await?;

    println!("{id}");

    Ok(())
}

pub async fn toggle(config: Config, product_id: i64) -> anyhow::Result<()> {
    let (_, store) = super::open(&config).await?;

    let Some(product) = store.products().get(product_id).await? else {
        tracing::error!("product {product_id} not found");
        return Ok(());
    };

    let usecase = UpdateProductStatus::new(store.products().clone());
    if let Some(product) = usecase.call(product.id, !product.in_stock).await? {
        let status = if product.in_stock { "in stock" } else { "needed" };
        println!("{} is {status}", product.name);
    }

    Ok(())
}
