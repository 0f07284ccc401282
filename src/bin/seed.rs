use products_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::products::CreateProductRequest,
    error::ManagerError,
    services::{OrmProducts, ProductManager},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let url = config
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
    let orm = create_orm_conn(&url).await?;
    run_migrations(&orm).await?;

    seed_products(&OrmProducts::new(orm)).await
}

async fn seed_products(products: &OrmProducts) -> anyhow::Result<()> {
    let catalogue = vec![
        ("Axum Hoodie", "HOOD-001", "clothing", 550000, 50),
        ("Ferris Mug", "MUG-001", "kitchen", 120000, 100),
        ("Rust Sticker Pack", "STK-001", "stationery", 50000, 200),
        ("Crab Socks", "SOCK-001", "clothing", 80000, 0),
        ("E-book: Async Rust", "BOOK-001", "books", 250000, 75),
    ];

    for (title, code, category, price, stock) in catalogue {
        let request = CreateProductRequest {
            title: title.to_string(),
            description: None,
            code: code.to_string(),
            price,
            status: None,
            stock,
            category: category.to_string(),
            thumbnail: None,
        };
        match products.add(request).await {
            Ok(_) | Err(ManagerError::DuplicateCode(_)) => {}
            Err(err) => return Err(err.into()),
        }
    }

    println!("Seeded products");
    Ok(())
}
