//! Benchmarks for the presentation and listing-order hot paths.

use chrono::TimeZone;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use home_shelf::catalog::sort::{self, SortOrder};
use home_shelf::catalog::types::{CategoryId, ProductId, RawProduct};
use home_shelf::config::ShopConfig;
use home_shelf::fetch::present::Presenter;

fn make_products(count: u64) -> Vec<RawProduct> {
    (0..count)
        .map(|i| RawProduct {
            id: ProductId(i),
            category: CategoryId(1),
            name: format!("Product {i}"),
            price: (i % 97) as f64,
            quantity: (i % 5) as i64,
            available: i % 7 != 0,
            date_add: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(i as i64),
            position: (i % 31) as u32,
            link_rewrite: format!("product-{i}"),
            cover: Some(format!("/img/p/{i}.jpg")),
            url: None,
            description_short: String::new(),
        })
        .collect()
}

fn bench_present(c: &mut Criterion) {
    let presenter = Presenter::new(ShopConfig::default());
    let products = make_products(10_000);

    c.bench_function("present_8_of_10k_in_stock", |b| {
        b.iter(|| {
            let presented = presenter.present(black_box(products.clone()), 8, true);
            black_box(presented);
        })
    });
}

fn bench_sort(c: &mut Criterion) {
    let products = make_products(10_000);

    c.bench_function("sort_10k_price_asc", |b| {
        b.iter(|| {
            let mut listed = black_box(products.clone());
            sort::apply(&mut listed, SortOrder::parse("price_asc"));
            black_box(listed);
        })
    });
}

criterion_group!(benches, bench_present, bench_sort);
criterion_main!(benches);
