//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that stand alone accept `&PgPool`; building blocks that must
//! join a caller's transaction accept `&mut PgConnection`.

pub mod category_repo;
pub mod comment_repo;
pub mod country_repo;
pub mod image_repo;
pub mod named;
pub mod product_repo;
pub mod seller_repo;
pub mod shop_category_repo;
pub mod shop_country_repo;
pub mod shop_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use country_repo::CountryRepo;
pub use image_repo::ImageRepo;
pub use product_repo::ProductRepo;
pub use seller_repo::SellerRepo;
pub use shop_category_repo::ShopCategoryRepo;
pub use shop_country_repo::ShopCountryRepo;
pub use shop_repo::ShopRepo;
pub use user_repo::UserRepo;

use misarfeh_core::filters::{Filters, Metadata};

/// Split window-counted list rows into records and pagination metadata.
pub(crate) fn paginate<R, T>(
    rows: Vec<R>,
    filters: &Filters,
    split: impl Fn(R) -> (i64, T),
) -> (Vec<T>, Metadata) {
    let mut total_records = 0;
    let records = rows
        .into_iter()
        .map(|row| {
            let (total, record) = split(row);
            total_records = total;
            record
        })
        .collect();
    (
        records,
        Metadata::calculate(total_records, filters.page, filters.page_size),
    )
}
