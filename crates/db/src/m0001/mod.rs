mod aisle;
mod aisle_product;
mod home;
mod location;
mod product;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "aisleron",
    "m0001",
    vec_box![],
    vec_box![
        location::CreateTable,
        location::CreateUk1,
        location::CreateUk2,
        aisle::CreateTable,
        aisle::CreateIdx1,
        aisle::CreateUk1,
        product::CreateTable,
        product::CreateUk1,
        aisle_product::CreateTable,
        aisle_product::CreateIdx1,
        aisle_product::CreateIdx2,
        home::Seed
    ]
);
