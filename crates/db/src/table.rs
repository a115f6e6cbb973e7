use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Location {
    Table,
    Id,
    Type,
    DefaultFilter,
    Name,
    Pinned,
}

#[derive(Iden, Clone, Copy)]
pub enum Aisle {
    Table,
    Id,
    Name,
    LocationId,
    Rank,
    IsDefault,
}

#[derive(Iden, Clone, Copy)]
pub enum Product {
    Table,
    Id,
    Name,
    InStock,
}

#[derive(Iden, Clone, Copy)]
pub enum AisleProduct {
    Table,
    Id,
    AisleId,
    ProductId,
    Rank,
}
