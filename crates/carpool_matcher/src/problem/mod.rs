pub mod companion;
pub mod driver;
pub mod pair_id;
