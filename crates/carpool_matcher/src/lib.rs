pub mod geo_math;
pub mod input;
pub mod matcher;
pub mod output;
pub mod problem;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
