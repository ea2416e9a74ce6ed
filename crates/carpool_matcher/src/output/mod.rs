pub mod file_output_store;
pub mod match_record;
pub mod output_store;
