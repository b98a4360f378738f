pub mod document;
pub mod match_result;
pub mod skills;
