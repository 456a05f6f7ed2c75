pub mod age_bin;
pub mod cohort;
pub mod export;
pub mod patient;
pub mod prompt;
pub mod summary;
