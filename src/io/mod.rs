pub mod age_csv;
pub mod column_code;
pub mod format;
pub mod report;
