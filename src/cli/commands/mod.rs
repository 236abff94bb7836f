pub mod reset_db;
pub mod seed;
pub mod serve;
