pub mod alert;
pub mod statistic;
pub mod user;
