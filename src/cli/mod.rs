pub mod account;
pub mod advice;
pub mod analysis;
pub mod dashboard;
pub mod quote;
pub mod trade;
pub mod ui;
