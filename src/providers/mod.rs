pub mod eodhd;

pub use eodhd::EodhdProvider;
