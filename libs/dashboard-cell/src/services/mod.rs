pub mod aggregate;
pub mod feed;
