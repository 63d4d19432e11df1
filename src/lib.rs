pub mod collect;
pub mod config;
pub mod filters;
pub mod keywords;
pub mod output;
pub mod store;
pub mod youtube;
