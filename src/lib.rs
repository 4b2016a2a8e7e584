pub mod config;
pub mod evaluate;
pub mod output;
pub mod responses;
pub mod schema;
pub mod scoring;
pub mod submit;
