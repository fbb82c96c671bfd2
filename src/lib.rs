pub mod convert;
pub mod point;
pub mod region;
pub mod grid;
pub mod cluster;
pub mod marker;
pub mod config;
pub mod source;
pub mod query;
pub mod responder;
pub mod streamer;
pub mod service;
pub mod http;
pub mod logging;
pub mod error;
