//! Damage simulation service: turns a pristine product photo into an
//! AI-edited rendition of shipping or wear damage, with a request-optimization
//! layer (prompt builder, image compressor, TTL response cache) between the
//! delivery surface and the generative image API.

pub mod cache;
pub mod compression;
pub mod damage;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod image_uri;
pub mod mcp_server;
pub mod prompt;
pub mod tools;
pub mod web_pages;
