//! In-memory movie catalog with an ordered title index, a genre/rating
//! similarity graph, and hybrid recommendations served over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
