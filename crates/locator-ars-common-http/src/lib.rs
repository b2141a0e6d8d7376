//! HTTP client utilities for locator-ars.

pub mod client;
pub mod request;
pub mod response;

pub use client::{build_client, HttpClient, HttpConfig, HttpError};
pub use request::{headers, RequestBuilder};
pub use response::{decode_json, parse_json, JsonBody, ResponseError};
pub use reqwest::StatusCode;
