// Private module - not exposed in public API
mod client;

pub(crate) use client::WeaviateClient;
