#![doc = "bucket-loader-core: core logic library for bucket-loader."]

//! This crate turns spreadsheet rows describing object-store buckets (S3, GCS, ADLS)
//! into catalog assets and loads them in bulk. Transport to a real catalog is not
//! included here; it is reached through the [`contract::CatalogClient`] trait.
//!
//! # Usage
//! - Resolve rows with [`bucket::BucketDetails::from_row`] and key them by
//!   [`bucket::BucketDetails::identity`].
//! - Load the resulting map with [`bucket::upsert`].

pub mod asset;
pub mod batch;
pub mod bucket;
pub mod classify;
pub mod connection;
pub mod connector;
pub mod contract;
pub mod error;
pub mod row;
