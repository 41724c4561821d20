//! Strimzi resource kinds
//!
//! `Kafka` is only read (to discover bootstrap address and replica count);
//! `KafkaTopic` is rendered for every topic an AppService consumes.

pub mod kafka;
pub mod kafka_topic;

pub use kafka::*;
pub use kafka_topic::*;
