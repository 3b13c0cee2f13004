//! Shared response types

pub mod response;

pub use response::{envelope, AnswerReport, Envelope, SearchReport, StatusReport, TrainReport};
