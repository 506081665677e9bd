//! # graph-segment
//!
//! Rule-based sentence segmentation and candidate-phrase tokenization.
//!
//! This crate is the `segment(text) -> [Sentence]` collaborator of the
//! ingestion pipeline: it splits raw document text into sentences and
//! attaches the candidate phrases used downstream for keyword ranking and
//! terminal phrase extraction. Phrase extraction sits behind the
//! [`PhraseTokenizer`] trait so other languages can plug in.

pub mod phrases;
pub mod segmenter;

pub use phrases::{EnglishPhraseTokenizer, PhraseTokenizer};
pub use segmenter::Segmenter;
