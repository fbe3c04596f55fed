/// Database models and data accessors
///
/// Each module owns one table and translates domain operations into
/// parameterized SQL:
///
/// - `user`: accounts (identity, online/verified flags)
/// - `profile`: 1:1 free-form profile with JSON-blob columns
/// - `stats`: 1:1 activity counters
/// - `post`: community posts with likes and comment counters
/// - `comment`: comments on posts
/// - `question`: Q&A questions with views/answer counters
/// - `answer`: answers with the helpful flag

pub mod answer;
pub mod comment;
pub mod post;
pub mod profile;
pub mod question;
pub mod stats;
pub mod user;
