//! Output generation.
//!
//! - [`csv`]: pipe-delimited `date|text` files, one per run
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── dimitris-lignadis_news247_2021-03-31_12:34.csv
//! ├── dimitris-lignadis_newsbeast_2021-03-31_12:40.csv
//! ├── #lignadis_tweets_2021-03-31_12:45.csv
//! └── keywords_tweets_2021-03-31_12:50.csv
//! ```

pub mod csv;
