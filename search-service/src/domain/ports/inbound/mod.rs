mod term_search;

pub use term_search::*;
