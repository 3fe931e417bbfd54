pub mod compress;
pub mod decompress;
pub mod inspect;
pub mod merge;
pub mod split;
