pub mod accumulator;
pub mod distance;
pub mod feed;
pub mod format;
pub mod record;
pub mod session;
