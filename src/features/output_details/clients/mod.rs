mod siskeudes_client;

pub use siskeudes_client::{OutputDetailFetcher, SiskeudesClient};
