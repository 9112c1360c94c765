mod synchronizer;

pub use synchronizer::OutputDetailSynchronizer;
