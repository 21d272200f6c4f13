mod batches;
mod words;

pub use batches::BatchRepository;
pub use words::WordRepository;
