// Text analysis: keyword lists, signal extraction and job profiling.
// Pure and synchronous; nothing in here performs I/O after startup.

pub mod extractor;
pub mod job_analyzer;
pub mod keywords;
