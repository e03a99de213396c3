// Application layer - Use case orchestration

pub mod container;
pub mod video_set_filter;

// Re-export the filter
pub use video_set_filter::VideoSetFilter;
