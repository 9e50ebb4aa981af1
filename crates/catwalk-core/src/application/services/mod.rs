//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "resolve the page's streams" or
//! "complete the page's tastic data".

pub mod page_data_completion_service;
pub mod page_view_service;
pub mod stream_registry;
pub mod stream_service;

pub use page_data_completion_service::PageDataCompletionService;
pub use page_view_service::{PageView, PageViewService};
pub use stream_registry::StreamHandlerRegistry;
pub use stream_service::{StreamData, StreamService};
