pub mod feed_service;
pub mod article_service;
pub mod pipeline;
pub mod session;

pub use feed_service::FeedService;
pub use article_service::ArticleService;
pub use pipeline::{Pipeline, RunReport};
pub use session::Session;
