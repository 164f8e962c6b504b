pub mod article;
pub mod fetcher;
pub mod image;
pub mod llm;
pub mod upstream;

pub use article::SelectorExtractor;
pub use fetcher::ReqwestFetcher;
pub use image::ImageClient;
pub use llm::{ChatClient, ChatClientFactory};
