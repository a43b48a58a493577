// Adapters layer: concrete implementations of the domain ports (http fetch, chat model, portfolio store).

pub mod chat_model;
pub mod http_fetcher;
pub mod portfolio_csv;

pub use chat_model::{ChatCompletionModel, ChatModelSettings};
pub use http_fetcher::HttpPageFetcher;
pub use portfolio_csv::{load_portfolio, read_portfolio};
