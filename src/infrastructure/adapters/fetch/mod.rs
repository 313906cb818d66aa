//! Fetch Adapter - HTTP 资源下载

mod http_asset_fetcher;

pub use http_asset_fetcher::HttpAssetFetcher;
