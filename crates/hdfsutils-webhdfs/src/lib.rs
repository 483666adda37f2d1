//! WebHDFS client for hdfsutils.
//!
//! [`WebHdfsClient`] speaks the WebHDFS REST API (`/webhdfs/v1/<path>?op=...`)
//! over blocking HTTP and implements [`hdfsutils_core::FileSystem`], so the
//! walker, move engine and find engine run unchanged against a real cluster.
//!
//! ```rust,no_run
//! use hdfsutils_core::FileSystem;
//! use hdfsutils_webhdfs::{ClientConfig, WebHdfsClient};
//!
//! let config = ClientConfig::builder()
//!     .base_url("http://namenode:50070")
//!     .user(Some("hdfs".to_string()))
//!     .build()
//!     .unwrap();
//! let client = WebHdfsClient::new(config).unwrap();
//! for node in client.list("/user").unwrap() {
//!     println!("{} {}", node.kind, node.path);
//! }
//! ```

mod client;
mod config;
mod error;
mod status;

pub use client::WebHdfsClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_URL};
pub use error::WebHdfsError;
pub use status::{FileStatus, RemoteException};
