//! Blocking WebHDFS client.

use reqwest::blocking::Client;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use hdfsutils_core::{FileSystem, Node, Result};

use crate::config::ClientConfig;
use crate::error::WebHdfsError;
use crate::status::{BooleanResponse, FileStatusResponse, ListStatusResponse, RemoteExceptionResponse};

/// HTTP client for one namenode.
#[derive(Debug)]
pub struct WebHdfsClient {
    http: Client,
    base: Url,
    config: ClientConfig,
}

impl WebHdfsClient {
    /// Create a client from a validated configuration.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, WebHdfsError> {
        let base = Url::parse(&config.base_url).map_err(|e| WebHdfsError::Url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(WebHdfsError::Url(config.base_url.clone()));
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, base, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request URL for `op` on `path`.
    pub fn url(&self, path: &str, op: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("webhdfs").push("v1");
            let mut pushed = false;
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
                pushed = true;
            }
            if !pushed {
                segments.push("");
            }
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("op", op);
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(user) = &self.config.user {
                query.append_pair("user.name", user);
            }
        }
        url
    }

    fn send<T: DeserializeOwned>(&self, method: Method, url: Url) -> std::result::Result<T, WebHdfsError> {
        debug!(%method, %url, "webhdfs request");
        let response = self.http.request(method, url).send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(decode_error(status.as_u16(), &body))
        }
    }

    fn send_boolean(&self, method: Method, url: Url, op: &'static str) -> std::result::Result<(), WebHdfsError> {
        let response: BooleanResponse = self.send(method, url)?;
        if response.boolean {
            Ok(())
        } else {
            Err(WebHdfsError::Refused { op })
        }
    }
}

/// Decode a failed response body into an error.
pub(crate) fn decode_error(status: u16, body: &str) -> WebHdfsError {
    match serde_json::from_str::<RemoteExceptionResponse>(body) {
        Ok(response) => WebHdfsError::Remote {
            exception: response.remote_exception.exception,
            message: response.remote_exception.message,
        },
        Err(_) => WebHdfsError::Http(status),
    }
}

impl FileSystem for WebHdfsClient {
    fn stat(&self, path: &str) -> Result<Node> {
        let url = self.url(path, "GETFILESTATUS", &[]);
        let response: FileStatusResponse = self
            .send(Method::GET, url)
            .map_err(|e| e.into_fs_error(path))?;
        Ok(response.file_status.into_node(path))
    }

    fn list(&self, path: &str) -> Result<Vec<Node>> {
        let url = self.url(path, "LISTSTATUS", &[]);
        let response: ListStatusResponse = self
            .send(Method::GET, url)
            .map_err(|e| e.into_fs_error(path))?;
        Ok(response
            .file_statuses
            .file_status
            .into_iter()
            .map(|status| status.into_node(path))
            .collect())
    }

    fn rename(&self, source: &str, target: &str) -> Result<()> {
        let url = self.url(source, "RENAME", &[("destination", target)]);
        self.send_boolean(Method::PUT, url, "RENAME")
            .map_err(|e| e.into_fs_error(source))?;
        info!(source, target, "renamed");
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path, "DELETE", &[("recursive", "true")]);
        self.send_boolean(Method::DELETE, url, "DELETE")
            .map_err(|e| e.into_fs_error(path))?;
        info!(path, "deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(user: Option<&str>) -> WebHdfsClient {
        let config = ClientConfig::builder()
            .base_url("http://namenode:50070")
            .user(user.map(str::to_string))
            .build()
            .unwrap();
        WebHdfsClient::new(config).unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client(None);
        let url = client.url("/user/alice/a.txt", "GETFILESTATUS", &[]);
        assert_eq!(
            url.as_str(),
            "http://namenode:50070/webhdfs/v1/user/alice/a.txt?op=GETFILESTATUS"
        );
    }

    #[test]
    fn test_url_root_and_params() {
        let client = client(Some("hdfs"));
        let url = client.url("/", "LISTSTATUS", &[]);
        assert_eq!(
            url.as_str(),
            "http://namenode:50070/webhdfs/v1/?op=LISTSTATUS&user.name=hdfs"
        );

        let url = client.url("/a b", "RENAME", &[("destination", "/c d")]);
        assert_eq!(
            url.as_str(),
            "http://namenode:50070/webhdfs/v1/a%20b?op=RENAME&destination=%2Fc+d&user.name=hdfs"
        );
    }

    #[test]
    fn test_decode_error_body() {
        let body = r#"{"RemoteException":{"exception":"AccessControlException",
            "javaClassName":"org.apache.hadoop.security.AccessControlException",
            "message":"Permission denied"}}"#;
        let err = decode_error(403, body);
        assert!(matches!(err, WebHdfsError::Remote { ref exception, .. } if exception == "AccessControlException"));

        let err = decode_error(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, WebHdfsError::Http(502)));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new("http://");
        assert!(WebHdfsClient::new(config).is_err());
    }
}
