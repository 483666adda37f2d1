//! WebHDFS JSON payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use hdfsutils_core::{path, Node, NodeKind, Permission};

/// One `FileStatus` object as returned by `GETFILESTATUS` and `LISTSTATUS`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    /// Name relative to the listed directory; empty for `GETFILESTATUS`.
    #[serde(default)]
    pub path_suffix: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub length: u64,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub modification_time: i64,
    /// Milliseconds since the epoch; 0 when access times are disabled.
    #[serde(default)]
    pub access_time: i64,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    /// Octal permission string, e.g. `"755"`.
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub replication: u16,
    #[serde(default)]
    pub block_size: u64,
    #[serde(default)]
    pub children_num: Option<u64>,
}

impl FileStatus {
    /// Convert to a [`Node`], resolving `pathSuffix` against `base`.
    ///
    /// `base` is the stat'ed path for `GETFILESTATUS` and the listed directory
    /// for `LISTSTATUS`.
    pub fn into_node(self, base: &str) -> Node {
        let full = if self.path_suffix.is_empty() {
            path::normalize(base)
        } else {
            path::join(base, &self.path_suffix)
        };

        let mut node = Node::new(full, self.kind);
        node.length = self.length;
        node.modified = millis(self.modification_time).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        node.accessed = (self.access_time > 0)
            .then(|| millis(self.access_time))
            .flatten();
        node.owner = self.owner.into();
        node.group = self.group.into();
        if let Some(permission) = Permission::from_octal(&self.permission) {
            node.permission = permission;
        }
        node.replication = self.replication;
        node.block_size = self.block_size;
        node.children = self.children_num;
        node
    }
}

fn millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// The `RemoteException` body of a failed request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteException {
    pub exception: String,
    #[serde(default)]
    pub java_class_name: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileStatusResponse {
    #[serde(rename = "FileStatus")]
    pub file_status: FileStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListStatusResponse {
    #[serde(rename = "FileStatuses")]
    pub file_statuses: FileStatuses,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileStatuses {
    #[serde(rename = "FileStatus", default)]
    pub file_status: Vec<FileStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BooleanResponse {
    pub boolean: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoteExceptionResponse {
    #[serde(rename = "RemoteException")]
    pub remote_exception: RemoteException,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_BODY: &str = r#"{
      "FileStatuses": {
        "FileStatus": [
          {
            "accessTime": 1320171722771,
            "blockSize": 33554432,
            "group": "supergroup",
            "length": 24930,
            "modificationTime": 1320171722771,
            "owner": "webuser",
            "pathSuffix": "a.patch",
            "permission": "644",
            "replication": 1,
            "type": "FILE"
          },
          {
            "accessTime": 0,
            "blockSize": 0,
            "childrenNum": 2,
            "group": "supergroup",
            "length": 0,
            "modificationTime": 1320895981256,
            "owner": "szetszwo",
            "pathSuffix": "bar",
            "permission": "711",
            "replication": 0,
            "type": "DIRECTORY"
          }
        ]
      }
    }"#;

    #[test]
    fn test_decode_list_status() {
        let response: ListStatusResponse = serde_json::from_str(LIST_BODY).unwrap();
        let nodes: Vec<Node> = response
            .file_statuses
            .file_status
            .into_iter()
            .map(|s| s.into_node("/user/webuser"))
            .collect();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].path, "/user/webuser/a.patch");
        assert_eq!(nodes[0].kind, NodeKind::File);
        assert_eq!(nodes[0].length, 24930);
        assert_eq!(nodes[0].permission, Permission(0o644));
        assert_eq!(nodes[0].modified.timestamp_millis(), 1320171722771);
        assert!(nodes[0].accessed.is_some());

        assert_eq!(nodes[1].path, "/user/webuser/bar");
        assert!(nodes[1].is_dir());
        assert_eq!(nodes[1].children, Some(2));
        assert!(nodes[1].accessed.is_none());
    }

    #[test]
    fn test_decode_file_status_uses_requested_path() {
        let body = r#"{"FileStatus":{"pathSuffix":"","type":"DIRECTORY","length":0,
            "modificationTime":1320173277227,"owner":"webuser","group":"supergroup",
            "permission":"777","replication":0,"blockSize":0,"accessTime":0}}"#;
        let response: FileStatusResponse = serde_json::from_str(body).unwrap();
        let node = response.file_status.into_node("/user/");

        assert_eq!(node.path, "/user");
        assert_eq!(node.name.as_str(), "user");
        assert_eq!(node.permission.symbolic(), "rwxrwxrwx");
    }

    #[test]
    fn test_decode_remote_exception() {
        let body = r#"{"RemoteException":{"exception":"FileNotFoundException",
            "javaClassName":"java.io.FileNotFoundException",
            "message":"File does not exist: /foo/a.patch"}}"#;
        let response: RemoteExceptionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.remote_exception.exception, "FileNotFoundException");
        assert_eq!(
            response.remote_exception.message,
            "File does not exist: /foo/a.patch"
        );
    }
}
