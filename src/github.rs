use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::{ContentError, Result},
    source::TreeClient,
    types::{DirectoryEntry, EntryType},
};

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub-backed content tree
///
/// Talks to a GitHub repository using:
/// - the contents API for shallow directory listings
/// - the git blobs API for content-addressed file downloads
#[derive(Clone)]
pub struct GitHubTree {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    git_ref: String,
    base_path: String,
    token: Option<String>,
}

/// One entry of a contents-API response
#[derive(Deserialize)]
struct GitHubApiEntry {
    name: String,
    path: String,
    sha: String,
    #[serde(rename = "type")]
    entry_type: String,
}

/// The contents API returns an array for a directory and a single object
/// for a file; the shape is decided here, immediately after the call.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Directory(Vec<GitHubApiEntry>),
    File(GitHubApiEntry),
}

#[derive(Deserialize)]
struct GitHubBlob {
    content: String,
    encoding: String,
}

impl GitHubTree {
    /// Create a new GitHub tree client
    ///
    /// # Arguments
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `git_ref` - Branch, tag, or commit to read from
    /// * `base_path` - Content root inside the repository (empty string for
    ///   the repository root); logical paths are relative to it
    pub fn new(owner: String, repo: String, git_ref: String, base_path: String) -> Self {
        let client = Client::builder()
            .user_agent("mdx-resolver/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            owner,
            repo,
            git_ref,
            base_path,
            token: None,
        }
    }

    /// Authenticate API requests with a bearer token
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// Point at a different API host (GitHub Enterprise, test servers)
    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Build the API URL for directory listings
    fn contents_url(&self, path: &str) -> String {
        let full_path = self.join_path(path);
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base, self.owner, self.repo, full_path, self.git_ref
        )
    }

    /// Build the API URL for blob downloads
    fn blob_url(&self, sha: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/blobs/{}",
            self.api_base, self.owner, self.repo, sha
        )
    }

    /// Join base_path with a relative path
    fn join_path(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.base_path.is_empty() {
            path.to_string()
        } else if path.is_empty() {
            self.base_path.trim_end_matches('/').to_string()
        } else {
            format!("{}/{}", self.base_path.trim_end_matches('/'), path)
        }
    }

    /// Strip base_path from an absolute repository path
    ///
    /// Converts paths returned by the GitHub API (which include base_path)
    /// back to relative paths that can be used with join_path
    fn strip_base_path(&self, path: &str) -> String {
        if self.base_path.is_empty() {
            return path.to_string();
        }

        let base = self.base_path.trim_end_matches('/');
        let path_trimmed = path.trim_start_matches('/');

        if let Some(relative) = path_trimmed.strip_prefix(base) {
            relative.trim_start_matches('/').to_string()
        } else {
            path.to_string()
        }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        req
    }

    /// Check if an error is a rate limit error
    fn is_rate_limit_error(&self, status: StatusCode) -> bool {
        status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
    }

    fn convert_entry(&self, entry: GitHubApiEntry) -> Result<DirectoryEntry> {
        let entry_type = match entry.entry_type.as_str() {
            "file" => EntryType::File,
            "dir" => EntryType::Dir,
            other => {
                return Err(ContentError::ProtocolViolation {
                    message: format!("Unexpected entry type {:?} at {}", other, entry.path),
                })
            }
        };
        Ok(DirectoryEntry {
            name: entry.name,
            path: self.strip_base_path(&entry.path),
            entry_type,
            sha: entry.sha,
        })
    }
}

/// Decode blob content using the transfer encoding the API reports
fn decode_blob(content: &str, encoding: &str) -> Result<String> {
    match encoding {
        "base64" => {
            // GitHub inserts newlines into base64 payloads
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = BASE64
                .decode(compact)
                .map_err(|e| ContentError::ProtocolViolation {
                    message: format!("Invalid base64 blob content: {e}"),
                })?;
            String::from_utf8(bytes).map_err(|e| ContentError::ProtocolViolation {
                message: format!("Blob content is not valid UTF-8: {e}"),
            })
        }
        "utf-8" => Ok(content.to_string()),
        other => Err(ContentError::ProtocolViolation {
            message: format!("Unknown blob encoding: {other:?}"),
        }),
    }
}

#[async_trait]
impl TreeClient for GitHubTree {
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let url = self.contents_url(path);

        let response = self.request(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let contents: ContentsResponse = response.json().await?;

                match contents {
                    ContentsResponse::Directory(api_entries) => api_entries
                        .into_iter()
                        .map(|e| self.convert_entry(e))
                        .collect(),
                    ContentsResponse::File(_) => Err(ContentError::NotADirectory {
                        path: path.to_string(),
                    }),
                }
            }
            StatusCode::NOT_FOUND => Err(ContentError::PathNotFound {
                path: path.to_string(),
            }),
            status if self.is_rate_limit_error(status) => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "GitHub API rate limit exceeded".to_string());
                Err(ContentError::RateLimited { message })
            }
            status => {
                let message = format!(
                    "Unexpected status {}: {}",
                    status,
                    response.text().await.unwrap_or_default()
                );
                Err(ContentError::ProtocolViolation { message })
            }
        }
    }

    async fn fetch_blob(&self, sha: &str) -> Result<String> {
        let url = self.blob_url(sha);

        let response = self.request(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let blob: GitHubBlob = response.json().await?;
                tracing::debug!(sha, encoding = %blob.encoding, "fetched blob");
                decode_blob(&blob.content, &blob.encoding)
            }
            StatusCode::NOT_FOUND => Err(ContentError::PathNotFound {
                path: sha.to_string(),
            }),
            status if self.is_rate_limit_error(status) => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "GitHub API rate limit exceeded".to_string());
                Err(ContentError::RateLimited { message })
            }
            status => {
                let message = format!(
                    "Unexpected status {}: {}",
                    status,
                    response.text().await.unwrap_or_default()
                );
                Err(ContentError::ProtocolViolation { message })
            }
        }
    }

    fn identifier(&self) -> String {
        format!(
            "github://{}/{}/{}/{}",
            self.owner, self.repo, self.git_ref, self.base_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(base_path: &str) -> GitHubTree {
        GitHubTree::new(
            "owner".to_string(),
            "repo".to_string(),
            "main".to_string(),
            base_path.to_string(),
        )
    }

    #[test]
    fn test_join_path() {
        let source = tree("content");

        assert_eq!(source.join_path("blog/post.mdx"), "content/blog/post.mdx");
        assert_eq!(source.join_path("/blog/post.mdx"), "content/blog/post.mdx");
        assert_eq!(source.join_path(""), "content");
    }

    #[test]
    fn test_join_path_empty_base() {
        let source = tree("");

        assert_eq!(source.join_path("file.mdx"), "file.mdx");
        assert_eq!(source.join_path("/file.mdx"), "file.mdx");
    }

    #[test]
    fn test_strip_base_path() {
        let source = tree("content");

        // GitHub API returns "content/blog" but we want "blog"
        assert_eq!(source.strip_base_path("content/blog"), "blog");
        assert_eq!(
            source.strip_base_path("content/blog/post.mdx"),
            "blog/post.mdx"
        );

        // Edge cases
        assert_eq!(source.strip_base_path("content"), "");
        assert_eq!(source.strip_base_path("/content/blog"), "blog");
    }

    #[test]
    fn test_strip_base_path_empty_base() {
        let source = tree("");

        assert_eq!(source.strip_base_path("content/blog"), "content/blog");
        assert_eq!(source.strip_base_path("file.mdx"), "file.mdx");
    }

    #[test]
    fn test_decode_blob_base64() {
        // GitHub wraps base64 payloads with embedded newlines
        let encoded = "LS0tCnRpdGxlOiBI\nZWxsbwotLS0K";
        assert_eq!(
            decode_blob(encoded, "base64").unwrap(),
            "---\ntitle: Hello\n---\n"
        );
    }

    #[test]
    fn test_decode_blob_utf8_passthrough() {
        assert_eq!(decode_blob("plain text", "utf-8").unwrap(), "plain text");
    }

    #[test]
    fn test_decode_blob_unknown_encoding() {
        assert!(matches!(
            decode_blob("whatever", "rot13"),
            Err(ContentError::ProtocolViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_directory_file_shape_is_not_a_directory() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/repos/owner/repo/contents/.*".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"name": "about.mdx", "path": "content/about.mdx", "sha": "abc123", "type": "file"}"#,
            )
            .create_async()
            .await;

        let source = tree("content").with_api_base(server.url());
        let result = source.list_directory("about.mdx").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ContentError::NotADirectory { .. })));
    }

    #[tokio::test]
    async fn test_list_directory_unknown_entry_type_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/repos/owner/repo/contents/.*".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"name": "link", "path": "content/link", "sha": "abc123", "type": "symlink"}]"#,
            )
            .create_async()
            .await;

        let source = tree("content").with_api_base(server.url());
        let result = source.list_directory("").await;

        assert!(matches!(
            result,
            Err(ContentError::ProtocolViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_directory_maps_404() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/repos/owner/repo/contents/.*".to_string()),
            )
            .with_status(404)
            .create_async()
            .await;

        let source = tree("content").with_api_base(server.url());
        let result = source.list_directory("missing").await;

        assert!(matches!(result, Err(ContentError::PathNotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_blob_decodes_reported_encoding() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/owner/repo/git/blobs/abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sha": "abc123", "content": "aGVsbG8=\n", "encoding": "base64"}"#)
            .create_async()
            .await;

        let source = tree("content").with_api_base(server.url());
        let content = source.fetch_blob("abc123").await.unwrap();

        assert_eq!(content, "hello");
    }
}
