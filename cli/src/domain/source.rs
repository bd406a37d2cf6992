//! Profile source addresses.

/// Where to fetch the profile from.
///
/// Replaced, never mutated in place, when the operator corrects a failed
/// address; the protocol message is recomputed on every parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Address exactly as supplied by the operator or the boot record.
    pub original_uri: String,
    /// Lowercased scheme; schemeless input is treated as a local file path.
    pub scheme: String,
    /// Host portion, empty for local files.
    pub host: String,
    /// Path portion.
    pub path: String,
    /// Human-readable "retrieving from ..." status line.
    pub message: String,
}

impl SourceDescriptor {
    /// Parse an address of the form `scheme://host/path`, a `file://` URI
    /// or a bare local path.
    #[must_use]
    pub fn parse(uri: &str) -> Self {
        let trimmed = uri.trim();
        let (scheme, rest) = match trimmed.split_once("://") {
            Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
            None => ("file".to_string(), trimmed),
        };

        let (host, path) = if scheme == "file" {
            (String::new(), rest.to_string())
        } else {
            match rest.split_once('/') {
                Some((host, path)) => (host.to_string(), format!("/{path}")),
                None => (rest.to_string(), "/".to_string()),
            }
        };

        let message = protocol_message(&scheme, &host, &path);
        Self {
            original_uri: trimmed.to_string(),
            scheme,
            host,
            path,
            message,
        }
    }
}

fn protocol_message(scheme: &str, host: &str, path: &str) -> String {
    if scheme == "file" {
        format!("Reading the profile from {path}")
    } else {
        format!("Retrieving the profile from {scheme}://{host}{path}")
    }
}
