use tracing::debug;

/// Growable byte buffer that assembles a response body delivered in chunks.
///
/// The backing storage always ends with one NUL byte that is not part of the
/// logical content, so the bytes can be handed to consumers expecting
/// terminated text.
#[derive(Debug)]
pub struct ResponseAccumulator {
    data: Vec<u8>,
    limit: Option<usize>,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self { data: vec![0], limit: None }
    }

    /// Accumulator that refuses to grow past `limit` content bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self { data: vec![0], limit: Some(limit) }
    }

    /// Append `chunk` and return how many bytes were accepted.
    ///
    /// A return value other than `chunk.len()` means the buffer could not
    /// grow; the previous content is left untouched and the caller must
    /// abort the transfer.
    pub fn append(&mut self, chunk: &[u8]) -> usize {
        if self.limit.is_some_and(|max| self.len() + chunk.len() > max) {
            debug!(chunk = chunk.len(), total = self.len(), "response size limit reached");
            return 0;
        }
        if self.data.try_reserve(chunk.len()).is_err() {
            debug!(chunk = chunk.len(), total = self.len(), "response buffer could not grow");
            return 0;
        }

        self.data.pop();
        self.data.extend_from_slice(chunk);
        self.data.push(0);

        debug!(chunk = chunk.len(), total = self.len(), "accepted response chunk");
        chunk.len()
    }

    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Hand the assembled content over to its consumer.
    pub fn finish(self) -> ResponseBody {
        ResponseBody { data: self.data }
    }
}

impl Default for ResponseAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete response body, owned by whichever stage currently holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    data: Vec<u8>,
}

impl ResponseBody {
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Content followed by the terminating NUL byte.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Start of the body as lossy text, for diagnostics.
    pub fn snippet(&self) -> String {
        const MAX: usize = 200;
        let text = String::from_utf8_lossy(self.as_bytes());
        if text.chars().count() > MAX {
            format!("{}...", text.chars().take(MAX).collect::<String>())
        } else {
            text.into_owned()
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        let mut data = Vec::with_capacity(text.len() + 1);
        data.extend_from_slice(text.as_bytes());
        data.push(0);
        Self { data }
    }
}
