use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};

/// The entity body of a request.
///
/// A `Body` holds its content in memory, so it can be inspected after it
/// has been set and reused across conversions.
pub struct Body {
    inner: Option<Bytes>,
}

impl Body {
    /// Returns a reference to the internal data of the `Body`.
    ///
    /// `None` is returned once the content has been handed to the execution
    /// layer through the `http_body::Body` implementation.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.inner.as_ref().map(|bytes| bytes.as_ref())
    }

    /// Returns the length of the content, if it is still held.
    pub fn content_length(&self) -> Option<u64> {
        self.inner.as_ref().map(|bytes| bytes.len() as u64)
    }

    /// An empty body.
    pub fn empty() -> Body {
        Body::reusable(Bytes::new())
    }

    pub(crate) fn reusable(chunk: Bytes) -> Body {
        Body { inner: Some(chunk) }
    }

    pub(crate) fn try_clone(&self) -> Option<Body> {
        self.inner.clone().map(Body::reusable)
    }
}

impl Default for Body {
    #[inline]
    fn default() -> Body {
        Body::empty()
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = crate::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let out = self
            .inner
            .take()
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| Ok(Frame::data(bytes)));
        Poll::Ready(out)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.as_ref().map_or(true, |bytes| bytes.is_empty())
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.content_length().unwrap_or(0))
    }
}

impl From<Bytes> for Body {
    #[inline]
    fn from(bytes: Bytes) -> Body {
        Body::reusable(bytes)
    }
}

impl From<Vec<u8>> for Body {
    #[inline]
    fn from(vec: Vec<u8>) -> Body {
        Body::reusable(vec.into())
    }
}

impl From<&'static [u8]> for Body {
    #[inline]
    fn from(s: &'static [u8]) -> Body {
        Body::reusable(Bytes::from_static(s))
    }
}

impl From<String> for Body {
    #[inline]
    fn from(s: String) -> Body {
        Body::reusable(s.into())
    }
}

impl From<&'static str> for Body {
    #[inline]
    fn from(s: &'static str) -> Body {
        s.as_bytes().into()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("Body");
        if let Some(len) = self.content_length() {
            builder.field("len", &len);
        }
        builder.finish()
    }
}
