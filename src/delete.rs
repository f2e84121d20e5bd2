use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use http::{Extensions, Request as HttpRequest, Version};
use url::Url;

use crate::body::Body;
use crate::header::HeaderMap;
use crate::into_url::IntoUrl;
use crate::request::{sealed, Buildable, Request, RequestBuilder};
use crate::Method;

/// A `DELETE` request that carries an entity body.
///
/// It behaves like a [`Request`] in every way except that its method is
/// always `DELETE` and cannot be changed.
///
/// ```rust
/// use delete_with_body::{header::CONTENT_TYPE, DeleteWithBody, Method};
///
/// # fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut req = DeleteWithBody::parse("https://api.example.com/items")?;
/// req.headers_mut().insert(CONTENT_TYPE, "application/json".parse()?);
/// *req.body_mut() = Some(r#"{"ids":[1,2,3]}"#.into());
///
/// assert_eq!(req.method(), Method::DELETE);
///
/// // ready for hyper, or any other execution layer taking `http::Request`
/// let req: http::Request<delete_with_body::Body> = req.try_into()?;
/// # Ok(())
/// # }
/// ```
pub struct DeleteWithBody {
    inner: Request,
}

impl DeleteWithBody {
    /// Constructs a `DELETE` request with no URL and no body.
    #[inline]
    pub fn new() -> DeleteWithBody {
        DeleteWithBody {
            inner: Request::without_url(Method::DELETE),
        }
    }

    /// Constructs a `DELETE` request targeting `url`.
    #[inline]
    pub fn from_url(url: Url) -> DeleteWithBody {
        DeleteWithBody {
            inner: Request::new(Method::DELETE, url),
        }
    }

    /// Constructs a `DELETE` request from URI text.
    ///
    /// # Errors
    ///
    /// Fails with a builder error if `uri` is not a syntactically valid
    /// RFC 3986 URI, e.g. if it contains unescaped illegal characters or a
    /// malformed percent-escape. Any scheme is accepted here; only `http`
    /// and `https` targets can later be converted into an `http::Request`.
    ///
    /// Relative references such as `/items/42` have no base to resolve
    /// against and are rejected as well.
    pub fn parse<U: IntoUrl>(uri: U) -> crate::Result<DeleteWithBody> {
        uri.into_url().map(DeleteWithBody::from_url)
    }

    /// Start building a `DELETE` request for `url`.
    pub fn builder<U: IntoUrl>(url: U) -> RequestBuilder<DeleteWithBody> {
        RequestBuilder::from_result(DeleteWithBody::parse(url))
    }

    /// Get the method, which is always `DELETE`.
    #[inline]
    pub fn method(&self) -> &Method {
        debug_assert_eq!(self.inner.method(), Method::DELETE);
        self.inner.method()
    }

    /// Get the url, if one has been set.
    #[inline]
    pub fn url(&self) -> Option<&Url> {
        self.inner.url()
    }

    /// Get a mutable reference to the url.
    #[inline]
    pub fn url_mut(&mut self) -> &mut Option<Url> {
        self.inner.url_mut()
    }

    /// Set the url.
    #[inline]
    pub fn set_url(&mut self, url: Url) {
        self.inner.set_url(url)
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Get a mutable reference to the headers.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    /// Get the body.
    #[inline]
    pub fn body(&self) -> Option<&Body> {
        self.inner.body()
    }

    /// Get a mutable reference to the body.
    #[inline]
    pub fn body_mut(&mut self) -> &mut Option<Body> {
        self.inner.body_mut()
    }

    /// Get the http version.
    #[inline]
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Get a mutable reference to the http version.
    #[inline]
    pub fn version_mut(&mut self) -> &mut Version {
        self.inner.version_mut()
    }

    /// Get the extensions.
    #[inline]
    pub fn extensions(&self) -> &Extensions {
        self.inner.extensions()
    }

    /// Get a mutable reference to the extensions.
    #[inline]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        self.inner.extensions_mut()
    }

    /// View this as a general [`Request`].
    #[inline]
    pub fn as_request(&self) -> &Request {
        &self.inner
    }

    /// Turn this into a general [`Request`], whose method may be changed.
    #[inline]
    pub fn into_request(self) -> Request {
        self.inner
    }

    /// Attempt to clone the request.
    ///
    /// `None` is returned if the body has already been read out.
    pub fn try_clone(&self) -> Option<DeleteWithBody> {
        self.inner
            .try_clone()
            .map(|inner| DeleteWithBody { inner })
    }
}

impl Default for DeleteWithBody {
    fn default() -> DeleteWithBody {
        DeleteWithBody::new()
    }
}

impl Buildable for DeleteWithBody {}

impl sealed::Sealed for DeleteWithBody {
    fn request(&self) -> &Request {
        &self.inner
    }

    fn request_mut(&mut self) -> &mut Request {
        &mut self.inner
    }
}

impl FromStr for DeleteWithBody {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<DeleteWithBody> {
        DeleteWithBody::parse(s)
    }
}

impl<'a> TryFrom<&'a str> for DeleteWithBody {
    type Error = crate::Error;

    fn try_from(s: &'a str) -> crate::Result<DeleteWithBody> {
        DeleteWithBody::parse(s)
    }
}

impl From<DeleteWithBody> for Request {
    fn from(req: DeleteWithBody) -> Request {
        req.inner
    }
}

impl TryFrom<DeleteWithBody> for HttpRequest<Body> {
    type Error = crate::Error;

    fn try_from(req: DeleteWithBody) -> crate::Result<Self> {
        HttpRequest::<Body>::try_from(req.inner)
    }
}

impl<T> TryFrom<HttpRequest<T>> for DeleteWithBody
where
    T: Into<Body>,
{
    type Error = crate::Error;

    fn try_from(req: HttpRequest<T>) -> crate::Result<Self> {
        if req.method() != Method::DELETE {
            return Err(crate::error::builder(format!(
                "expected a DELETE request, found {}",
                req.method()
            )));
        }
        Request::try_from(req).map(|inner| DeleteWithBody { inner })
    }
}

impl fmt::Debug for DeleteWithBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        crate::request::fmt_request_fields(&mut f.debug_struct("DeleteWithBody"), &self.inner)
            .finish()
    }
}
