use std::convert::TryFrom;
use std::fmt;

use http::{request::Parts, Extensions, Request as HttpRequest, Version};
use percent_encoding::percent_decode_str;
#[cfg(feature = "json")]
use serde::Serialize;
use url::Url;

use crate::body::Body;
#[cfg(feature = "json")]
use crate::header::CONTENT_TYPE;
use crate::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use crate::into_url::IntoUrl;
use crate::Method;

/// A request descriptor: method, target URL, headers and an optional body.
///
/// Every method may carry a body. Convert it into an
/// [`http::Request`] to hand it to an execution layer such as `hyper`.
pub struct Request {
    method: Method,
    url: Option<Url>,
    headers: HeaderMap,
    body: Option<Body>,
    version: Version,
    extensions: Extensions,
}

impl Request {
    /// Constructs a new request.
    #[inline]
    pub fn new(method: Method, url: Url) -> Self {
        let mut req = Request::without_url(method);
        req.url = Some(url);
        req
    }

    /// Constructs a new request with no URL set yet.
    ///
    /// A URL must be set before the request is converted into an
    /// `http::Request`.
    #[inline]
    pub fn without_url(method: Method) -> Self {
        Request {
            method,
            url: None,
            headers: HeaderMap::new(),
            body: None,
            version: Version::default(),
            extensions: Extensions::new(),
        }
    }

    /// Start building a request for the given method and URL.
    pub fn builder<U: IntoUrl>(method: Method, url: U) -> RequestBuilder<Request> {
        RequestBuilder::new(method, url)
    }

    /// Get the method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get a mutable reference to the method.
    #[inline]
    pub fn method_mut(&mut self) -> &mut Method {
        &mut self.method
    }

    /// Get the url, if one has been set.
    #[inline]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Get a mutable reference to the url.
    #[inline]
    pub fn url_mut(&mut self) -> &mut Option<Url> {
        &mut self.url
    }

    /// Set the url.
    #[inline]
    pub fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a mutable reference to the headers.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Get the body.
    #[inline]
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Get a mutable reference to the body.
    #[inline]
    pub fn body_mut(&mut self) -> &mut Option<Body> {
        &mut self.body
    }

    /// Get the http version.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get a mutable reference to the http version.
    #[inline]
    pub fn version_mut(&mut self) -> &mut Version {
        &mut self.version
    }

    /// Get the extensions.
    ///
    /// Extensions travel with the request into the `http::Request` handed to
    /// the execution layer.
    #[inline]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Get a mutable reference to the extensions.
    #[inline]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Attempt to clone the request.
    ///
    /// `None` is returned if the body has already been read out.
    pub fn try_clone(&self) -> Option<Request> {
        let body = match self.body.as_ref() {
            Some(body) => Some(body.try_clone()?),
            None => None,
        };
        Some(Request {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body,
            version: self.version,
            extensions: self.extensions.clone(),
        })
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_request_fields(&mut f.debug_struct("Request"), self).finish()
    }
}

/// Request types that a [`RequestBuilder`] can populate.
///
/// This trait is sealed: it is implemented by [`Request`] and
/// [`DeleteWithBody`](crate::DeleteWithBody) only.
pub trait Buildable: sealed::Sealed {}

impl Buildable for Request {}

impl sealed::Sealed for Request {
    fn request(&self) -> &Request {
        self
    }

    fn request_mut(&mut self) -> &mut Request {
        self
    }
}

pub(crate) mod sealed {
    pub trait Sealed {
        fn request(&self) -> &super::Request;

        // Never used to change the method.
        fn request_mut(&mut self) -> &mut super::Request;
    }
}

/// A builder to construct the properties of a request descriptor.
///
/// The first error hit along the way is kept, every later call is skipped,
/// and the error is returned from [`build`](RequestBuilder::build).
pub struct RequestBuilder<R = Request> {
    request: crate::Result<R>,
}

impl RequestBuilder<Request> {
    /// Start building a request for the given method and URL.
    pub fn new<U: IntoUrl>(method: Method, url: U) -> RequestBuilder<Request> {
        let request = url.into_url().map(|url| Request::new(method, url));
        RequestBuilder::from_result(request)
    }
}

impl<R: Buildable> RequestBuilder<R> {
    /// Continue building an existing request descriptor.
    pub fn from_parts(request: R) -> RequestBuilder<R> {
        RequestBuilder::from_result(Ok(request))
    }

    pub(crate) fn from_result(request: crate::Result<R>) -> RequestBuilder<R> {
        let mut builder = RequestBuilder { request };

        let credentials = builder
            .request
            .as_mut()
            .ok()
            .and_then(|req| req.request_mut().url.as_mut())
            .and_then(take_credentials);

        match credentials {
            Some((username, password)) => builder.basic_auth(username, password),
            None => builder,
        }
    }

    fn with_request<F>(mut self, f: F) -> RequestBuilder<R>
    where
        F: FnOnce(&mut Request) -> crate::Result<()>,
    {
        if let Ok(ref mut req) = self.request {
            if let Err(err) = f(req.request_mut()) {
                self.request = Err(err);
            }
        }
        self
    }

    /// Append a header, keeping any values already set under the same name.
    ///
    /// ```rust
    /// # fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let req = delete_with_body::DeleteWithBody::builder("https://api.example.com/items/42")
    ///     .header("if-match", "\"v7\"")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn header<K, V>(self, key: K, value: V) -> RequestBuilder<R>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.with_request(|req| {
            let name = HeaderName::try_from(key).map_err(invalid_header)?;
            let value = HeaderValue::try_from(value).map_err(invalid_header)?;
            req.headers_mut().append(name, value);
            Ok(())
        })
    }

    /// Authenticate with HTTP basic auth, replacing any earlier
    /// `Authorization` header.
    ///
    /// ```rust
    /// # fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let req = delete_with_body::DeleteWithBody::builder("https://api.example.com/items/42")
    ///     .basic_auth("svc-cleanup", Some("s3cret"))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn basic_auth<U, P>(self, username: U, password: Option<P>) -> RequestBuilder<R>
    where
        U: fmt::Display,
        P: fmt::Display,
    {
        use base64::prelude::{Engine as _, BASE64_STANDARD};

        let credentials = match password {
            Some(password) => format!("{username}:{password}"),
            None => format!("{username}:"),
        };
        self.authorization(format!("Basic {}", BASE64_STANDARD.encode(credentials)))
    }

    /// Authenticate with a bearer token, replacing any earlier
    /// `Authorization` header.
    pub fn bearer_auth<T>(self, token: T) -> RequestBuilder<R>
    where
        T: fmt::Display,
    {
        self.authorization(format!("Bearer {token}"))
    }

    // Credentials are marked sensitive so they never show up in `Debug`.
    fn authorization(self, value: String) -> RequestBuilder<R> {
        self.with_request(|req| {
            let mut value = HeaderValue::try_from(value).map_err(crate::error::builder)?;
            value.set_sensitive(true);
            req.headers_mut().insert(AUTHORIZATION, value);
            Ok(())
        })
    }

    /// Set the entity body sent with the request.
    ///
    /// ```rust
    /// # fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let req = delete_with_body::DeleteWithBody::builder("https://api.example.com/items")
    ///     .header("content-type", "application/json")
    ///     .body(r#"{"ids":[1,2,3]}"#)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn body<T: Into<Body>>(self, body: T) -> RequestBuilder<R> {
        self.with_request(|req| {
            *req.body_mut() = Some(body.into());
            Ok(())
        })
    }

    /// Set the HTTP version.
    pub fn version(self, version: Version) -> RequestBuilder<R> {
        self.with_request(|req| {
            *req.version_mut() = version;
            Ok(())
        })
    }

    /// Serialize `json` as the body.
    ///
    /// `Content-Type: application/json` is added unless a content type was
    /// already set, so vendor types such as `application/merge-patch+json`
    /// survive.
    ///
    /// # Errors
    ///
    /// Fails if `T`'s `Serialize` implementation fails, or if `T` holds a map
    /// whose keys are not strings.
    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub fn json<T: Serialize + ?Sized>(self, json: &T) -> RequestBuilder<R> {
        self.with_request(|req| {
            let body = serde_json::to_vec(json).map_err(crate::error::builder)?;
            req.headers_mut()
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
            *req.body_mut() = Some(body.into());
            Ok(())
        })
    }

    /// Finish building, returning the descriptor or the first error hit.
    pub fn build(self) -> crate::Result<R> {
        self.request
    }
}

impl<R: Buildable> fmt::Debug for RequestBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("RequestBuilder");
        match self.request {
            Ok(ref req) => fmt_request_fields(&mut builder, req.request()).finish(),
            Err(ref err) => builder.field("error", err).finish(),
        }
    }
}

pub(crate) fn fmt_request_fields<'a, 'b>(
    f: &'a mut fmt::DebugStruct<'a, 'b>,
    req: &Request,
) -> &'a mut fmt::DebugStruct<'a, 'b> {
    f.field("method", &req.method)
        .field("url", &req.url.as_ref().map(Url::as_str))
        .field("headers", &req.headers)
}

fn invalid_header<E: Into<http::Error>>(err: E) -> crate::Error {
    let err: http::Error = err.into();
    crate::error::builder(err)
}

/// Move `user:password@` out of `url`, percent-decoded.
fn take_credentials(url: &mut Url) -> Option<(String, Option<String>)> {
    if url.username().is_empty() && url.password().is_none() {
        return None;
    }

    let decode = |s: &str| {
        percent_decode_str(s)
            .decode_utf8()
            .ok()
            .map(|s| s.into_owned())
    };
    let username = decode(url.username())?;
    let password = match url.password() {
        Some(password) => Some(decode(password)?),
        None => None,
    };

    // Only URLs that cannot carry credentials refuse these, and they have
    // none to take.
    url.set_username("").ok()?;
    url.set_password(None).ok()?;
    Some((username, password))
}

impl TryFrom<Request> for HttpRequest<Body> {
    type Error = crate::Error;

    fn try_from(req: Request) -> crate::Result<Self> {
        let Request {
            method,
            url,
            headers,
            body,
            version,
            extensions,
        } = req;

        let url = url.ok_or_else(|| crate::error::builder("request has no URL"))?;
        let uri = crate::into_url::try_uri(&url)?;
        trace!("handing off {} {} ({:?})", method, url, version);

        let mut req = HttpRequest::builder()
            .version(version)
            .method(method)
            .uri(uri)
            .body(body.unwrap_or_else(Body::empty))
            .map_err(|e| crate::error::builder(e).with_url(url))?;

        *req.headers_mut() = headers;
        *req.extensions_mut() = extensions;
        Ok(req)
    }
}

impl<T> TryFrom<HttpRequest<T>> for Request
where
    T: Into<Body>,
{
    type Error = crate::Error;

    fn try_from(req: HttpRequest<T>) -> crate::Result<Self> {
        let (parts, body) = req.into_parts();
        let Parts {
            method,
            uri,
            version,
            headers,
            extensions,
            ..
        } = parts;
        let url = Url::parse(&uri.to_string()).map_err(crate::error::builder)?;
        Ok(Request {
            method,
            url: Some(url),
            headers,
            body: Some(body.into()),
            version,
            extensions,
        })
    }
}
