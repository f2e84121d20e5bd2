use iri_string::types::UriReferenceStr;
use url::Url;

/// A trait to try to convert some type into a `Url`.
///
/// This trait is "sealed", such that only types within delete-with-body can
/// implement it.
pub trait IntoUrl: IntoUrlSealed {}

impl IntoUrl for Url {}
impl IntoUrl for String {}
impl<'a> IntoUrl for &'a str {}
impl<'a> IntoUrl for &'a String {}

pub trait IntoUrlSealed {
    // Any URI is accepted here, whatever its scheme. Whether it can be
    // dispatched is decided when converting into an `http::Request`.
    fn into_url(self) -> crate::Result<Url>;

    fn as_str(&self) -> &str;
}

impl IntoUrlSealed for Url {
    fn into_url(self) -> crate::Result<Url> {
        Ok(self)
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

impl<'a> IntoUrlSealed for &'a str {
    fn into_url(self) -> crate::Result<Url> {
        // `Url` follows the WHATWG rules and quietly repairs text that RFC 3986
        // forbids (`\` becomes `/`, `{` is escaped, ...), so the raw text is
        // validated first.
        if let Err(e) = UriReferenceStr::new(self) {
            debug!("rejected URI text {:?}: {}", self, e);
            return Err(crate::error::builder(e));
        }

        Url::parse(self).map_err(|e| {
            debug!("rejected URI text {:?}: {}", self, e);
            crate::error::builder(e)
        })
    }

    fn as_str(&self) -> &str {
        self
    }
}

impl<'a> IntoUrlSealed for &'a String {
    fn into_url(self) -> crate::Result<Url> {
        (&**self).into_url()
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

impl IntoUrlSealed for String {
    fn into_url(self) -> crate::Result<Url> {
        (&*self).into_url()
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// Turn the target of a request into the `http::Uri` handed to the
/// execution layer. Only `http` and `https` targets can be dispatched.
pub(crate) fn try_uri(url: &Url) -> crate::Result<http::Uri> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(crate::error::url_bad_scheme(url.clone()));
    }

    url.as_str()
        .parse()
        .map_err(|e| crate::error::builder(e).with_url(url.clone()))
}
