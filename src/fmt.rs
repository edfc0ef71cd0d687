use crate::{component::UrlParts, query::QueryParam, url::Url};
use core::fmt::{self, Write};

impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if let Some(netloc) = &self.netloc {
            write!(f, "//{netloc}")?;
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_char('/')?;
            }
        } else if self.path.starts_with("//") {
            // Keep the path from being read as a network location.
            f.write_str("/.")?;
        }
        f.write_str(&self.path)?;
        if let Some(params) = &self.params {
            write!(f, ";{params}")?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl fmt::Debug for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Url")
            .field("scheme", &self.parts().scheme)
            .field("netloc", &self.parts().netloc)
            .field("path", &self.parts().path)
            .field("params", &self.parts().params)
            .field("query", &self.parts().query)
            .field("fragment", &self.parts().fragment)
            .finish()
    }
}

impl fmt::Display for Url {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}
