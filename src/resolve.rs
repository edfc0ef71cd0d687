//! Path normalization and reference resolution.

use crate::component::UrlParts;

/// Resolves a reference against a base as in
/// [Section 5.2 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2).
///
/// The fragment of the base is ignored, and underflowing `..` segments are
/// dropped. A relative reference with a non-empty path against a base with
/// neither a network location nor an absolute path cannot be resolved, and
/// is returned unchanged.
pub(crate) fn resolve(base: &UrlParts, r: &UrlParts) -> UrlParts {
    if r.scheme.is_empty()
        && base.netloc.is_none()
        && !base.path.starts_with('/')
        && !base.path.is_empty()
        && !r.path.is_empty()
    {
        return r.clone();
    }

    let (t_scheme, t_netloc, t_path, t_query);

    if !r.scheme.is_empty() {
        t_scheme = r.scheme.clone();
        t_netloc = r.netloc.clone();
        t_path = if r.path.starts_with('/') {
            remove_dot_segments(&r.path)
        } else {
            r.path.clone()
        };
        t_query = r.query.clone();
    } else {
        if r.netloc.is_some() {
            t_netloc = r.netloc.clone();
            t_path = remove_dot_segments(&r.path);
            t_query = r.query.clone();
        } else {
            if r.path.is_empty() {
                t_path = base.path.clone();
                t_query = r.query.clone().or_else(|| base.query.clone());
            } else {
                if r.path.starts_with('/') {
                    t_path = remove_dot_segments(&r.path);
                } else {
                    t_path = remove_dot_segments(&merge(base, &r.path));
                }
                t_query = r.query.clone();
            }
            t_netloc = base.netloc.clone();
        }
        t_scheme = base.scheme.clone();
    }

    UrlParts {
        scheme: t_scheme,
        netloc: t_netloc,
        path: t_path,
        params: None,
        query: t_query,
        fragment: r.fragment.clone(),
    }
}

fn merge(base: &UrlParts, r_path: &str) -> String {
    if base.netloc.is_some() && base.path.is_empty() {
        return format!("/{r_path}");
    }
    let dir = base.path.rfind('/').map_or("", |i| &base.path[..=i]);
    format!("{dir}{r_path}")
}

/// Removes `.` and `..` segments from a path.
pub(crate) fn remove_dot_segments(path: &str) -> String {
    let mut buf = String::with_capacity(path.len());
    for seg in path.split_inclusive('/') {
        let seg_stripped = seg.strip_suffix('/').unwrap_or(seg);
        match classify_segment(seg_stripped) {
            SegKind::Dot => {}
            SegKind::DoubleDot => pop_segment(&mut buf),
            SegKind::Normal => buf.push_str(seg),
        }
    }
    buf
}

/// Removes the last segment and its trailing slash, never the leading slash.
fn pop_segment(buf: &mut String) {
    if buf == "/" {
        return;
    }
    let end = buf.len() - usize::from(buf.ends_with('/'));
    match buf[..end].rfind('/') {
        Some(i) => buf.truncate(i + 1),
        None => buf.clear(),
    }
}

enum SegKind {
    Dot,
    DoubleDot,
    Normal,
}

fn classify_segment(mut seg: &str) -> SegKind {
    if seg.is_empty() {
        return SegKind::Normal;
    }
    if let Some(rem) = seg.strip_prefix('.') {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2E") {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2e") {
        seg = rem;
    }
    if seg.is_empty() {
        SegKind::Dot
    } else if seg == "." || seg == "%2E" || seg == "%2e" {
        SegKind::DoubleDot
    } else {
        SegKind::Normal
    }
}

/// Normalizes a path the way POSIX file paths are normalized.
///
/// Empty and `.` segments are dropped, and `..` removes the preceding
/// segment where there is one. A leading `..` is kept in a relative path
/// and dropped in an absolute one. Exactly two leading slashes are kept,
/// while three or more collapse to one. An empty result is `"."`.
pub(crate) fn normpath(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }
    let initial_slashes = if path.starts_with("//") && !path.starts_with("///") {
        2
    } else {
        usize::from(path.starts_with('/'))
    };

    let mut comps: Vec<&str> = Vec::new();
    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." if initial_slashes == 0 && comps.last().map_or(true, |&c| c == "..") => {
                comps.push(comp);
            }
            ".." => {
                comps.pop();
            }
            _ => comps.push(comp),
        }
    }

    let mut buf = "/".repeat(initial_slashes);
    buf.push_str(&comps.join("/"));
    if buf.is_empty() {
        buf.push('.');
    }
    buf
}
