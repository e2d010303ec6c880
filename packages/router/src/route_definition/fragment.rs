use crate::error::ConfigurationError;

pub(crate) const PATH_SEPARATOR: char = '/';
pub(crate) const WILDCARD_MARKER: char = ':';
pub(crate) const SPLAT_MARKER: &str = "*";

/// One `/`-delimited piece of a compiled route path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathFragment {
    /// Must equal the location segment exactly.
    Literal(String),
    /// Matches any single segment, capturing it under the key.
    Wildcard(String),
    /// Matches whatever depth remains. Only ever the last fragment of a path.
    Splat,
}

impl PathFragment {
    /// The literal text or capture key. A splat reports its marker.
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Wildcard(text) => text,
            Self::Splat => SPLAT_MARKER,
        }
    }

    /// Whether this fragment captures a parameter.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard(_))
    }

    /// Whether this fragment is the trailing catch-all.
    pub fn is_splat(&self) -> bool {
        matches!(self, Self::Splat)
    }
}

/// Parse a declared path into its fragments.
///
/// Leading and trailing separators are ignored, so `/` and the empty string both compile to a
/// single empty literal, which is exactly what the location `/` splits into.
pub fn parse_path(path: &str) -> Result<Vec<PathFragment>, ConfigurationError> {
    let pieces: Vec<&str> = path.trim_matches(PATH_SEPARATOR).split(PATH_SEPARATOR).collect();
    let last = pieces.len() - 1;

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, piece)| {
            if piece == SPLAT_MARKER {
                if index != last {
                    return Err(ConfigurationError::SplatNotLast {
                        path: path.to_string(),
                    });
                }
                Ok(PathFragment::Splat)
            } else if let Some(key) = piece.strip_prefix(WILDCARD_MARKER) {
                Ok(PathFragment::Wildcard(key.to_string()))
            } else {
                Ok(PathFragment::Literal(piece.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn literals_and_wildcards() {
        assert_eq!(
            parse_path("/users/:id/posts").unwrap(),
            vec![
                PathFragment::Literal("users".into()),
                PathFragment::Wildcard("id".into()),
                PathFragment::Literal("posts".into()),
            ]
        );
    }

    #[test]
    fn root_is_one_empty_literal() {
        assert_eq!(parse_path("/").unwrap(), vec![PathFragment::Literal(String::new())]);
        assert_eq!(parse_path("").unwrap(), parse_path("/").unwrap());
    }

    #[test]
    fn surrounding_separators_are_ignored() {
        assert_eq!(parse_path("//test/").unwrap(), parse_path("test").unwrap());
    }

    #[test]
    fn trailing_splat() {
        let fragments = parse_path("/files/*").unwrap();
        assert!(fragments[1].is_splat());
        assert_eq!(fragments[1].text(), "*");
    }

    #[test]
    fn splat_in_the_middle_is_rejected() {
        assert_eq!(
            parse_path("/files/*/meta"),
            Err(ConfigurationError::SplatNotLast {
                path: "/files/*/meta".into()
            })
        );
    }

    #[test]
    fn only_the_first_marker_is_stripped() {
        let fragments = parse_path("::odd").unwrap();
        assert_eq!(fragments, vec![PathFragment::Wildcard(":odd".into())]);
        assert!(fragments[0].is_wildcard());
    }
}
