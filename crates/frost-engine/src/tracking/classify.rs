/// Result of classifying one element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Classification {
    pub participates: bool,
    pub strength: f32,
}

/// Maps an element's class tokens to its effect parameters.
///
/// A token belongs to the marker family when it is the bare marker (`frost`)
/// or the marker followed by `-` and a suffix (`frost-7.5`). The first
/// suffixed token in class-list order decides the strength; when its suffix is
/// not a finite number greater than zero the default is used and later tokens
/// are not consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    marker: String,
    default_strength: f32,
}

impl Classifier {
    pub fn new(marker: impl Into<String>, default_strength: f32) -> Self {
        Self {
            marker: marker.into(),
            default_strength,
        }
    }

    #[inline]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    #[inline]
    pub fn default_strength(&self) -> f32 {
        self.default_strength
    }

    /// Classifies a whitespace-separated class string.
    pub fn classify(&self, class_name: &str) -> Classification {
        let mut participates = false;
        let mut strength = None;

        for token in class_name.split_whitespace() {
            let Some(suffix) = self.family_suffix(token) else {
                continue;
            };
            participates = true;

            if strength.is_none() {
                if let Some(suffix) = suffix {
                    strength = Some(parse_strength(suffix).unwrap_or(self.default_strength));
                }
            }
        }

        Classification {
            participates,
            strength: strength.unwrap_or(self.default_strength),
        }
    }

    /// `true` iff some token belongs to the marker family.
    pub fn participates(&self, class_name: &str) -> bool {
        class_name.split_whitespace().any(|t| self.family_suffix(t).is_some())
    }

    /// `Some(None)` for the bare marker, `Some(Some(suffix))` for a suffixed
    /// member, `None` for unrelated tokens.
    fn family_suffix<'t>(&self, token: &'t str) -> Option<Option<&'t str>> {
        let rest = token.strip_prefix(self.marker.as_str())?;
        if rest.is_empty() {
            return Some(None);
        }
        rest.strip_prefix('-').map(Some)
    }
}

pub(crate) fn parse_strength(suffix: &str) -> Option<f32> {
    let value: f32 = suffix.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
