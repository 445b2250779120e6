//! # Instance Paths
//!
//! Dollar-rooted locations of values within a decoded document, rendered
//! into every validation error: `$`, `$.users[0].email`, `$.items[3]`.

use std::fmt;

/// One step from a container into a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    /// Descent through an object key.
    Key(String),
    /// Descent through an array index.
    Index(usize),
}

/// Location of a value within the document being validated.
///
/// Paths are cheap persistent values: descending clones the parent and
/// appends one segment, so sibling branches never observe each other's
/// extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstancePath {
    segments: Vec<Segment>,
}

impl InstancePath {
    /// The document root, rendered as `$`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Descend into the object property `name`.
    pub fn key(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(name.to_string()));
        Self { segments }
    }

    /// Descend into array element `index`.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// True at the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of descent steps from the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Render to the `$.users[0].email` form.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_as_dollar() {
        assert_eq!(InstancePath::root().render(), "$");
        assert!(InstancePath::root().is_root());
    }

    #[test]
    fn test_nested_rendering() {
        let path = InstancePath::root().key("users").index(0).key("email");
        assert_eq!(path.render(), "$.users[0].email");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn test_descent_does_not_mutate_parent() {
        let parent = InstancePath::root().key("items");
        let child = parent.index(3);
        assert_eq!(parent.render(), "$.items");
        assert_eq!(child.render(), "$.items[3]");
    }
}
