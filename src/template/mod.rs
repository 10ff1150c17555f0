//! Template identity and the precomputed correlation plan.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

mod plan;

pub use plan::TemplatePlan;

/// Identifier of a visual target: the path of its reference image.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Template {
    path: PathBuf,
}

impl Template {
    /// Creates a template identifier from an image path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the image path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PathBuf> for Template {
    fn from(value: PathBuf) -> Self {
        Self::new(value)
    }
}

/// Existence check for template resources, run before every search.
pub trait TemplateResources {
    /// Returns true when the template's image can be read.
    fn is_available(&self, template: &Template) -> bool;
}

/// Filesystem-backed resources: the path must be a readable regular file.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsResources;

impl TemplateResources for FsResources {
    fn is_available(&self, template: &Template) -> bool {
        let path = template.path();
        path.is_file() && File::open(path).is_ok()
    }
}

impl<R: TemplateResources + ?Sized> TemplateResources for &R {
    fn is_available(&self, template: &Template) -> bool {
        (**self).is_available(template)
    }
}
