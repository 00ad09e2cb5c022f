//! Low-level building blocks for custom pipelines.
//!
//! These expose the individual preprocessing steps, the matching kernel and
//! the template store primitives. Most users should prefer [`crate::Recognizer`].

pub use crate::kernel::scalar::SqdiffNormedScalar;
pub use crate::kernel::{Kernel, Placement};
pub use crate::preprocess::{binarize, gaussian_blur_3x3, histogram, otsu_threshold, resize_bilinear};
pub use crate::search::{confidence_from_score, score_template};
pub use crate::segment::split_equal_width;
pub use crate::store::{load_templates, write_templates, NameCheck, TemplateName};
pub use crate::template::SqdiffPlan;
