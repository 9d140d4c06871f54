//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{SegResult, SegmentError};

pub use crate::cost::{ArcCost, OrientedCost};
pub use crate::engine::{segment, segment_cancellable, segment_with, Segmentation};
pub use crate::grid::{Connectivity, ConnectivityKind, GridGraph};
pub use crate::label::OutputSpec;
pub use crate::params::SegmentParams;
pub use crate::preprocess::IntensityTransform;
pub use crate::worker::{CancelToken, LabelSink, SegmentRequest, SegmentWorker, Ticket};

pub use crate::io::{home_dataset_dir_with, open_image, open_seeds, output_path, save_npy};
