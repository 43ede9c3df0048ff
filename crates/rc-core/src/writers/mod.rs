//! Output writers
//!
//! Every writer renders deterministically (sorted names throughout) and
//! writes through the atomic writes of [`rc_fs::io`]:
//!
//! - **makefile**: `release_config-<product>-<release>.varmk`
//! - **partition**: `build_flags_<partition>.json`
//! - **artifact**: the combined `ReleaseConfigsArtifact` and the
//!   per-config contributing directories
//! - **graph**: Graphviz inheritance graph

mod artifact;
mod graph;
mod makefile;
mod partition;

pub use artifact::{contributions_artifact, write_artifact, write_contributions_artifact};
pub use graph::{render_inheritance_graph, write_inheritance_graph};
pub use makefile::{render_makefile, write_makefile};
pub use partition::{partition_file_name, write_partition_build_flags};
