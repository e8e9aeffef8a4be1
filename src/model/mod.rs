use derive_new::new;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt as _, ResultExt as _, Snafu};

pub use hit::*;
pub use timestamp::*;
pub use view_stats::*;

mod hit;
mod timestamp;
mod view_stats;
