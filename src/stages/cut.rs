use std::path::Path;

use tracing::{info, warn};

use crate::{
    outside::Trimmer,
    result::{bail, Result},
    types::CanonicalTime,
};

/// Create a clip of a downloaded video.
///
/// `input` will be cut to keep only data from `start` to `end`
/// and will be saved to `output`.
pub fn cut(
    trimmer: &dyn Trimmer,
    input: &Path,
    start: CanonicalTime,
    end: CanonicalTime,
    output: &Path,
) -> Result<()> {
    info!(
        "Cutting {} ({start} - {end}) into {}",
        input.display(),
        output.display()
    );

    if end <= start {
        warn!("The clip ends ({end}) before it starts ({start}), the trimmer decides what to keep");
    }

    trimmer.trim(input, start, end, output)?;

    // Never report a clip that is not there as a success
    if !output.exists() {
        return bail(format!(
            "The trimmer succeeded but did not create {}",
            output.display()
        ));
    }

    info!("Clip {} completed", output.display());
    Ok(())
}
