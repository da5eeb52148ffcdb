//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_check_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use checkdist_core::DistKind;
use checkdist_core::archive::dist_kind_of;
use checkdist_core::archive::list_dist_files;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let kind = if args.wheel {
        DistKind::Wheel
    } else {
        let name = args
            .archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Plain .tar and .tgz sdists are not picked up from a build
        // directory but can still be listed directly.
        dist_kind_of(&name).unwrap_or(DistKind::Sdist)
    };

    let listing = add_check_context(list_dist_files(&args.archive, kind), &args.archive)?;
    formatter.format_listing(&args.archive, kind, &listing)?;

    Ok(())
}
