//! Load orchestration: parse the image, derive the memory map, realize it
//! into the host address space and place the entry symbols.

use crate::{
    entry,
    exe::{Executable, ParseError},
    map::{self, Request},
    mem::io,
    space::AddressSpace,
};
use easyerr::{Error, ResultExt};
use log::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    /// The image is not a PS-X EXE. The only terminal failure: nothing is
    /// created before the magic check passes.
    #[error("unsupported executable format")]
    UnsupportedFormat { source: ParseError },
    /// The host cancelled the load. Regions created so far are kept.
    #[error("load cancelled by the host")]
    Cancelled,
}

/// Loads a PS-X EXE image into `space`.
///
/// A magic mismatch refuses the whole load. Everything after that is best
/// effort: a region, mirror or label the host refuses is logged and skipped,
/// and the load still succeeds.
pub fn load(bytes: &[u8], space: &mut impl AddressSpace) -> Result<Executable, LoadError> {
    let exe = Executable::parse(bytes).context(LoadCtx::UnsupportedFormat)?;
    let header = &exe.header;
    info!(
        "loading PS-X EXE: pc={} code={}..{}",
        header.initial_pc,
        header.load_address,
        header.code_end(),
    );

    for request in map::build(header) {
        if space.cancelled() {
            return Err(LoadError::Cancelled);
        }

        let result = match &request {
            Request::Region(region) => {
                // short backing is legal, the region zero-fills past it
                let backing = region.source.and_then(|offset| {
                    bytes
                        .get(offset as usize..)
                        .map(|tail| &tail[..tail.len().min(region.size as usize)])
                });
                space.create_region(region, backing)
            }
            Request::Mirror(mirror) => space.create_mirror(mirror),
        };

        if let Err(err) = result {
            warn!("skipping {}: {err}", request.name());
        }
    }

    for label in io::labels() {
        if let Err(err) = space.create_label(label.address, &label.name) {
            debug!("skipping register label {}: {err}", label.name);
        }
    }

    if space.cancelled() {
        return Err(LoadError::Cancelled);
    }
    entry::apply(space, header);

    info!("loading done");
    Ok(exe)
}
