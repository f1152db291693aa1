use crate::{
    error::NavigationError,
    host::{HostEvent, ViewportHost},
    types::SourceLocation,
};

/// Show `location` in the managed viewport.
///
/// Focuses the viewport, opens the file, announces the jump and finally places the cursor.
/// The caller has already checked the viewport is still valid.
#[tracing::instrument(skip(host), fields(viewport = host.viewport()))]
pub(crate) fn navigate<H>(host: &mut H, location: &SourceLocation) -> Result<(), NavigationError>
where
    H: ViewportHost + ?Sized,
{
    host.focus();

    host.open_file(&location.path)
        .map_err(|source| NavigationError::Open {
            path: location.path.clone(),
            source,
        })?;
    host.raise(HostEvent::JumpedToFrame);

    host.set_cursor(location.line, location.column)
        .map_err(|source| NavigationError::Position {
            path: location.path.clone(),
            line: location.line,
            column: location.column,
            source,
        })?;

    tracing::debug!("viewport moved");
    Ok(())
}
