//! `ai-services application templates`

use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::domain::ApplicationError;

/// List every application kind with the templates it deploys.
///
/// # Errors
///
/// Returns `CatalogError` if the template source cannot be read.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let mut kinds = BTreeMap::new();
    for kind in app
        .catalog
        .list_application_kinds()
        .map_err(ApplicationError::from)?
    {
        let templates = app
            .catalog
            .list_templates(&kind)
            .map_err(ApplicationError::from)?;
        kinds.insert(kind, templates);
    }
    app.renderer().render_templates(&kinds)?;
    Ok(ExitCode::SUCCESS)
}
